use cgmath::*;

use super::camera_utils::OPENGL_TO_WGPU_MATRIX;
use crate::input::Direction;

pub const YAW: f32 = -90.0;
pub const PITCH: f32 = 0.0;
pub const SPEED: f32 = 2.5;
pub const SENSITIVITY: f32 = 0.1;
pub const ZOOM: f32 = 45.0;

/// Free-flying first person camera driven by Euler angles.
///
/// `front`, `right` and `up` are kept orthonormal and are recomputed whenever
/// yaw or pitch change. Angles and zoom are in degrees.
#[derive(Debug, Clone, Copy)]
pub struct FlyCamera {
    pub position: Vector3<f32>,
    pub front: Vector3<f32>,
    pub up: Vector3<f32>,
    pub right: Vector3<f32>,
    pub world_up: Vector3<f32>,
    pub yaw: f32,
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub zoom: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl FlyCamera {
    pub fn new(position: Vector3<f32>, aspect: f32, znear: f32, zfar: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vector3::new(0.0, 0.0, -1.0),
            up: Vector3::unit_y(),
            right: Vector3::unit_x(),
            world_up: Vector3::unit_y(),
            yaw: YAW,
            pitch: PITCH,
            movement_speed: SPEED,
            mouse_sensitivity: SENSITIVITY,
            zoom: ZOOM,
            aspect,
            znear,
            zfar,
        };
        camera.update_camera_vectors();
        camera
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.position);
        Matrix4::look_at_rh(eye, eye + self.front, self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(Deg(self.zoom), self.aspect, self.znear, self.zfar)
    }

    pub fn process_keyboard(&mut self, direction: Direction, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        match direction {
            Direction::Forward => self.position += self.front * velocity,
            Direction::Backward => self.position -= self.front * velocity,
            Direction::Left => self.position -= self.right * velocity,
            Direction::Right => self.position += self.right * velocity,
            Direction::Up => self.position += self.world_up * velocity,
            Direction::Down => self.position -= self.world_up * velocity,
            Direction::SpeedBoostOn => self.movement_speed = SPEED * 2.0,
            Direction::SpeedBoostOff => self.movement_speed = SPEED,
        }
    }

    /// Offsets are in screen units with y pointing up.
    pub fn process_mouse_movement(&mut self, xoffset: f32, yoffset: f32, constrain_pitch: bool) {
        self.yaw += xoffset * self.mouse_sensitivity;
        self.pitch += yoffset * self.mouse_sensitivity;

        // past 90 degrees the view flips over
        if constrain_pitch {
            self.pitch = self.pitch.clamp(-89.0, 89.0);
        }

        self.update_camera_vectors();
    }

    pub fn process_mouse_scroll(&mut self, yoffset: f32) {
        self.zoom = (self.zoom - yoffset).clamp(1.0, ZOOM);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    fn update_camera_vectors(&mut self) {
        let (yaw, pitch) = (Deg(self.yaw), Deg(self.pitch));
        let front = Vector3::new(
            Rad::from(yaw).0.cos() * Rad::from(pitch).0.cos(),
            Rad::from(pitch).0.sin(),
            Rad::from(yaw).0.sin() * Rad::from(pitch).0.cos(),
        );
        self.front = front.normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-5
    }

    fn camera() -> FlyCamera {
        FlyCamera::new(Vector3::new(0.0, 5.0, 3.0), 16.0 / 9.0, 0.1, 100.0)
    }

    #[test]
    fn starts_looking_down_negative_z() {
        let cam = camera();
        assert!(close(cam.front, Vector3::new(0.0, 0.0, -1.0)));
        assert!(close(cam.right, Vector3::new(1.0, 0.0, 0.0)));
        assert!(close(cam.up, Vector3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn keyboard_moves_along_basis() {
        let mut cam = camera();
        cam.process_keyboard(Direction::Forward, 1.0);
        assert!(close(cam.position, Vector3::new(0.0, 5.0, 0.5)));

        cam.process_keyboard(Direction::Right, 2.0);
        assert!(close(cam.position, Vector3::new(5.0, 5.0, 0.5)));

        cam.process_keyboard(Direction::Down, 1.0);
        assert!(close(cam.position, Vector3::new(5.0, 2.5, 0.5)));
    }

    #[test]
    fn boost_doubles_speed_until_released() {
        let mut cam = camera();
        cam.process_keyboard(Direction::SpeedBoostOn, 0.0);
        assert_eq!(cam.movement_speed, SPEED * 2.0);
        cam.process_keyboard(Direction::SpeedBoostOff, 0.0);
        assert_eq!(cam.movement_speed, SPEED);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = camera();
        cam.process_mouse_movement(0.0, 10_000.0, true);
        assert_eq!(cam.pitch, 89.0);
        assert!(cam.front.y > 0.99);
        assert!(!cam.view_matrix().x.x.is_nan());
    }

    #[test]
    fn scroll_zoom_is_bounded() {
        let mut cam = camera();
        cam.process_mouse_scroll(100.0);
        assert_eq!(cam.zoom, 1.0);
        cam.process_mouse_scroll(-100.0);
        assert_eq!(cam.zoom, ZOOM);
    }
}
