use winit::event::{DeviceEvent, MouseScrollDelta};

use super::fly_camera::FlyCamera;

/// Accumulates raw mouse input between frames and hands it to the camera.
///
/// The very first motion sample after the cursor is grabbed is dropped, some
/// platforms report the whole warp to the window centre as one delta.
pub struct CameraController {
    pub scroll_speed: f32,
    first_mouse: bool,
    pending_motion: (f32, f32),
    pending_scroll: f32,
}

impl CameraController {
    pub fn new(scroll_speed: f32) -> Self {
        Self {
            scroll_speed,
            first_mouse: true,
            pending_motion: (0.0, 0.0),
            pending_scroll: 0.0,
        }
    }

    pub fn process_events(&mut self, event: &DeviceEvent) {
        match event {
            DeviceEvent::MouseMotion { delta } => {
                self.add_motion(delta.0 as f32, delta.1 as f32);
            }
            DeviceEvent::MouseWheel { delta } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, lines) => *lines,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / 16.0,
                };
                self.add_scroll(scroll);
            }
            _ => (),
        }
    }

    /// Screen-space motion, y growing downwards.
    pub fn add_motion(&mut self, dx: f32, dy: f32) {
        if self.first_mouse {
            self.first_mouse = false;
            return;
        }
        self.pending_motion.0 += dx;
        self.pending_motion.1 += dy;
    }

    pub fn add_scroll(&mut self, lines: f32) {
        self.pending_scroll += lines * self.scroll_speed;
    }

    pub fn apply(&mut self, camera: &mut FlyCamera) {
        let (dx, dy) = std::mem::take(&mut self.pending_motion);
        if dx != 0.0 || dy != 0.0 {
            // reversed: screen y goes from top to bottom
            camera.process_mouse_movement(dx, -dy, true);
        }

        let scroll = std::mem::take(&mut self.pending_scroll);
        if scroll != 0.0 {
            camera.process_mouse_scroll(scroll);
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn first_motion_sample_is_ignored() {
        let mut controller = CameraController::default();
        let mut camera = FlyCamera::new(Vector3::new(0.0, 0.0, 0.0), 1.0, 0.1, 100.0);

        controller.add_motion(500.0, 500.0);
        controller.apply(&mut camera);
        assert_eq!(camera.yaw, -90.0);

        controller.add_motion(10.0, 0.0);
        controller.apply(&mut camera);
        assert!((camera.yaw - -89.0).abs() < 1e-5);
    }

    #[test]
    fn moving_the_mouse_up_pitches_up() {
        let mut controller = CameraController::default();
        let mut camera = FlyCamera::new(Vector3::new(0.0, 0.0, 0.0), 1.0, 0.1, 100.0);
        controller.add_motion(0.0, 0.0);

        controller.add_motion(0.0, -20.0);
        controller.apply(&mut camera);
        assert!((camera.pitch - 2.0).abs() < 1e-5);
    }

    #[test]
    fn scroll_zooms_in() {
        let mut controller = CameraController::default();
        let mut camera = FlyCamera::new(Vector3::new(0.0, 0.0, 0.0), 1.0, 0.1, 100.0);

        controller.add_scroll(5.0);
        controller.apply(&mut camera);
        assert_eq!(camera.zoom, 40.0);
    }
}
