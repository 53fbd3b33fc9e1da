//! The ball: a model that rolls along the ground relative to the viewer.
//!
//! Arrow-key input moves the ball along its own front/right axes, which are
//! the camera's projected onto the ground plane. Each rolling step turns the
//! ball by `ROTATION_RATE` degrees per unit travelled. The keys seen since the
//! last [`RollingOrientation::resolve`] pick the rotation axis once per frame;
//! after that the latch is cleared.

use cgmath::{Deg, InnerSpace, Matrix4, Vector3};

use crate::{
    config::Placement,
    gfx::{camera::FlyCamera, resources::UploadContext},
    input::Direction,
};

use super::{
    model::{DrawModel, Model},
    object::{ObjectBinding, ObjectKind, SceneObject, Transform},
};

pub const BASE_SPEED: f32 = 2.5;
/// Degrees of roll per unit of distance.
pub const ROTATION_RATE: f32 = 120.0;
pub const MAX_ANGLE: f32 = 360.0;

/// Rolling keys seen since the last resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionFlags {
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Sign of the angle change for the keys held so far; the first matching
    /// row wins.
    fn angle_sign(&self) -> f32 {
        let Self {
            forward: f,
            backward: b,
            left: l,
            right: r,
        } = *self;
        if f && l {
            -1.0
        } else if b && r {
            1.0
        } else if f && r {
            -1.0
        } else if b && l {
            1.0
        } else if f {
            -1.0
        } else if b {
            1.0
        } else if l {
            -1.0
        } else if r {
            1.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingOrientation {
    pub front: Vector3<f32>,
    pub right: Vector3<f32>,
    /// Degrees, kept within (-360, 360].
    pub angle: f32,
    /// Unit rotation axis.
    pub axis: Vector3<f32>,
    pub flags: DirectionFlags,
    pub speed: f32,
}

impl Default for RollingOrientation {
    fn default() -> Self {
        Self {
            front: Vector3::new(0.0, 0.0, -1.0),
            right: Vector3::new(1.0, 0.0, 0.0),
            angle: 0.0,
            axis: Vector3::new(1.0, 0.0, 0.0),
            flags: DirectionFlags::default(),
            speed: BASE_SPEED,
        }
    }
}

/// Drops the y component and renormalizes; `None` for a vertical vector.
fn ground_projection(v: Vector3<f32>) -> Option<Vector3<f32>> {
    let flat = Vector3::new(v.x, 0.0, v.z);
    (flat.magnitude2() > f32::EPSILON).then(|| flat.normalize())
}

impl RollingOrientation {
    /// Looking straight up or down leaves the previous ground axis in place.
    pub fn set_orientation(&mut self, front: Vector3<f32>, right: Vector3<f32>) {
        if let Some(front) = ground_projection(front) {
            self.front = front;
        }
        if let Some(right) = ground_projection(right) {
            self.right = right;
        }
    }

    /// Applies one direction command and returns the displacement it causes.
    pub fn step(&mut self, direction: Direction, delta_time: f32) -> Vector3<f32> {
        let velocity = self.speed * delta_time;
        let displacement = match direction {
            Direction::Forward => {
                self.flags.forward = true;
                self.front * velocity
            }
            Direction::Backward => {
                self.flags.backward = true;
                -self.front * velocity
            }
            Direction::Left => {
                self.flags.left = true;
                -self.right * velocity
            }
            Direction::Right => {
                self.flags.right = true;
                self.right * velocity
            }
            Direction::Up => return Vector3::unit_y() * velocity,
            Direction::Down => return -Vector3::unit_y() * velocity,
            Direction::SpeedBoostOn => {
                self.speed = BASE_SPEED * 2.0;
                return Vector3::new(0.0, 0.0, 0.0);
            }
            Direction::SpeedBoostOff => {
                self.speed = BASE_SPEED;
                return Vector3::new(0.0, 0.0, 0.0);
            }
        };

        self.angle += self.flags.angle_sign() * velocity * ROTATION_RATE;
        if self.angle.abs() > MAX_ANGLE {
            self.angle = 0.0;
        }
        displacement
    }

    /// Picks this frame's rotation axis from the latched keys, then clears them.
    pub fn resolve(&mut self) {
        let DirectionFlags {
            forward: f,
            backward: b,
            left: l,
            right: r,
        } = self.flags;

        let axis = if (f && l) || (b && r) {
            Some(self.right + self.front)
        } else if (f && r) || (b && l) {
            Some(self.right - self.front)
        } else if f || b {
            Some(self.right)
        } else if l || r {
            Some(self.front)
        } else {
            None
        };

        if let Some(axis) = axis.filter(|a| a.magnitude2() > f32::EPSILON) {
            self.axis = axis.normalize();
        }
        self.flags = DirectionFlags::default();
    }

    pub fn rotation(&self) -> Matrix4<f32> {
        Matrix4::from_axis_angle(self.axis, Deg(self.angle))
    }
}

pub struct RollingBall {
    name: String,
    transform: Transform,
    orientation: RollingOrientation,
    model: Option<Model>,
    binding: Option<ObjectBinding>,
}

impl RollingBall {
    pub fn new(name: impl Into<String>, transform: Transform, model: Option<Model>) -> Self {
        Self {
            name: name.into(),
            transform,
            orientation: RollingOrientation::default(),
            model,
            binding: None,
        }
    }

    pub fn from_placement(placement: &Placement, model: Option<Model>) -> Self {
        Self::new(
            placement.name,
            Transform::new(placement.position, placement.scale),
            model,
        )
    }

    pub fn orientation(&self) -> &RollingOrientation {
        &self.orientation
    }
}

impl SceneObject for RollingBall {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::RollingBall
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn compute_model_matrix(&self) -> Matrix4<f32> {
        self.transform
            .matrix_with_rotation(self.orientation.rotation())
    }

    fn handle_directional_input(&mut self, direction: Direction, delta_time: f32) {
        let displacement = self.orientation.step(direction, delta_time);
        self.transform.position += displacement;
    }

    fn set_orientation(&mut self, front: Vector3<f32>, right: Vector3<f32>) {
        self.orientation.set_orientation(front, right);
    }

    fn resolve_frame_rotation(&mut self) {
        if self.orientation.flags.any() {
            log::trace!(
                "{} rolls {:.1} degrees about {:?}",
                self.name,
                self.orientation.angle,
                self.orientation.axis
            );
        }
        self.orientation.resolve();
    }

    fn init_gpu_resources(&mut self, ctx: &UploadContext<'_>) {
        if let Some(model) = &mut self.model {
            model.init_gpu_resources(ctx);
        }
        self.binding = Some(ObjectBinding::new(ctx, &self.name, self.compute_model_matrix()));
    }

    fn upload_uniforms(&mut self, queue: &wgpu::Queue, _camera: &FlyCamera) {
        let model = self.compute_model_matrix();
        if let Some(binding) = &mut self.binding {
            binding.update(queue, model);
        }
    }

    fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        let (Some(binding), Some(model)) = (&self.binding, &self.model) else {
            return;
        };
        binding.bind(pass);
        pass.draw_model(model);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneLayout;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-5
    }

    fn ball() -> RollingBall {
        RollingBall::from_placement(&SceneLayout::default().ball, None)
    }

    fn frame(ball: &mut RollingBall, directions: &[Direction], dt: f32) {
        ball.set_orientation(Vector3::new(0.0, 0.0, -1.0), Vector3::new(1.0, 0.0, 0.0));
        for direction in directions {
            ball.handle_directional_input(*direction, dt);
        }
        ball.resolve_frame_rotation();
    }

    #[test]
    fn one_forward_frame_rolls_and_moves() {
        let mut ball = ball();
        frame(&mut ball, &[Direction::Forward], 0.1);

        assert!(close(ball.transform().position, Vector3::new(0.0, 0.2, -0.25)));
        assert!((ball.orientation().angle - -30.0).abs() < 1e-4);
        assert!(close(ball.orientation().axis, Vector3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn forward_right_rolls_about_right_minus_front() {
        let mut ball = ball();
        frame(&mut ball, &[Direction::Forward, Direction::Right], 0.1);

        let expected = Vector3::new(1.0, 0.0, 1.0).normalize();
        assert!(close(ball.orientation().axis, expected));
        // once for the forward step, once for the combined step
        assert!((ball.orientation().angle - -60.0).abs() < 1e-4);
    }

    #[test]
    fn decision_table_axes() {
        let front = Vector3::new(0.0, 0.0, -1.0);
        let right = Vector3::new(1.0, 0.0, 0.0);
        let cases = [
            (vec![Direction::Forward, Direction::Left], (right + front).normalize()),
            (vec![Direction::Backward, Direction::Right], (right + front).normalize()),
            (vec![Direction::Backward, Direction::Left], (right - front).normalize()),
            (vec![Direction::Backward], right),
            (vec![Direction::Left], front),
            (vec![Direction::Right], front),
        ];

        for (directions, axis) in cases {
            let mut ball = ball();
            frame(&mut ball, &directions, 0.01);
            assert!(
                close(ball.orientation().axis, axis),
                "{:?} gave {:?}",
                directions,
                ball.orientation().axis
            );
        }
    }

    #[test]
    fn angle_signs_follow_precedence() {
        let mut orientation = RollingOrientation::default();
        orientation.step(Direction::Backward, 0.1);
        assert!((orientation.angle - 30.0).abs() < 1e-4);

        // backward + left: still positive
        orientation.step(Direction::Left, 0.1);
        assert!((orientation.angle - 60.0).abs() < 1e-4);

        let mut orientation = RollingOrientation::default();
        orientation.step(Direction::Left, 0.1);
        assert!((orientation.angle - -30.0).abs() < 1e-4);
    }

    #[test]
    fn decision_table_angles() {
        use Direction::*;
        // every step in the frame sees the keys latched so far
        let cases = [
            (vec![Forward, Left], -60.0),
            (vec![Backward, Right], 60.0),
            (vec![Forward, Right], -60.0),
            (vec![Backward, Left], 60.0),
            (vec![Forward], -30.0),
            (vec![Backward], 30.0),
            (vec![Left], -30.0),
            (vec![Right], 30.0),
        ];

        for (directions, angle) in cases {
            let mut ball = ball();
            frame(&mut ball, &directions, 0.1);
            assert!(
                (ball.orientation().angle - angle).abs() < 1e-4,
                "{:?} gave {}",
                directions,
                ball.orientation().angle
            );
        }
    }

    #[test]
    fn all_four_arrows_take_the_forward_left_branch() {
        let mut ball = ball();
        frame(&mut ball, &[Direction::Forward, Direction::Backward, Direction::Left, Direction::Right], 0.1);

        assert!((ball.orientation().angle - -120.0).abs() < 1e-4);
        let expected = Vector3::new(1.0, 0.0, -1.0).normalize();
        assert!(close(ball.orientation().axis, expected));
    }

    #[test]
    fn opposite_keys_keep_forward_first_precedence() {
        let mut ball = ball();
        frame(&mut ball, &[Direction::Forward, Direction::Backward], 0.1);
        // both steps see forward set and take the negative branch
        assert!((ball.orientation().angle - -60.0).abs() < 1e-4);
        assert!(close(ball.orientation().axis, Vector3::new(1.0, 0.0, 0.0)));
        assert!(close(ball.transform().position, Vector3::new(0.0, 0.2, 0.0)));
    }

    #[test]
    fn latch_clears_after_resolve() {
        let mut ball = ball();
        frame(
            &mut ball,
            &[
                Direction::Forward,
                Direction::Backward,
                Direction::Left,
                Direction::Right,
            ],
            0.1,
        );
        assert_eq!(ball.orientation().flags, DirectionFlags::default());
    }

    #[test]
    fn idle_frame_keeps_axis_and_angle() {
        let mut ball = ball();
        frame(&mut ball, &[Direction::Left], 0.1);
        let before = *ball.orientation();
        let matrix = ball.compute_model_matrix();

        frame(&mut ball, &[], 0.1);

        assert_eq!(ball.orientation().axis, before.axis);
        assert_eq!(ball.orientation().angle, before.angle);
        assert_eq!(ball.compute_model_matrix(), matrix);
    }

    #[test]
    fn angle_wraps_to_zero_past_a_full_turn() {
        let mut ball = ball();
        let mut previous = 0.0f32;
        let mut wrapped = false;
        for _ in 0..200 {
            frame(&mut ball, &[Direction::Forward], 0.1);
            let angle = ball.orientation().angle;
            assert!(angle.abs() <= MAX_ANGLE);
            if angle == 0.0 && previous != 0.0 {
                wrapped = true;
            }
            previous = angle;
        }
        assert!(wrapped);
    }

    #[test]
    fn vertical_moves_and_boost_do_not_roll() {
        let mut ball = ball();
        frame(
            &mut ball,
            &[Direction::SpeedBoostOn, Direction::Up],
            0.1,
        );
        assert_eq!(ball.orientation().angle, 0.0);
        assert_eq!(ball.orientation().speed, BASE_SPEED * 2.0);
        assert!(close(ball.transform().position, Vector3::new(0.0, 0.7, 0.0)));

        frame(&mut ball, &[Direction::SpeedBoostOff, Direction::Down], 0.1);
        assert_eq!(ball.orientation().speed, BASE_SPEED);
        assert!(close(ball.transform().position, Vector3::new(0.0, 0.45, 0.0)));
    }

    #[test]
    fn orientation_is_flattened_onto_the_ground() {
        let mut orientation = RollingOrientation::default();
        orientation.set_orientation(
            Vector3::new(0.0, -0.5, -0.5).normalize(),
            Vector3::new(0.6, 0.8, 0.0),
        );
        assert!(close(orientation.front, Vector3::new(0.0, 0.0, -1.0)));
        assert!(close(orientation.right, Vector3::new(1.0, 0.0, 0.0)));

        // straight down: keep the old front
        orientation.set_orientation(Vector3::new(0.0, -1.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(close(orientation.front, Vector3::new(0.0, 0.0, -1.0)));
        assert!(close(orientation.right, Vector3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn model_matrix_is_pure() {
        let mut ball = ball();
        frame(&mut ball, &[Direction::Forward, Direction::Left], 0.1);
        assert_eq!(ball.compute_model_matrix(), ball.compute_model_matrix());
        assert_eq!(ball.orientation().flags, DirectionFlags::default());
    }
}
