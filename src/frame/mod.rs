//! Per-frame update loop.
//!
//! [`FrameOrchestrator::tick`] advances the clock and applies the held input
//! to the camera and the scene objects in a fixed order. Drawing is left to
//! the render engine, which reads the updated [`FrameContext`].

pub mod context;

use std::time::Instant;

pub use context::FrameContext;

use crate::input::{InputState, CAMERA_BINDINGS, OBJECT_BINDINGS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Running,
    Terminating,
}

/// Wall clock delta between ticks; the first tick reports zero.
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, now: Instant) -> f32 {
        let delta = self
            .last
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        delta
    }
}

pub struct FrameOrchestrator {
    state: FrameState,
    clock: FrameClock,
}

impl FrameOrchestrator {
    pub fn new() -> Self {
        Self {
            state: FrameState::Running,
            clock: FrameClock::new(),
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Runs the update half of a frame. Once terminating, further ticks do nothing.
    pub fn tick(&mut self, ctx: &mut FrameContext, input: &InputState, now: Instant) -> FrameState {
        if self.state == FrameState::Terminating {
            return self.state;
        }

        ctx.delta_time = self.clock.tick(now);
        let dt = ctx.delta_time;

        if input.exit_requested() {
            log::info!("Exit requested, shutting down");
            self.state = FrameState::Terminating;
            return self.state;
        }

        let camera = &mut ctx.camera_manager.camera;
        for direction in input.held_directions(&CAMERA_BINDINGS) {
            camera.process_keyboard(direction, dt);
        }
        camera.process_keyboard(input.boost(), dt);
        ctx.camera_manager.apply_pending();

        let (front, right) = (ctx.camera_manager.camera.front, ctx.camera_manager.camera.right);
        for object in &mut ctx.objects {
            object.set_orientation(front, right);
            // speed first, so it applies to this frame's movement
            object.handle_directional_input(input.boost(), dt);
            for direction in input.held_directions(&OBJECT_BINDINGS) {
                object.handle_directional_input(direction, dt);
            }
            object.resolve_frame_rotation();
        }

        ctx.sky.recentre(ctx.camera_manager.camera.position);
        self.state
    }
}

impl Default for FrameOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cgmath::{InnerSpace, Vector3};
    use winit::{event::ElementState, keyboard::KeyCode};

    use super::*;
    use crate::{
        config::ViewerConfig,
        gfx::{
            camera::{CameraController, CameraManager, FlyCamera},
            scene::{RollingBall, SceneObject, SkyDome, StaticProp, Transform},
        },
    };

    fn context() -> FrameContext {
        let config = ViewerConfig::default();
        let camera = FlyCamera::new(config.camera_start, config.aspect(), 0.1, 100.0);
        let objects: Vec<Box<dyn SceneObject>> = vec![
            Box::new(StaticProp::new("street", Transform::default(), None)),
            Box::new(RollingBall::from_placement(&config.layout.ball, None)),
            Box::new(StaticProp::from_placement(&config.layout.plant, None)),
        ];
        FrameContext::new(
            CameraManager::new(camera, CameraController::default()),
            objects,
            SkyDome::new(70.0, Default::default()),
        )
    }

    fn press(input: &mut InputState, key: KeyCode) {
        input.process_key(key, ElementState::Pressed);
    }

    #[test]
    fn clock_starts_at_zero() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        assert_eq!(clock.tick(start), 0.0);
        let dt = clock.tick(start + Duration::from_millis(100));
        assert!((dt - 0.1).abs() < 1e-6);
    }

    #[test]
    fn first_tick_moves_nothing() {
        let mut ctx = context();
        let mut input = InputState::new();
        press(&mut input, KeyCode::KeyW);
        press(&mut input, KeyCode::ArrowUp);

        FrameOrchestrator::new().tick(&mut ctx, &input, Instant::now());

        assert_eq!(ctx.delta_time, 0.0);
        assert_eq!(ctx.camera_position(), Vector3::new(0.0, 5.0, 3.0));
        assert_eq!(ctx.objects[1].transform().position, Vector3::new(0.0, 0.2, 0.0));
    }

    #[test]
    fn sky_follows_the_camera() {
        let mut ctx = context();
        let mut orchestrator = FrameOrchestrator::new();
        let mut input = InputState::new();
        press(&mut input, KeyCode::KeyD);
        press(&mut input, KeyCode::Space);

        let start = Instant::now();
        for frame in 0..5 {
            orchestrator.tick(&mut ctx, &input, start + Duration::from_millis(16 * frame));
            assert_eq!(ctx.sky.transform().position, ctx.camera_position());
        }
        assert!(ctx.camera_position().x > 0.0);
    }

    #[test]
    fn ball_rolls_relative_to_the_camera() {
        let mut ctx = context();
        let mut orchestrator = FrameOrchestrator::new();
        let mut input = InputState::new();
        let start = Instant::now();
        orchestrator.tick(&mut ctx, &input, start);

        // turn the camera to look down +x
        ctx.camera_manager.controller.add_motion(0.0, 0.0);
        ctx.camera_manager.controller.add_motion(900.0, 0.0);
        press(&mut input, KeyCode::ArrowUp);
        orchestrator.tick(&mut ctx, &input, start + Duration::from_millis(100));

        let ball = &ctx.objects[1];
        let moved = ball.transform().position - Vector3::new(0.0, 0.2, 0.0);
        assert!((moved - Vector3::new(0.25, 0.0, 0.0)).magnitude() < 1e-4);
        // static props ignore the arrows
        assert_eq!(ctx.objects[2].transform().position, Vector3::new(10.0, 0.1, 0.0));
    }

    #[test]
    fn escape_terminates_without_updating() {
        let mut ctx = context();
        let mut orchestrator = FrameOrchestrator::new();
        let mut input = InputState::new();
        let start = Instant::now();
        orchestrator.tick(&mut ctx, &input, start);

        press(&mut input, KeyCode::KeyW);
        press(&mut input, KeyCode::Escape);
        let state = orchestrator.tick(&mut ctx, &input, start + Duration::from_millis(50));

        assert_eq!(state, FrameState::Terminating);
        assert_eq!(ctx.camera_position(), Vector3::new(0.0, 5.0, 3.0));
        assert_eq!(
            orchestrator.tick(&mut ctx, &InputState::new(), start + Duration::from_secs(1)),
            FrameState::Terminating
        );
    }

    #[test]
    fn close_request_terminates_on_the_next_tick() {
        let mut ctx = context();
        let mut orchestrator = FrameOrchestrator::new();
        let mut input = InputState::new();
        let start = Instant::now();
        orchestrator.tick(&mut ctx, &input, start);

        input.request_close();
        let state = orchestrator.tick(&mut ctx, &input, start + Duration::from_millis(16));
        assert_eq!(state, FrameState::Terminating);
    }

    #[test]
    fn release_runs_in_reverse_draw_order() {
        let released = context().release();
        assert_eq!(released, vec!["plant", "ball", "street", "sky dome"]);
    }
}
