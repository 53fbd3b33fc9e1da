use std::{sync::Arc, time::Instant};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    error::EventLoopError,
    event::{DeviceEvent, DeviceId, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowAttributes, WindowId},
};

use crate::{
    config::ViewerConfig,
    error::RenderError,
    frame::{FrameContext, FrameOrchestrator, FrameState},
    gfx::RenderEngine,
    input::InputState,
};

/// Exit status when the window or GPU device cannot be created.
pub const INIT_FAILURE_EXIT_CODE: i32 = -1;

pub struct KickaboutApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    frame: Option<FrameContext>,
    orchestrator: FrameOrchestrator,
    input: InputState,
    exit_code: i32,
}

impl KickaboutApp {
    /// Creates the event loop and builds the scene. Models are read here;
    /// GPU resources follow once the window exists.
    pub fn new(config: ViewerConfig) -> Result<Self, EventLoopError> {
        let event_loop = EventLoop::new()?;
        let frame = FrameContext::from_config(&config);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                frame: Some(frame),
                orchestrator: FrameOrchestrator::new(),
                input: InputState::new(),
                exit_code: 0,
            },
        })
    }

    /// Runs until the viewer terminates and returns the process exit code.
    pub fn run(mut self) -> Result<i32, EventLoopError> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(self.app_state.exit_code);
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;
        Ok(self.app_state.exit_code)
    }
}

impl AppState {
    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RenderError> {
        let window = event_loop.create_window(
            WindowAttributes::default()
                .with_title(self.config.title.clone())
                .with_inner_size(PhysicalSize::new(self.config.width, self.config.height)),
        )?;
        let window = Arc::new(window);
        self.window = Some(window.clone());

        grab_cursor(&window);

        let PhysicalSize { width, height } = window.inner_size();
        let renderer = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            &self.config,
        ))?;

        if let Some(frame) = self.frame.as_mut() {
            frame
                .camera_manager
                .camera
                .resize_projection(width, height);
            frame.init_gpu_resources(&renderer.upload_context());
        }

        log::info!("Viewer ready ({}x{})", width, height);
        self.render_engine = Some(renderer);
        Ok(())
    }

    /// Releases the scene exactly once and stops the loop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(frame) = self.frame.take() {
            let released = frame.release();
            log::info!("Released {} scene objects", released.len());
        }
        self.render_engine = None;
        event_loop.exit();
    }
}

fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    if let Err(err) = grabbed {
        log::warn!("Could not grab the cursor: {}", err);
    }
    window.set_cursor_visible(false);
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init_graphics(event_loop) {
            log::error!("Failed to initialise graphics: {}", err);
            self.exit_code = INIT_FAILURE_EXIT_CODE;
            self.shutdown(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state,
                        ..
                    },
                ..
            } => {
                self.input.process_key(key_code, state);
            }
            WindowEvent::CloseRequested => {
                self.input.request_close();
                // minimised windows may not be sent redraws on their own
                if let Some(ref window) = self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::Focused(false) => {
                self.input.release_all();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(frame) = self.frame.as_mut() {
                    frame
                        .camera_manager
                        .camera
                        .resize_projection(width, height);
                }
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::RedrawRequested => {
                let (Some(render_engine), Some(frame)) =
                    (self.render_engine.as_mut(), self.frame.as_mut())
                else {
                    return;
                };

                match self.orchestrator.tick(frame, &self.input, Instant::now()) {
                    FrameState::Running => render_engine.render_frame(frame),
                    FrameState::Terminating => self.shutdown(event_loop),
                }
            }
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let Some(frame) = self.frame.as_mut() {
            frame.camera_manager.process_event(&event);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(frame) = self.frame.take() {
            frame.release();
        }
    }
}
