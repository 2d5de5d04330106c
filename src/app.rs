use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::canvas::Canvas;
use crate::config::{
    CELL_SIZE, DEFAULT_COLOR_COUNT, DEFAULT_GROUP_COLOR, DEFAULT_GROUP_NAME, DEFAULT_TICK_RATE,
    VIEW_PAN_SPEED, VIEW_ZOOM_IN, VIEW_ZOOM_OUT, WINDOW_HEIGHT, WINDOW_WIDTH,
};
use crate::error::InitError;
use crate::gpu::{GpuContext, GridBuffers, RenderPipeline};
use crate::scheduler::Scheduler;
use crate::simulation::{GroupId, Heading, Rgb, RuleTable, SimulationEngine};
use crate::view::View;

/// Everything that only exists once a window and device are up
struct GpuState {
    context: GpuContext,
    buffers: GridBuffers,
    pipeline: RenderPipeline,
    bind_group: wgpu::BindGroup,
}

impl GpuState {
    fn new(window: Arc<Window>, canvas: &Canvas) -> Result<Self, InitError> {
        log::info!("Creating GPU context...");
        let context = pollster::block_on(GpuContext::new(window))?;

        log::info!("Creating render pipeline...");
        let pipeline = RenderPipeline::new(&context.device, context.format());
        let buffers = GridBuffers::new(&context.device, canvas.width(), canvas.height());
        let bind_group = pipeline.create_bind_group(&context.device, &buffers);

        Ok(Self {
            context,
            buffers,
            pipeline,
            bind_group,
        })
    }

    /// Reallocate the grid buffers when the grid dimensions changed
    fn fit(&mut self, canvas: &Canvas) {
        if self.buffers.matches(canvas) {
            return;
        }
        log::debug!("Reallocating grid buffers for {}x{}", canvas.width(), canvas.height());
        self.buffers = GridBuffers::new(&self.context.device, canvas.width(), canvas.height());
        self.bind_group = self
            .pipeline
            .create_bind_group(&self.context.device, &self.buffers);
    }
}

/// Application state: the simulation plus the window that shows and drives it
pub struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    engine: SimulationEngine,
    scheduler: Scheduler,
    canvas: Canvas,
    view: View,
    selected: Option<GroupId>,
    color_count: usize,
    clock: Instant,
    cursor: (f32, f32),
    fps_counter: FpsCounter,
}

impl App {
    pub fn new() -> Self {
        let (width, height) = grid_dimensions(WINDOW_WIDTH, WINDOW_HEIGHT);
        let engine = SimulationEngine::new(DEFAULT_COLOR_COUNT, width, height);
        let selected = engine.groups().next().map(|group| group.id);

        Self {
            window: None,
            gpu: None,
            canvas: Canvas::from_grid(engine.grid()),
            view: View::new(width, height, WINDOW_WIDTH, WINDOW_HEIGHT),
            color_count: engine.color_count(),
            engine,
            scheduler: Scheduler::new(DEFAULT_TICK_RATE),
            selected,
            clock: Instant::now(),
            cursor: (0.0, 0.0),
            fps_counter: FpsCounter::new(),
        }
    }

    /// Stop the run and start over on a blank grid sized to the window
    fn reset(&mut self, color_count: usize) {
        self.scheduler.pause();

        let (viewport_width, viewport_height) = self.viewport();
        let (width, height) = grid_dimensions(viewport_width, viewport_height);
        self.engine.reset(color_count, width, height);
        self.color_count = self.engine.color_count();

        let grid = self.engine.grid();
        self.canvas = Canvas::from_grid(grid);
        self.view.set_viewport(viewport_width, viewport_height);
        self.view.set_grid_size(grid.width(), grid.height());

        if self.selected.and_then(|id| self.engine.group(id)).is_none() {
            self.selected = self.engine.groups().next().map(|group| group.id);
        }

        if let Some(gpu) = &mut self.gpu {
            gpu.fit(&self.canvas);
        }
        self.request_redraw();
    }

    fn render(&mut self) {
        let now = self.clock.elapsed();
        let Self {
            scheduler,
            engine,
            canvas,
            ..
        } = self;
        scheduler.frame(now, || canvas.apply(engine.tick()));
        canvas.mark_agents(engine);

        let viewport = self.viewport();
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        gpu.buffers.upload(&gpu.context.queue, &self.canvas);
        gpu.buffers.update_view(
            &gpu.context.queue,
            &self.view,
            viewport,
            gpu.context.is_srgb(),
        );

        // Get surface texture
        let output = match gpu.context.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reconfigure surface
                gpu.context
                    .surface
                    .configure(&gpu.context.device, &gpu.context.config);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            gpu.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("frame-encoder"),
                });
        gpu.pipeline.draw(&mut encoder, &view, &gpu.bind_group);

        gpu.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(fps) = self.fps_counter.tick() {
            self.update_title(fps);
        }
    }

    fn update_title(&self, fps: f64) {
        let Some(window) = &self.window else {
            return;
        };
        let state = if self.scheduler.is_running() { "Running" } else { "Paused" };
        let group = self
            .selected
            .and_then(|id| self.engine.group(id))
            .map_or("no group", |group| group.name.as_str());
        window.set_title(&format!(
            "Ant Colonies - {} - {} ticks/s - {} colors - {} of {} groups - {} ants - {:.0} FPS",
            state,
            self.scheduler.tick_rate(),
            self.color_count,
            group,
            self.engine.group_count(),
            self.engine.agents().len(),
            fps
        ));
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        match key_code {
            // Start / pause / resume
            KeyCode::Space => {
                if self.scheduler.toggle() {
                    log::info!("Simulation running");
                } else {
                    log::info!(
                        "Simulation paused at tick {} with {} cells painted",
                        self.engine.tick_count(),
                        self.engine.grid().painted_count()
                    );
                }
            }

            // Add an ant to the selected group
            KeyCode::KeyA => {
                if let Some(group) = self.selected {
                    self.engine.add_agent(group);
                }
            }

            // New random group, selected right away
            KeyCode::KeyG => {
                self.selected = Some(self.engine.add_group());
            }

            // Another classic Langton group
            KeyCode::KeyL => {
                let rules = RuleTable::langton(self.color_count);
                self.selected = Some(self.engine.add_group_with_rules(
                    DEFAULT_GROUP_NAME,
                    Rgb(DEFAULT_GROUP_COLOR),
                    rules,
                ));
            }

            KeyCode::Tab => self.select_next_group(),

            KeyCode::Delete | KeyCode::Backspace => {
                if let Some(group) = self.selected.take() {
                    self.engine.remove_group(group);
                    self.selected = self.engine.groups().next().map(|group| group.id);
                }
            }

            KeyCode::KeyR => self.reset(self.color_count),

            // Color count: 2-9, 0 for 10
            KeyCode::Digit2 => self.reset(2),
            KeyCode::Digit3 => self.reset(3),
            KeyCode::Digit4 => self.reset(4),
            KeyCode::Digit5 => self.reset(5),
            KeyCode::Digit6 => self.reset(6),
            KeyCode::Digit7 => self.reset(7),
            KeyCode::Digit8 => self.reset(8),
            KeyCode::Digit9 => self.reset(9),
            KeyCode::Digit0 => self.reset(10),

            // Speed
            KeyCode::Equal | KeyCode::NumpadAdd => {
                let rate = self.scheduler.tick_rate().saturating_mul(2);
                self.scheduler.set_tick_rate(rate);
                self.log_tick_rate();
            }
            KeyCode::Minus | KeyCode::NumpadSubtract => {
                let rate = self.scheduler.tick_rate() / 2;
                self.scheduler.set_tick_rate(rate);
                self.log_tick_rate();
            }

            // Pan view
            KeyCode::ArrowUp => self.view.pan_by(0.0, VIEW_PAN_SPEED),
            KeyCode::ArrowDown => self.view.pan_by(0.0, -VIEW_PAN_SPEED),
            KeyCode::ArrowLeft => self.view.pan_by(VIEW_PAN_SPEED, 0.0),
            KeyCode::ArrowRight => self.view.pan_by(-VIEW_PAN_SPEED, 0.0),

            // Zoom
            KeyCode::KeyQ => self.view.zoom_centered(VIEW_ZOOM_OUT),
            KeyCode::KeyE => self.view.zoom_centered(VIEW_ZOOM_IN),

            KeyCode::KeyV => {
                self.view.reset();
                log::info!("View reset");
            }

            _ => {}
        }
    }

    fn handle_mouse(&mut self, button: MouseButton, state: ElementState) {
        let (x, y) = self.cursor;
        match (button, state) {
            (MouseButton::Left, ElementState::Pressed) => self.view.begin_drag(x, y),
            (MouseButton::Left, ElementState::Released) => self.view.end_drag(),
            // Drop an ant of the selected group under the cursor
            (MouseButton::Right, ElementState::Pressed) => {
                if let (Some(group), Some((cx, cy))) = (self.selected, self.view.screen_to_cell(x, y)) {
                    self.engine.add_agent_at(group, cx, cy, Heading::Up);
                }
            }
            _ => {}
        }
    }

    fn log_tick_rate(&self) {
        log::info!(
            "Tick rate: {}/s ({:?} per tick)",
            self.scheduler.tick_rate(),
            self.scheduler.tick_interval()
        );
    }

    fn select_next_group(&mut self) {
        let ids: Vec<GroupId> = self.engine.groups().map(|group| group.id).collect();
        self.selected = match self.selected.and_then(|id| ids.iter().position(|&g| g == id)) {
            Some(i) => ids.get((i + 1) % ids.len()).copied(),
            None => ids.first().copied(),
        };
        if let Some(group) = self.selected.and_then(|id| self.engine.group(id)) {
            log::info!("Selected {} ({})", group.name, group.color.to_hex());
        }
    }

    fn viewport(&self) -> (u32, u32) {
        match &self.window {
            Some(window) => {
                let size = window.inner_size();
                (size.width, size.height)
            }
            None => (WINDOW_WIDTH, WINDOW_HEIGHT),
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Initializing ant colonies...");

        let window_attrs = Window::default_attributes()
            .with_title("Ant Colonies - Initializing...")
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("{}", InitError::from(e));
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        // Size the grid to the real window before the GPU buffers are made
        self.reset(self.color_count);

        match GpuState::new(window, &self.canvas) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        }

        log::info!(
            "Grid size: {}x{}",
            self.engine.grid().width(),
            self.engine.grid().height()
        );
        log::info!("Controls:");
        log::info!("  Space: Start/pause");
        log::info!("  A: Add ant to selected group, right click: add ant at cursor");
        log::info!("  G: New random group, L: New Langton group");
        log::info!("  Tab: Select next group, Delete: Remove group");
        log::info!("  R: Reset, 2-9/0: Reset with 2-10 colors");
        log::info!("  +/-: Faster/slower");
        log::info!("  Arrows or drag: Pan, Q/E or wheel: Zoom, V: Reset view");
        log::info!("  Escape: Quit");

        self.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            event_loop.exit();
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                if self.view.is_dragging() {
                    self.view.drag_to(self.cursor.0, self.cursor.1);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => self.handle_mouse(button, state),
            WindowEvent::MouseWheel { delta, .. } => {
                let up = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y > 0.0,
                    MouseScrollDelta::PixelDelta(position) => position.y > 0.0,
                };
                let factor = if up { VIEW_ZOOM_IN } else { VIEW_ZOOM_OUT };
                self.view.zoom_at(factor, self.cursor.0, self.cursor.1);
            }
            WindowEvent::Resized(new_size) => {
                log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.context.resize(new_size);
                }
                // the grid keeps its size until the next reset
                self.view.set_viewport(new_size.width, new_size.height);
            }
            WindowEvent::RedrawRequested => {
                self.render();
                // Request another frame immediately
                self.request_redraw();
            }
            _ => {}
        }
    }
}

/// Grid dimensions that fill a viewport at the base cell size
fn grid_dimensions(viewport_width: u32, viewport_height: u32) -> (u32, u32) {
    (
        (viewport_width / CELL_SIZE).max(1),
        (viewport_height / CELL_SIZE).max(1),
    )
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions_from_viewport() {
        assert_eq!(grid_dimensions(1024, 768), (256, 192));
        assert_eq!(grid_dimensions(3, 2), (1, 1));
    }
}
