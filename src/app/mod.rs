use std::{
    sync::Arc,
    time::{
        Duration,
        Instant
    }
};

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{
        ElementState,
        WindowEvent
    },
    event_loop::{
        ActiveEventLoop,
        ControlFlow,
        EventLoop
    },
    keyboard::PhysicalKey,
    window::{
        Window,
        WindowId
    }
};

use crate::{
    assets::Assets,
    game::{
        config::{
            TICKS_PER_SECOND,
            WINDOW_HEIGHT,
            WINDOW_TITLE,
            WINDOW_WIDTH
        },
        input::KeyboardState,
        world::World
    },
    rendering::{
        compose_frame,
        renderer::{
            RenderError,
            Renderer
        }
    }
};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Event loop failed, reason='{0}'")]
    EventLoopError(#[from] winit::error::EventLoopError),

    #[error("Could not create window, reason='{0}'")]
    WindowError(#[from] winit::error::OsError),

    #[error("Renderer failed, reason='{0}'")]
    RenderError(#[from] RenderError),
}

/// Turns wall-clock time into a whole number of fixed simulation ticks.
#[derive(Debug)]
pub struct FixedTicker {
    tick_interval: Duration,
    max_ticks_per_frame: u32,
    accumulator: Duration,
}

impl FixedTicker {
    pub const MAX_TICKS_PER_FRAME: u32 = 5;

    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            tick_interval: Duration::from_secs(1) / ticks_per_second.max(1),
            max_ticks_per_frame: Self::MAX_TICKS_PER_FRAME,
            accumulator: Duration::ZERO,
        }
    }

    /// Ticks due after `elapsed`. Past the per-frame cap the backlog is dropped.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;

        let mut ticks = 0;
        while self.accumulator >= self.tick_interval {
            self.accumulator -= self.tick_interval;
            ticks += 1;

            if ticks == self.max_ticks_per_frame {
                if self.accumulator >= self.tick_interval {
                    log::debug!("Simulation behind by {:?}, dropping backlog", self.accumulator);
                    self.accumulator = Duration::ZERO;
                }
                break;
            }
        }
        ticks
    }
}

pub struct App {
    assets: Assets,
    world: World,
    keyboard: KeyboardState,
    ticker: FixedTicker,
    last_frame: Option<Instant>,
    renderer: Option<Renderer>,
    error: Option<AppError>,
}

impl App {
    pub fn new(assets: Assets) -> Self {
        let world = World::spawn(&assets.tilemap);
        Self {
            assets,
            world,
            keyboard: KeyboardState::new(),
            ticker: FixedTicker::new(TICKS_PER_SECOND),
            last_frame: None,
            renderer: None,
            error: None,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    fn create_renderer(&self, event_loop: &ActiveEventLoop) -> Result<Renderer, AppError> {
        let attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .with_resizable(true);
        let window = Arc::new(event_loop.create_window(attributes)?);
        log::info!("Window created");

        let renderer = pollster::block_on(Renderer::new(window, &self.assets))?;
        Ok(renderer)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn update(&mut self) {
        let now = Instant::now();
        let elapsed = self.last_frame
            .map(|last_frame| now - last_frame)
            .unwrap_or_default();
        self.last_frame = Some(now);

        let input = self.keyboard.snapshot();
        for _ in 0..self.ticker.advance(elapsed) {
            let report = self.world.tick(&input);
            if report.potions_triggered > 0 {
                log::debug!("{} potion(s) applied, health {}", report.potions_triggered, self.world.player.health);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        match self.create_renderer(event_loop) {
            Ok(renderer) => {
                renderer.get_window().request_redraw();
                self.renderer = Some(renderer);
            },
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("The close button was pressed; stopping");
                event_loop.exit();
            },
            WindowEvent::RedrawRequested => {
                self.update();

                let draws = compose_frame(&self.world, &self.assets.tilemap);
                let Some(renderer) = self.renderer.as_mut() else {
                    return;
                };
                if let Err(err) = renderer.render(&draws) {
                    self.fail(event_loop, err.into());
                    return;
                }

                // Emits a new redraw requested event.
                renderer.get_window().request_redraw();
            },
            WindowEvent::Resized(size) => {
                // Reconfigures the size of the surface. We do not re-render
                // here as this event is always followed up by redraw request.
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size);
                }
            },
            WindowEvent::Focused(false) => {
                self.keyboard.release_all();
            },
            WindowEvent::KeyboardInput { device_id: _, event, is_synthetic: _ } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.keyboard.press(key_code),
                        ElementState::Released => self.keyboard.release(key_code),
                    }
                }
            },
            _ => (),
        }
    }
}

/// Opens the window and runs the game until it is closed.
pub fn run(assets: Assets) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;

    // Games redraw continuously instead of waiting for input.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(assets);
    event_loop.run_app(&mut app)?;

    log::info!("Game finished after {} ticks", app.world().ticks());
    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[test]
fn test_fixed_ticker_accumulates_partial_frames() {
    let mut ticker = FixedTicker::new(60);
    let interval = Duration::from_secs(1) / 60;

    assert_eq!(ticker.advance(interval / 2), 0);
    assert_eq!(ticker.advance(interval / 2), 1);
    assert_eq!(ticker.advance(interval * 2), 2);
    assert_eq!(ticker.advance(Duration::ZERO), 0);
}

#[test]
fn test_fixed_ticker_caps_and_drops_backlog() {
    let mut ticker = FixedTicker::new(60);
    assert_eq!(ticker.advance(Duration::from_secs(10)), FixedTicker::MAX_TICKS_PER_FRAME);
    assert_eq!(ticker.advance(Duration::ZERO), 0);
}

#[test]
fn test_fixed_ticker_keeps_remainder_when_cap_is_hit_exactly() {
    let mut ticker = FixedTicker::new(60);
    let interval = Duration::from_secs(1) / 60;

    assert_eq!(ticker.advance(interval * 5 + interval / 2), FixedTicker::MAX_TICKS_PER_FRAME);
    assert_eq!(ticker.advance(interval / 2), 1);
}

#[test]
fn test_fixed_ticker_one_second_is_sixty_ticks() {
    let mut ticker = FixedTicker::new(TICKS_PER_SECOND);
    let frame = Duration::from_secs(1) / 60;
    let total: u32 = (0..60).map(|_| ticker.advance(frame)).sum();
    assert_eq!(total, 60);
}
