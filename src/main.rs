//! Pixel Breaker headless runner
//!
//! Plays the game on autopilot without a window:
//!
//! ```text
//! pixel-breaker [IMAGE] [GRID_SIZE]
//! ```
//!
//! Settings come from the JSON file named by `PIXEL_BREAKER_SETTINGS`
//! (defaults otherwise). The browser build lives in `pixel_breaker::web`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::Path;

    use pixel_breaker::{GameError, Result};
    use pixel_breaker::consts::FRAME_MS;
    use pixel_breaker::pixelate::{ImagePixelizer, PixelSource};
    use pixel_breaker::renderer::{Frame, RenderSurface, build_frame};
    use pixel_breaker::settings::Settings;
    use pixel_breaker::sim::{Command, GamePhase, GameState, GridSize, TickInput, UploadOutcome, tick};

    /// Simulated frames per run (two minutes at 60 fps)
    const DEMO_TICKS: u64 = 60 * 120;
    /// Log a status line every N frames
    const REPORT_EVERY: u64 = 600;

    /// Surface that reports frames to the log instead of drawing them
    #[derive(Default)]
    struct LogSurface {
        frames: u64,
    }

    impl RenderSurface for LogSurface {
        fn draw(&mut self, frame: &Frame) {
            self.frames += 1;
            if self.frames % REPORT_EVERY == 0 {
                log::info!(
                    "[{:>5}] {:?}: balls {}/{}, bricks left {}, {} triangles",
                    self.frames,
                    frame.hud.phase,
                    frame.hud.balls,
                    frame.hud.max_balls,
                    frame.hud.remaining_bricks,
                    frame.vertices.len() / 3
                );
            }
        }
    }

    fn load_image(state: &mut GameState, path: &Path, grid_size: GridSize) -> Result<()> {
        let ticket = state.begin_upload(grid_size);
        let response = std::fs::read(path)
            .map_err(GameError::from)
            .and_then(|bytes| ImagePixelizer.pixelize(&bytes, grid_size));
        if let UploadOutcome::Applied { bricks } = state.complete_upload(ticket, response)? {
            log::info!("Loaded {} as {} bricks", path.display(), bricks);
        }
        Ok(())
    }

    pub fn run() -> Result<()> {
        let settings = match std::env::var_os("PIXEL_BREAKER_SETTINGS") {
            Some(path) => Settings::load_or_default(path),
            None => Settings::default(),
        };
        let mut args = std::env::args().skip(1);
        let image = args.next();
        let grid_size = match args.next() {
            Some(arg) => arg.parse::<GridSize>()?,
            None => settings.grid_size,
        };

        let mut state = GameState::new(settings)?;
        if let Some(image) = image {
            // Keep playing the current layout if the image is unusable
            if let Err(e) = load_image(&mut state, Path::new(&image), grid_size) {
                log::warn!("Could not use {image}: {e}");
            }
        } else if grid_size != state.grid_size {
            state.set_grid_size(grid_size);
        }

        state.apply_command(Command::Start)?;
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut surface = LogSurface::default();
        let (mut destroyed, mut wins, mut losses) = (0, 0, 0);

        for _ in 0..DEMO_TICKS {
            let events = tick(&mut state, &input);
            destroyed += events.bricks_destroyed;
            match events.phase_change {
                Some(GamePhase::GameWin) => wins += 1,
                Some(GamePhase::GameOver) => losses += 1,
                _ => {}
            }
            surface.draw(&build_frame(&state));
        }

        log::info!(
            "Simulated {:.0}s: {} bricks destroyed, {} wins, {} losses, {} balls in play",
            DEMO_TICKS as f32 * FRAME_MS / 1000.0,
            destroyed,
            wins,
            losses,
            state.balls.len()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pixel Breaker (headless) starting...");

    match native::run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is pixel_breaker::web::start, this is just to satisfy the compiler
}
