use crate::car::Garage;
use crate::input::Joypad;
use crate::overlay;
use crate::render::Renderer;
use crate::scene::{self, Camera};
use crate::state::ShowcaseState;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// Frame rate measured over one-second windows
#[derive(Debug)]
pub struct FpsCounter {
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        FpsCounter {
            frames_since_last_update: 0,
            last_fps_calculation: now,
            fps: 0.0,
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.frames_since_last_update += 1;
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}

/// Runtime switches of the showcase loop
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Minimum time per frame, `None` runs unpaced
    pub frame_time: Option<Duration>,
    /// Stop after this many frames
    pub max_frames: Option<u64>,
    /// Draw version, angle and FPS
    pub debug: bool,
}

/// The showcase: owns the cars, the state and both engine seams
pub struct App<J: Joypad, R: Renderer> {
    garage: Garage,
    state: ShowcaseState,
    camera: Camera,
    joypad: J,
    renderer: R,
    options: AppOptions,
    fps: FpsCounter,
}

impl<J: Joypad, R: Renderer> App<J, R> {
    pub fn new(garage: Garage, joypad: J, renderer: R, options: AppOptions) -> Self {
        App {
            garage,
            state: ShowcaseState::new(),
            camera: Camera::default(),
            joypad,
            renderer,
            options,
            fps: FpsCounter::new(Instant::now()),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &ShowcaseState {
        &self.state
    }

    /// Polls input, updates and renders one frame. Returns `false` once quit
    /// was requested.
    pub fn step(&mut self) -> anyhow::Result<bool> {
        let inputs = self.joypad.poll()?;
        if inputs.quit {
            debug!("Quit requested");
            return Ok(false);
        }

        let previous_car = self.state.current_car;
        self.state.update(&inputs, self.garage.len());
        if self.state.current_car != previous_car {
            debug!(
                "Switched to car {} ({})",
                self.state.current_car,
                self.garage
                    .get(self.state.current_car)
                    .map_or("?", |car| car.pars.name.as_str())
            );
        }

        let mut frame = scene::compose(&self.state, &self.garage, &self.camera);
        if self.options.debug {
            frame
                .overlay
                .extend(overlay::debug_lines(self.state.rotation_y, self.fps.fps()));
        }
        self.renderer.draw_frame(&frame)?;
        self.fps.tick(Instant::now());
        trace!(
            rotation = self.state.rotation_y,
            drawn = frame.model.is_some(),
            "frame"
        );
        Ok(true)
    }

    /// Runs until quit or the frame limit, then releases every model.
    /// Returns the number of frames drawn.
    pub fn run(mut self) -> anyhow::Result<u64> {
        info!("Showcase running with {} cars", self.garage.len());
        let mut frames = 0u64;
        loop {
            if self
                .options
                .max_frames
                .is_some_and(|max_frames| frames >= max_frames)
            {
                break;
            }
            let started = Instant::now();
            if !self.step()? {
                break;
            }
            frames += 1;

            if let Some(frame_time) = self.options.frame_time {
                let elapsed = started.elapsed();
                if elapsed < frame_time {
                    std::thread::sleep(frame_time - elapsed);
                }
            }
        }

        self.shutdown();
        info!("Showcase stopped after {} frames", frames);
        Ok(frames)
    }

    fn shutdown(&mut self) {
        self.garage.release();
    }
}
