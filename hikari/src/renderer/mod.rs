mod render_worker;
mod tiles;

pub use tiles::TileGenerator;

use render_worker::{Message, SharedState};

use serde::{Deserialize, Serialize};
use std::{
    collections::VecDeque,
    sync::{
        atomic::Ordering,
        mpsc::{channel, Receiver},
        Arc, Mutex, PoisonError,
    },
    thread::JoinHandle,
    time::{Duration, Instant},
};

use crate::{
    camera::Camera,
    film::Film,
    hikari_debug, hikari_error, hikari_info, hikari_trace,
    integrators::Integrator,
    scene::Scene,
    Error, Result,
};

pub enum RenderStatus {
    Progress {
        active_threads: usize,
        tiles_done: usize,
        tiles_total: usize,
        approx_remaining_s: f32,
        current_rays_per_s: f32,
    },
    Finished {
        ray_count: usize,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSettings {
    pub samples_per_pixel: u32,
    /// Number of render threads, `0` uses one per logical core
    pub thread_count: usize,
    pub tile_dim: u16,
    pub seed: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            samples_per_pixel: 16,
            thread_count: 0,
            tile_dim: 16,
            seed: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Every tile got all of its samples
    Completed,
    /// Stopped by the caller, the image is valid but has missing samples
    Cancelled,
    /// A worker failed, the image holds what was rendered before that
    Failed { reason: String },
}

pub struct RenderResult {
    pub film: Film,
    pub outcome: RenderOutcome,
    pub tiles_done: usize,
    pub tiles_total: usize,
    pub ray_count: usize,
    pub invalid_samples: usize,
    pub elapsed_s: f32,
}

impl RenderResult {
    pub fn is_success(&self) -> bool {
        !matches!(self.outcome, RenderOutcome::Failed { .. })
    }
}

struct TileInfo {
    elapsed_s: f32,
    rays: usize,
}

/// Renders a [Scene] through a [Camera] into a [Film] using a pool of worker threads.
pub struct Renderer {
    scene: Arc<Scene>,
    camera: Camera,
    integrator: Arc<dyn Integrator>,
    settings: RenderSettings,
}

impl Renderer {
    pub fn new(
        scene: Arc<Scene>,
        camera: Camera,
        integrator: Arc<dyn Integrator>,
        settings: RenderSettings,
    ) -> Result<Self> {
        if settings.samples_per_pixel == 0 {
            return Err(Error::InvalidSettings(
                "Render needs at least one sample per pixel".into(),
            ));
        }
        if settings.tile_dim == 0 {
            return Err(Error::InvalidSettings("Tile size can't be zero".into()));
        }

        Ok(Self {
            scene,
            camera,
            integrator,
            settings,
        })
    }

    pub fn settings(&self) -> RenderSettings {
        self.settings
    }

    /// Launches the render on its worker threads.
    pub fn start(&self) -> Result<RenderHandle> {
        let res = self.camera.res();
        let tiles = Arc::new(TileGenerator::new(res, self.settings.tile_dim));
        let tiles_total = tiles.len();
        let film = Arc::new(Mutex::new(Film::new(res)));

        let thread_count = match self.settings.thread_count {
            0 => num_cpus::get(),
            n => n,
        }
        .clamp(1, tiles_total.max(1));

        hikari_info!(
            "Rendering {}x{} at {} spp, {} tiles on {} threads",
            res.x,
            res.y,
            self.settings.samples_per_pixel,
            tiles_total,
            thread_count
        );

        let state = Arc::new(SharedState::default());
        state.active_workers.store(thread_count, Ordering::SeqCst);

        let render_start = Instant::now();
        let (worker_send, from_workers) = channel();
        let mut workers = Vec::with_capacity(thread_count);
        for thread_id in 0..thread_count {
            let payload = render_worker::Payload {
                scene: Arc::clone(&self.scene),
                camera: self.camera.clone(),
                integrator: Arc::clone(&self.integrator),
                tiles: Arc::clone(&tiles),
                film: Arc::clone(&film),
                state: Arc::clone(&state),
                samples_per_pixel: self.settings.samples_per_pixel,
                seed: self.settings.seed,
                render_start,
            };
            let worker_send = worker_send.clone();

            match std::thread::Builder::new()
                .name(format!("RenderWorker{}", thread_id))
                .spawn(move || render_worker::launch(thread_id, payload, worker_send))
            {
                Ok(handle) => workers.push(handle),
                Err(why) => {
                    hikari_error!("Failed to spawn render thread {}: {}", thread_id, why);
                    state.active_workers.fetch_sub(1, Ordering::SeqCst);
                }
            }
        }

        if workers.is_empty() {
            return Err(Error::Render("No render threads could be spawned".into()));
        }

        let worker_count = workers.len();
        Ok(RenderHandle {
            rx: from_workers,
            workers,
            film,
            state,
            tiles_total,
            render_start,
            ray_count: 0,
            invalid_samples: 0,
            tile_infos: VecDeque::new(),
            finished_workers: 0,
            worker_count,
            finish_reported: false,
        })
    }
}

/// Handle to an ongoing render. Dropping the handle stops the render.
pub struct RenderHandle {
    rx: Receiver<Message>,
    workers: Vec<JoinHandle<()>>,
    film: Arc<Mutex<Film>>,
    state: Arc<SharedState>,
    tiles_total: usize,
    render_start: Instant,
    ray_count: usize,
    invalid_samples: usize,
    tile_infos: VecDeque<TileInfo>,
    finished_workers: usize,
    worker_count: usize,
    finish_reported: bool,
}

impl RenderHandle {
    /// Signals workers to stop after their current sample. Doesn't wait for them.
    pub fn stop(&self) {
        hikari_debug!("Stopping render");
        self.state.abort.store(true, Ordering::SeqCst);
    }

    /// Checks if all workers have finished.
    pub fn is_complete(&self) -> bool {
        self.state.active_workers.load(Ordering::SeqCst) == 0
    }

    /// Checks if the render has finished without a worker failing. Cancelled renders count as
    /// successful.
    pub fn is_success(&self) -> bool {
        self.is_complete() && self.failure().is_none()
    }

    pub fn tiles_done(&self) -> usize {
        self.state.tiles_done.load(Ordering::SeqCst)
    }

    pub fn tiles_total(&self) -> usize {
        self.tiles_total
    }

    /// Returns the time spent rendering so far, or in total once complete.
    pub fn elapsed(&self) -> Duration {
        let render_time = *self
            .state
            .render_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        render_time.unwrap_or_else(|| self.render_start.elapsed())
    }

    /// Returns the shared film. Finished tiles appear in it as the render progresses.
    pub fn film(&self) -> Arc<Mutex<Film>> {
        Arc::clone(&self.film)
    }

    /// Drains progress reports from the workers. Returns the newest status, `None` if there has
    /// been nothing new since the last call.
    pub fn check_status(&mut self) -> Option<RenderStatus> {
        let mut ret = None;

        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                Message::TileDone {
                    thread_id,
                    ray_count,
                    invalid_samples,
                    elapsed_s,
                } => {
                    hikari_trace!("check_status: Worker {} finished a tile", thread_id);
                    ret = Some(self.handle_tile_done(ray_count, invalid_samples, elapsed_s));
                }
                Message::Finished { thread_id } => {
                    hikari_trace!("check_status: Worker {} finished", thread_id);
                    self.finished_workers += 1;
                }
            }
        }

        if self.finished_workers == self.worker_count && !self.finish_reported {
            hikari_debug!("check_status: Render job has finished");
            self.finish_reported = true;
            ret = Some(RenderStatus::Finished {
                ray_count: self.ray_count,
            });
        }

        ret
    }

    /// Blocks until all workers have finished and returns the rendered image.
    pub fn wait(mut self) -> RenderResult {
        self.join_workers();
        // Workers are gone so this gets everything they sent
        self.check_status();

        let tiles_done = self.tiles_done();
        let outcome = match self.failure() {
            Some(reason) => RenderOutcome::Failed { reason },
            None if tiles_done == self.tiles_total => RenderOutcome::Completed,
            None => RenderOutcome::Cancelled,
        };

        let elapsed_s = self.elapsed().as_secs_f32();
        let film = self
            .film
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match &outcome {
            RenderOutcome::Failed { reason } => hikari_error!("Render failed: {}", reason),
            RenderOutcome::Cancelled => hikari_info!(
                "Render cancelled after {:.2}s, {}/{} tiles done",
                elapsed_s,
                tiles_done,
                self.tiles_total
            ),
            RenderOutcome::Completed => hikari_info!(
                "Render finished in {:.2}s, {:.2}M rays/s",
                elapsed_s,
                (self.ray_count as f32) / elapsed_s.max(f32::EPSILON) * 1e-6
            ),
        }

        RenderResult {
            film,
            outcome,
            tiles_done,
            tiles_total: self.tiles_total,
            ray_count: self.ray_count,
            invalid_samples: self.invalid_samples,
            elapsed_s,
        }
    }

    fn failure(&self) -> Option<String> {
        self.state
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn handle_tile_done(
        &mut self,
        rays: usize,
        invalid_samples: usize,
        elapsed_s: f32,
    ) -> RenderStatus {
        self.ray_count += rays;
        self.invalid_samples += invalid_samples;

        let avg_tile_window = 2 * self.worker_count;
        if self.tile_infos.len() >= avg_tile_window {
            self.tile_infos.pop_front();
        }
        self.tile_infos.push_back(TileInfo { elapsed_s, rays });

        let active_threads = self.state.active_workers.load(Ordering::SeqCst);
        let tiles_done = self.tiles_done();

        let avg_s_per_tile = self
            .tile_infos
            .iter()
            .map(|TileInfo { elapsed_s, .. }| elapsed_s)
            .sum::<f32>()
            / (self.tile_infos.len() as f32);

        let approx_remaining_s = avg_s_per_tile
            * (self.tiles_total.saturating_sub(tiles_done) as f32)
            / (active_threads.max(1) as f32);

        let current_rays_per_s = self
            .tile_infos
            .iter()
            // Sum of averages to downplay overtly expensive threads
            .map(|&TileInfo { elapsed_s, rays }| (rays as f32) / elapsed_s.max(f32::EPSILON))
            .sum::<f32>()
            / (self.tile_infos.len() as f32)
            * (active_threads as f32);

        RenderStatus::Progress {
            active_threads,
            tiles_done,
            tiles_total: self.tiles_total,
            approx_remaining_s,
            current_rays_per_s,
        }
    }

    fn join_workers(&mut self) {
        for handle in self.workers.drain(..) {
            // Tile panics are caught inside the worker so this only fails on bugs in the worker
            // itself
            if handle.join().is_err() {
                hikari_error!("Render thread panicked outside of a tile");
                let mut failure = self
                    .state
                    .failure
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                if failure.is_none() {
                    *failure = Some("Render thread panicked".into());
                }
            }
        }
    }
}

impl Drop for RenderHandle {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            self.state.abort.store(true, Ordering::SeqCst);
            self.join_workers();
        }
    }
}
