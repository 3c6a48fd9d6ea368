use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        mpsc::Sender,
        Arc, Mutex, PoisonError,
    },
    time::{Duration, Instant},
};

use super::tiles::TileGenerator;
use crate::{
    camera::Camera,
    film::{Film, FilmTile},
    hikari_debug, hikari_error, hikari_trace,
    integrators::{Integrator, TileStats},
    math::Spectrum,
    sampling::Sampler,
    scene::Scene,
};

pub enum Message {
    TileDone {
        thread_id: usize,
        ray_count: usize,
        invalid_samples: usize,
        elapsed_s: f32,
    },
    Finished {
        thread_id: usize,
    },
}

/// State shared between the workers of a render and its handle
#[derive(Default)]
pub struct SharedState {
    /// Set to stop workers after their current sample
    pub abort: AtomicBool,
    pub tiles_done: AtomicUsize,
    pub active_workers: AtomicUsize,
    pub failure: Mutex<Option<String>>,
    pub render_time: Mutex<Option<Duration>>,
}

pub struct Payload {
    pub scene: Arc<Scene>,
    pub camera: Camera,
    pub integrator: Arc<dyn Integrator>,
    pub tiles: Arc<TileGenerator>,
    pub film: Arc<Mutex<Film>>,
    pub state: Arc<SharedState>,
    pub samples_per_pixel: u32,
    pub seed: u64,
    pub render_start: Instant,
}

pub fn launch(thread_id: usize, payload: Payload, to_parent: Sender<Message>) {
    hikari_debug!("Render thread {}: Begin", thread_id);

    let Payload {
        scene,
        camera,
        integrator,
        tiles,
        film,
        state,
        samples_per_pixel,
        seed,
        render_start,
    } = payload;

    let mut sampler = Sampler::new(seed);
    let mut tile_pixels = Vec::new();

    while !state.abort.load(Ordering::Relaxed) {
        let tile = match tiles.next() {
            Some(tile) => tile,
            None => break,
        };

        tile_pixels.clear();
        tile_pixels.resize(tile.pixel_count(), Spectrum::zeros());

        hikari_trace!("Render thread {}: Render tile {:?}", thread_id, tile.bb);
        let tile_start = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            integrator.render(
                &scene,
                &camera,
                &mut sampler,
                samples_per_pixel,
                &tile,
                &mut tile_pixels,
                &mut || state.abort.load(Ordering::Relaxed),
            )
        }));

        match result {
            Ok(stats) => {
                update_tile(thread_id, &tile, &tile_pixels, &film);

                if stats.interrupted {
                    hikari_debug!("Render thread {}: Interrupted", thread_id);
                    break;
                }
                state.tiles_done.fetch_add(1, Ordering::SeqCst);
                signal_tile_done(thread_id, stats, tile_start, &to_parent);
            }
            Err(why) => {
                let reason = format!(
                    "Render thread {} panicked on tile {:?}: {}",
                    thread_id,
                    tile.bb,
                    panic_message(why.as_ref())
                );
                hikari_error!("{}", reason);

                // Fail fast, the first failure is the one reported
                state.abort.store(true, Ordering::SeqCst);
                let mut failure = state.failure.lock().unwrap_or_else(PoisonError::into_inner);
                if failure.is_none() {
                    *failure = Some(reason);
                }
                break;
            }
        }
    }

    hikari_trace!("Render thread {}: Signal done", thread_id);
    if let Err(why) = to_parent.send(Message::Finished { thread_id }) {
        // The handle might have already been dropped, nothing to worry about
        hikari_trace!(
            "Render thread {}: Error notifying parent on finish: {}",
            thread_id,
            why
        );
    }

    // Last one out records the render time
    if state.active_workers.fetch_sub(1, Ordering::SeqCst) == 1 {
        *state
            .render_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(render_start.elapsed());
    }

    hikari_debug!("Render thread {}: End", thread_id);
}

fn update_tile(
    thread_id: usize,
    tile: &FilmTile,
    tile_pixels: &[Spectrum<f32>],
    film: &Mutex<Film>,
) {
    hikari_trace!("Render thread {}: Waiting for lock on film", thread_id);
    // Tiles don't overlap so a panic on another thread can't have left our pixels in a bad state
    let mut film = film.lock().unwrap_or_else(PoisonError::into_inner);
    hikari_trace!("Render thread {}: Acquired film", thread_id);

    film.update_tile(tile, tile_pixels);

    hikari_trace!("Render thread {}: Releasing film", thread_id);
}

fn signal_tile_done(
    thread_id: usize,
    stats: TileStats,
    tile_start: Instant,
    to_parent: &Sender<Message>,
) {
    if let Err(why) = to_parent.send(Message::TileDone {
        thread_id,
        ray_count: stats.ray_count,
        invalid_samples: stats.invalid_samples,
        elapsed_s: tile_start.elapsed().as_secs_f32(),
    }) {
        hikari_trace!(
            "Render thread {}: Error notifying parent on tile done: {}",
            thread_id,
            why
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
