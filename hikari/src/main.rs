use std::{path::PathBuf, sync::Arc, thread, time::Duration};

use hikari::{
    camera::Camera,
    hikari_error, hikari_info,
    renderer::{RenderOutcome, RenderStatus, Renderer},
    settings::Settings,
};

fn setup_logger(level: log::LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}:{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.level(),
                record.target(),
                record.line().unwrap_or(0),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .chain(fern::log_file("hikari.log")?)
        .apply()?;
    Ok(())
}

fn run(settings: Settings) -> hikari::Result<()> {
    let (scene, camera_params) = settings.scene.build(settings.index);
    let camera = Camera::new(camera_params, settings.res)?;
    let integrator = settings.integrator.instantiate();

    let renderer = Renderer::new(Arc::new(scene), camera, integrator, settings.render)?;
    let mut handle = renderer.start()?;

    while !handle.is_complete() {
        thread::sleep(Duration::from_millis(500));
        if let Some(RenderStatus::Progress {
            tiles_done,
            tiles_total,
            approx_remaining_s,
            current_rays_per_s,
            ..
        }) = handle.check_status()
        {
            hikari_info!(
                "{}/{} tiles, ~{:.1}s remaining, {:.2}M rays/s",
                tiles_done,
                tiles_total,
                approx_remaining_s,
                current_rays_per_s * 1e-6
            );
        }
    }

    let result = handle.wait();
    if result.invalid_samples > 0 {
        hikari_error!("{} invalid samples were dropped", result.invalid_samples);
    }

    // A partial image is still worth writing out
    result.film.write_exr(&settings.output)?;

    match result.outcome {
        RenderOutcome::Failed { reason } => Err(hikari::Error::Render(reason)),
        RenderOutcome::Completed | RenderOutcome::Cancelled => Ok(()),
    }
}

fn main() {
    let settings_path = std::env::args().nth(1).map(PathBuf::from);

    let settings = match settings_path.as_deref() {
        Some(path) => match Settings::load(path) {
            Ok(settings) => settings,
            Err(why) => {
                eprintln!("{}", why);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    if let Err(why) = setup_logger(settings.log_level.into()) {
        panic!("{}", why);
    };

    if let Err(why) = run(settings) {
        hikari_error!("{}", why);
        std::process::exit(1);
    }
}
