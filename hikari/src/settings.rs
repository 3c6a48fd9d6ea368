use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

use std::path::{Path, PathBuf};

use crate::{
    accel::IndexSettings, hikari_debug, integrators::IntegratorType, math::Vec2,
    renderer::RenderSettings, scenes::BuiltinScene, Error, Result,
};

#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    Display,
    EnumVariantNames,
    EnumString,
)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Everything a headless render needs. Missing fields take their default values.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub res: Vec2<u16>,
    pub render: RenderSettings,
    pub integrator: IntegratorType,
    pub index: IndexSettings,
    pub scene: BuiltinScene,
    pub output: PathBuf,
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            res: Vec2::new(640, 480),
            render: RenderSettings::default(),
            integrator: IntegratorType::default(),
            index: IndexSettings::default(),
            scene: BuiltinScene::default(),
            output: PathBuf::from("hikari.exr"),
            log_level: LogLevel::default(),
        }
    }
}

impl Settings {
    /// Loads and validates settings from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        hikari_debug!("Loading settings from '{}'", path.to_string_lossy());
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    /// Parses and validates settings from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.res.x == 0 || self.res.y == 0 {
            return Err(Error::InvalidSettings(format!(
                "Resolution {}x{} has no pixels",
                self.res.x, self.res.y
            )));
        }
        if self.render.samples_per_pixel == 0 {
            return Err(Error::InvalidSettings(
                "samples_per_pixel has to be at least 1".into(),
            ));
        }
        if self.render.tile_dim == 0 {
            return Err(Error::InvalidSettings(
                "tile_dim has to be at least 1".into(),
            ));
        }
        Ok(())
    }
}
