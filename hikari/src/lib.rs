pub mod accel;
pub mod camera;
mod error;
pub mod film;
pub mod integrators;
pub mod lights;
pub mod macros;
pub mod materials;
pub mod math;
pub mod media;
pub mod primitive;
pub mod renderer;
pub mod sampling;
pub mod scene;
pub mod scenes;
pub mod settings;
pub mod shapes;

pub use error::{Error, Result};

#[doc(hidden)]
pub use log;
