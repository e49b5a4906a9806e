//! Data-driven gameplay balance
//!
//! Keep this separate from player preferences (`Settings`): tuning changes how
//! the game plays, settings only change how it looks.

mod camera;
mod player;

pub use camera::CameraTuning;
pub use player::PlayerTuning;

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::persistence::LevelError;

/// Load a tuning table from a JSON file
///
/// Fields missing from the file keep their defaults.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, LevelError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let value = serde_json::from_str(&text)?;
    log::info!("Loaded tuning from {}", path.as_ref().display());
    Ok(value)
}
