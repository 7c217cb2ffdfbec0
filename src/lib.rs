pub mod cli;
pub mod display;
pub mod error;
pub mod manager;
pub mod models;
pub mod schema;
pub mod settings;

pub use crate::error::{ParticipationError, Result};
pub use crate::manager::ParticipationManager;
pub use crate::settings::Settings;

/// Connects to the database configured in `config.toml` or the environment.
pub fn create_default_manager() -> Result<ParticipationManager> {
    let settings = Settings::load()?;

    ParticipationManager::from_settings(&settings)
}
