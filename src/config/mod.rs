//! Project configuration loaded from `.cerbero.toml`.

pub mod settings;

pub use settings::Settings;
