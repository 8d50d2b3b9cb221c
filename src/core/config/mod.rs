pub mod config;

pub use config::{AppConfig, AudioConfig, GameConfig, SessionConfig, SpawnConfig};
