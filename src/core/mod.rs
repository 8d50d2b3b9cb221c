pub mod components;
pub mod config;
pub mod errors;
pub mod events;
pub mod system;
