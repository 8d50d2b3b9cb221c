pub mod plugin;
pub mod spawn;
pub mod state;
