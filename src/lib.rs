pub mod app;
pub mod core;
pub mod debug;
pub mod gameplay;
pub mod interaction;

// Curated re-exports
pub use app::game::GamePlugin;
pub use app::state::{InputKind, Phase};
pub use crate::core::components::{Target, TargetId, TargetSet};
pub use crate::core::config::config::GameConfig;
pub use crate::core::errors::{SessionError, SpawnError};
pub use crate::core::events::{AssetsReady, PlayerCommand, SessionEvent, TargetHit};
pub use gameplay::spawn::{BurstEvent, BurstReport, SpawnScheduler};
pub use gameplay::state::{SessionState, SessionStateMachine};
pub use interaction::collaborators::{Collaborators, ImmersiveHost, Narrator, TargetPool};
