pub mod combat;
pub mod movement;
pub mod player;
pub mod registry;
pub mod settings;
pub mod world;

pub use combat::{CombatEvent, KillerSummary, VictimSummary};
pub use player::{AttackKind, Player, PlayerId};
pub use registry::PlayerRegistry;
pub use settings::{CombatMode, GameSettings, TickConfig};
pub use world::ArenaWorld;
