//! Pokemon Arena Battle Engine
//!
//! A turn-based battle engine for two trainers, human or AI, each fielding a
//! team of Pokemon. Turns are timed: a countdown runs for whoever is acting,
//! and running out of time costs PP. Each battle runs on its own tokio task.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod errors;
pub mod items;
pub mod move_data;
pub mod moves;
pub mod persistence;
pub mod player;
pub mod pokemon;
pub mod species;
pub mod teams;
pub mod type_chart;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{MoveCategory, PokemonType};

// --- From this crate's modules (`src/`) ---

// Battle engine, runner and state.
pub use battle::ai::{AiArchetype, Behavior};
pub use battle::mode::GameMode;
pub use battle::observer::{BattleObserver, NullObserver, PrintObserver};
pub use battle::runner::{BattleHandle, BattleRunner};
pub use battle::state::{
    ActionOutcome, BattleEvent, BattleState, EventBus, GameState, RejectReason, TurnEnd,
};

// Core runtime types for a battle.
pub use items::{EffectOutcome, Item, ItemEffect};
pub use moves::Move;
pub use player::{BattlePlayer, PlayerAction, PlayerType};
pub use pokemon::{MoveInstance, PokemonInst, Stats};
pub use species::Species;

// Static data access.
pub use config::BattleConfig;
pub use move_data::{get_move_data, moves_of_type, MoveData};
pub use type_chart::{initialize_type_chart, install_type_chart, type_chart, TypeChart};

// Crate-specific error and result types.
pub use errors::{
    ArenaError, ArenaResult, ConfigError, ConfigResult, PersistenceError, PersistenceResult,
    RunnerError,
};
