//! Farm simulation engine for the Agent Farm.
//!
//! This crate turns agent activity into farm progress. The [`FarmEngine`]
//! owns the whole [`FarmState`](agentfarm_types::FarmState) and applies
//! every rule: pawn lifecycle, crop growth and harvest, season rotation,
//! the seed economy, and storehouse and pawn-bag transfers.
//!
//! # Modules
//!
//! - [`engine`] -- [`FarmEngine`], the orchestrator and sole state owner.
//! - [`crops`] -- Crop catalogue and growth/harvest arithmetic.
//! - [`pawns`] -- Pawn names, faction balance, and mood.
//! - [`state`] -- Fresh farm generation and repair of loaded documents.
//! - [`scheduler`] -- Deferred state transitions with identity guards.
//! - [`clock`] -- Wall-clock abstraction with a manual clock for tests.
//! - [`config`] -- YAML configuration.
//! - [`error`] -- [`FarmError`] for rejected operations.

pub mod clock;
pub mod config;
pub mod crops;
pub mod engine;
pub mod error;
pub mod pawns;
pub mod scheduler;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, FarmConfig};
pub use crops::CropInfo;
pub use engine::{FarmEngine, TaskOutcome, Withdrawal};
pub use error::FarmError;
pub use scheduler::{DeferredAction, ScheduledTask, TaskScheduler};
pub use state::{default_farm_state, heal_state};
