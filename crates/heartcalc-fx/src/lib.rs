//! # heartcalc-fx: Ephemeral Particle Scheduler
//!
//! Every digit tap releases a burst of hearts that float to the top of the
//! screen and disappear. This crate owns those hearts.
//!
//! ## Particle Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Particle Lifecycle                                 │
//! │                                                                         │
//! │   spawn_burst(origin)                                                   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   ┌──────────┐  +10ms   ┌──────────┐  +2100ms   ┌──────────┐           │
//! │   │ Spawned  │ ───────► │  Rising  │ ─────────► │ Expired  │ (removed) │
//! │   │ origin±j │  Rise    │ target = │  Expire    │          │           │
//! │   └──────────┘  timer   │ top ± j  │  timer     └──────────┘           │
//! │                         └──────────┘                                    │
//! │                                                                         │
//! │   Timers are checked against the live particle map before acting:      │
//! │   a stale timer for a removed particle is a silent no-op.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`particle`] - Particle, identity, palette, phases
//! - [`scheduler`] - `ParticleScheduler` and its timer queue
//! - [`clock`] - Wall clock and manual clock for tests
//! - [`driver`] - Tokio task that ticks the scheduler
//! - [`config`] - Burst, rise and timing settings
//! - [`error`] - Error types

pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod particle;
pub mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::FxConfig;
pub use driver::{FxDriver, FxHandle};
pub use error::{FxError, FxResult};
pub use particle::{HeartColor, Particle, ParticleId, Phase, Point};
pub use scheduler::{ParticleEvent, ParticleScheduler};
