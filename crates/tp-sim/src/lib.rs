//! `tp-sim` — tick loop driver for the rust_triplets simulator.
//!
//! # State machine
//!
//! ```text
//! SimBuilder::build()            (initializing: validate, spawn, build graph)
//!        │
//!        ▼
//!     Running ──► Converged     every root's recent steps are non-increasing
//!        │   ──► Deadlocked    same settled, non-converged set for W ticks
//!        │   ──► Exhausted     tick budget used up
//!        ▼
//!   for each tick:
//!     ① Dependencies — shuffled, applied one at a time to the live
//!                      population (later roots see earlier moves).
//!     ② Promotion    — NonRoot agents that now see two others become roots.
//!     ③ Checks       — convergence, then deadlock, then tick budget.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tp_core::SimConfig;
//! use tp_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default()).build()?;
//! let summary = sim.run(&mut NoopObserver);
//! println!("{summary}");
//! ```

pub mod builder;
pub mod deadlock;
pub mod error;
pub mod observer;
pub mod sim;
pub mod summary;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use deadlock::DeadlockWindow;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TickStats};
pub use sim::{Sim, SimPhase};
pub use summary::{Outcome, SimSummary};
