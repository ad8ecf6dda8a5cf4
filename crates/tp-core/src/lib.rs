//! `tp-core` — foundational types for the `rust_triplets` simulator.
//!
//! This crate is a dependency of every other `tp-*` crate.  It intentionally
//! has no `tp-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`                                             |
//! | [`geo`]         | `Position`, `LineCoefficients`, planar geometry kernel |
//! | [`time`]        | `Tick`, `SimConfig`                                   |
//! | [`policy`]      | `Policy` (midpoint convergence / shield-behind)       |
//! | [`rng`]         | `SimRng` (single seeded source for a whole run)       |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types; needed to load `SimConfig` from JSON. |

pub mod error;
pub mod geo;
pub mod ids;
pub mod policy;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{LineCoefficients, Position};
pub use ids::AgentId;
pub use policy::Policy;
pub use rng::SimRng;
pub use time::{SimConfig, Tick};
