//! `tp-agent` — agents and population management for `rust_triplets`.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`agent`]       | `Agent` (position, role, bounded history, motion primitives), `Role` |
//! | [`collision`]   | `CollisionChecker` (pairwise separation of circular agents) |
//! | [`population`]  | `Population` (ordered agents + id → slot index)           |
//! | [`spawn`]       | `Spawner` (collision-free random placement)               |
//! | [`error`]       | `AgentError`, `AgentResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `fx-hash`  | FxHash instead of SipHash for the id → slot index.         |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `Role`.               |

pub mod agent;
pub mod collision;
pub mod error;
pub mod population;
pub mod spawn;


pub use agent::{Agent, Role};
pub use collision::CollisionChecker;
pub use error::{AgentError, AgentResult};
pub use population::Population;
pub use spawn::Spawner;
