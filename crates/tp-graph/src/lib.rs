//! `tp-graph` — who sees whom, and who depends on whom.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                 |
//! |------------------|----------------------------------------------------------|
//! | [`visibility`]   | `VisibilityIndex` (R-tree over current positions)        |
//! | [`dependency`]   | `Dependency` (root + two parents), `DependencyGraph`     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Dependency`.           |

pub mod dependency;
pub mod visibility;


pub use dependency::{Dependency, DependencyGraph};
pub use visibility::VisibilityIndex;
