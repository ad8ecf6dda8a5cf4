//! Positioning policies applied to every root each tick.

use std::fmt;

use crate::{CoreError, CoreResult};

/// How a root positions itself relative to its two parents.
///
/// Selected once from configuration and dispatched by a single `match` in the
/// simulation step.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Policy {
    /// Scenario `A`: step towards the midpoint of the two parents.
    MidpointConvergence,

    /// Scenario `B`: hide behind parent B as seen from parent A, ending up
    /// `dist_behind` metres past parent B on the ray A → B.
    ShieldBehind { dist_behind: f64 },
}

impl Policy {
    /// Resolve a scenario tag (`"A"` or `"B"`) into a policy.
    ///
    /// Scenario `B` requires `dist_behind`; a missing value is a
    /// configuration error rather than a silent default.
    pub fn from_scenario(tag: &str, dist_behind: Option<f64>) -> CoreResult<Policy> {
        match tag.trim() {
            "A" | "a" => Ok(Policy::MidpointConvergence),
            "B" | "b" => match dist_behind {
                Some(d) if d.is_finite() && d >= 0.0 => Ok(Policy::ShieldBehind { dist_behind: d }),
                Some(d) => Err(CoreError::Config(format!(
                    "dist_behind must be a finite, non-negative distance (got {d})"
                ))),
                None => Err(CoreError::Config(
                    "scenario B requires dist_behind".to_owned(),
                )),
            },
            other => Err(CoreError::Config(format!(
                "unknown scenario {other:?}: expected \"A\" or \"B\""
            ))),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::MidpointConvergence => write!(f, "midpoint convergence (A)"),
            Policy::ShieldBehind { dist_behind } => {
                write!(f, "shield-behind (B, {dist_behind} m)")
            }
        }
    }
}
