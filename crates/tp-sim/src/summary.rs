//! End-of-run report.

use std::fmt;

use tp_core::Tick;
use tp_graph::Dependency;

/// Terminal state of a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Every active agent converged.
    Converged,
    /// A non-converged set of roots stopped changing; see
    /// [`SimSummary::unresolved`].
    Deadlocked,
    /// The tick budget ran out first.
    Exhausted,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Converged  => "converged",
            Outcome::Deadlocked => "deadlocked",
            Outcome::Exhausted  => "exhausted",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimSummary {
    pub outcome:       Outcome,
    /// Ticks actually simulated.
    pub ticks:         Tick,
    pub converged:     usize,
    /// Roots that had not converged when the run ended.
    pub non_converged: usize,
    pub non_root:      usize,
    /// Deadlocked runs only: the dependency of every unresolved root, so the
    /// cycle can be read off its parent pairs.
    pub unresolved:    Vec<Dependency>,
}

impl fmt::Display for SimSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "outcome        : {} after {} ticks", self.outcome, self.ticks.0)?;
        writeln!(f, "converged      : {}", self.converged)?;
        writeln!(f, "non-converged  : {}", self.non_converged)?;
        write!(f, "non-root       : {}", self.non_root)?;
        for dep in &self.unresolved {
            write!(f, "\n  unresolved {dep}")?;
        }
        Ok(())
    }
}
