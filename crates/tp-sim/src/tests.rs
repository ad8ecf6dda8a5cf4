//! Integration tests for tp-sim.

use std::collections::HashSet;

use tp_agent::{Agent, Population};
use tp_core::{AgentId, Position, SimConfig, SimRng, Tick};
use tp_graph::Dependency;

use crate::{NoopObserver, SimBuilder, SimObserver, SimSummary, TickStats};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(max_ticks: u64) -> SimConfig {
    SimConfig {
        max_ticks,
        seed: 42,
        ..SimConfig::default()
    }
}

/// Hand-placed population, ids `0..`, all with the same perception radius
/// and a history of 5.
fn placed(points: &[(f64, f64)], perception: f64) -> Population {
    placed_with_history(points, perception, 5)
}

fn placed_with_history(points: &[(f64, f64)], perception: f64, history: usize) -> Population {
    let agents = points
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| {
            Agent::new(AgentId(i as u32), Position::new(x, y), perception, 0.3, history)
        })
        .collect();
    Population::from_agents(agents).unwrap()
}

const TRIANGLE: [(f64, f64); 3] = [(2.0, 2.0), (18.0, 2.0), (10.0, 18.0)];

/// Three far-apart agents that all see each other.
fn triangle() -> Population {
    placed(&TRIANGLE, 100.0)
}

fn dep(root: u32, a: u32, b: u32) -> Dependency {
    Dependency { root: AgentId(root), parent_a: AgentId(a), parent_b: AgentId(b) }
}

fn non_root_ids(population: &Population) -> HashSet<AgentId> {
    population.iter().filter(|a| !a.is_root()).map(|a| a.id).collect()
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::SimError;

    #[test]
    fn builds_successfully_with_defaults() {
        let sim = SimBuilder::new(test_config(10)).build().unwrap();
        assert_eq!(sim.population.len(), 10);
        assert_eq!(sim.current_tick, Tick::ZERO);
        assert!(!sim.phase.is_terminal());
    }

    #[test]
    fn agent_count_is_clamped() {
        let config = SimConfig { agent_count: 0, ..test_config(10) };
        let sim = SimBuilder::new(config).build().unwrap();
        assert_eq!(sim.population.len(), 3);
    }

    #[test]
    fn invalid_scenario_aborts_initialization() {
        let config = SimConfig { scenario: "X".to_owned(), ..test_config(10) };
        let result = SimBuilder::new(config).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn scenario_b_without_distance_aborts() {
        let config = SimConfig { scenario: "B".to_owned(), ..test_config(10) };
        assert!(SimBuilder::new(config).build().is_err());
    }

    #[test]
    fn overcrowded_map_reports_spawn_error() {
        let config = SimConfig {
            map_width: 1.0,
            map_height: 1.0,
            agent_radius: 1.0,
            max_spawn_attempts: 20,
            ..test_config(10)
        };
        let result = SimBuilder::new(config).build();
        assert!(matches!(result, Err(SimError::Spawn(_))));
    }

    #[test]
    fn supplied_population_is_used() {
        let sim = SimBuilder::new(test_config(10)).population(triangle()).build().unwrap();
        assert_eq!(sim.population.position(AgentId(1)), Position::new(18.0, 2.0));
        assert_eq!(sim.graph.len(), 3);
    }
}

// ── Terminal states ───────────────────────────────────────────────────────────

#[cfg(test)]
mod outcome_tests {
    use super::*;
    use crate::{Outcome, SimPhase};

    #[test]
    fn three_visible_agents_converge() {
        let mut sim = SimBuilder::new(test_config(50)).population(triangle()).build().unwrap();
        let summary = sim.run(&mut NoopObserver);
        assert_eq!(summary.outcome, Outcome::Converged);
        // Every root takes full 0.5 m steps; the history fills after 4 ticks.
        assert_eq!(summary.ticks, Tick(4));
        assert_eq!(summary.converged, 3);
        assert_eq!(summary.non_converged, 0);
        assert!(summary.unresolved.is_empty());
    }

    #[test]
    fn same_seed_same_run() {
        let config = SimConfig { agent_count: 12, ..test_config(60) };
        let mut a = SimBuilder::new(config.clone()).build().unwrap();
        let mut b = SimBuilder::new(config).build().unwrap();
        let sa = a.run(&mut NoopObserver);
        let sb = b.run(&mut NoopObserver);
        assert_eq!(sa, sb);
        for (x, y) in a.population.iter().zip(b.population.iter()) {
            assert_eq!(x.position(), y.position());
        }
    }

    #[test]
    fn mutual_shields_report_deadlock() {
        // 0 hides behind 3 from 1 while 3 hides behind 0 from 2.  Each jump
        // puts the other back out of place, so both keep making long moves.
        // 1 and 2 are NonRoot and nobody sees anybody, so nothing is promoted.
        let config = SimConfig {
            scenario: "B".to_owned(),
            dist_behind: Some(2.0),
            step_size: None,
            ..test_config(50)
        };
        let pop = placed(&[(0.0, 6.0), (5.0, 1.0), (3.0, 4.0), (0.0, 7.0)], 0.0);
        let mut sim = SimBuilder::new(config)
            .population(pop)
            .dependencies(vec![dep(0, 1, 3), dep(3, 2, 0)])
            .build()
            .unwrap();
        let summary = sim.run(&mut NoopObserver);

        assert_eq!(summary.outcome, Outcome::Deadlocked);
        // Histories fill during tick 3; the window then needs 10 more ticks.
        assert_eq!(summary.ticks, Tick(13));
        assert_eq!(summary.non_converged, 2);
        assert_eq!(summary.converged, 0);
        assert_eq!(summary.non_root, 2);
        let roots: Vec<AgentId> = summary.unresolved.iter().map(|d| d.root).collect();
        assert_eq!(roots, [AgentId(0), AgentId(3)]);
        for dep in &summary.unresolved {
            assert_eq!(sim.graph.dependency_of(dep.root), Some(dep));
        }
    }

    #[test]
    fn filling_history_is_not_a_deadlock() {
        // A 12-entry history takes 11 ticks to fill, longer than the default
        // 10-tick window.  Until then no root can be judged stuck.
        let config = test_config(50);
        assert!(config.deadlock_window < 12);
        let pop = placed_with_history(&TRIANGLE, 100.0, 12);
        let mut sim = SimBuilder::new(config).population(pop).build().unwrap();
        let summary = sim.run(&mut NoopObserver);

        assert_eq!(summary.outcome, Outcome::Converged);
        assert_eq!(summary.ticks, Tick(11));
        assert!(summary.unresolved.is_empty());
    }

    #[test]
    fn budget_runs_out() {
        let mut sim = SimBuilder::new(test_config(2)).population(triangle()).build().unwrap();
        let summary = sim.run(&mut NoopObserver);
        assert_eq!(summary.outcome, Outcome::Exhausted);
        assert_eq!(summary.ticks, Tick(2));
    }

    #[test]
    fn zero_budget_never_ticks() {
        let mut sim = SimBuilder::new(test_config(0)).population(triangle()).build().unwrap();
        let before: Vec<Position> = sim.population.iter().map(|a| a.position()).collect();
        let summary = sim.run(&mut NoopObserver);
        assert_eq!(summary.outcome, Outcome::Exhausted);
        assert_eq!(summary.ticks, Tick::ZERO);
        let after: Vec<Position> = sim.population.iter().map(|a| a.position()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn nobody_visible_converges_immediately() {
        let config = SimConfig { perception_radius: Some(0.0), ..test_config(50) };
        let mut sim = SimBuilder::new(config).build().unwrap();
        assert!(sim.graph.is_empty());
        let summary = sim.run(&mut NoopObserver);
        assert_eq!(summary.outcome, Outcome::Converged);
        assert_eq!(summary.ticks, Tick(1));
        assert_eq!(summary.non_root, 10);
    }

    #[test]
    fn step_after_terminal_is_inert() {
        let mut sim = SimBuilder::new(test_config(1)).population(triangle()).build().unwrap();
        assert_eq!(sim.step(&mut NoopObserver), SimPhase::Exhausted);
        let positions: Vec<Position> = sim.population.iter().map(|a| a.position()).collect();
        assert_eq!(sim.step(&mut NoopObserver), SimPhase::Exhausted);
        assert_eq!(sim.current_tick, Tick(1));
        let again: Vec<Position> = sim.population.iter().map(|a| a.position()).collect();
        assert_eq!(positions, again);
        assert!(sim.summary().is_some());
    }

    #[test]
    fn summary_absent_while_running() {
        let mut sim = SimBuilder::new(test_config(50)).population(triangle()).build().unwrap();
        sim.step(&mut NoopObserver);
        assert!(sim.summary().is_none());
    }

    #[test]
    fn spawned_runs_terminate_with_consistent_counts() {
        for (seed, scenario, dist_behind) in [(1, "A", None), (2, "B", Some(1.0)), (3, "B", Some(0.0))] {
            let config = SimConfig {
                seed,
                scenario: scenario.to_owned(),
                dist_behind,
                perception_radius: Some(8.0),
                ..test_config(200)
            };
            let mut sim = SimBuilder::new(config).build().unwrap();
            let summary = sim.run(&mut NoopObserver);
            assert!(summary.ticks.0 <= 200);
            assert_eq!(
                summary.converged + summary.non_converged + summary.non_root,
                sim.population.len()
            );
        }
    }
}

// ── Observer hooks ────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        inits:      usize,
        starts:     usize,
        ends:       Vec<TickStats>,
        snapshots:  Vec<Tick>,
        promotions: Vec<Dependency>,
        non_roots:  Vec<HashSet<AgentId>>,
        summary:    Option<SimSummary>,
    }

    impl SimObserver for Recorder {
        fn on_init(&mut self, _p: &Population, _d: &[Dependency]) { self.inits += 1; }
        fn on_tick_start(&mut self, _t: Tick) { self.starts += 1; }
        fn on_promotion(&mut self, _t: Tick, dep: &Dependency) { self.promotions.push(*dep); }
        fn on_tick_end(&mut self, stats: &TickStats) { self.ends.push(*stats); }
        fn on_snapshot(&mut self, tick: Tick, population: &Population, _d: &[Dependency]) {
            self.snapshots.push(tick);
            self.non_roots.push(non_root_ids(population));
        }
        fn on_sim_end(&mut self, summary: &SimSummary) { self.summary = Some(summary.clone()); }
    }

    #[test]
    fn hooks_called_once_per_tick() {
        let mut sim = SimBuilder::new(test_config(3)).population(triangle()).build().unwrap();
        let mut rec = Recorder::default();
        let summary = sim.run(&mut rec);
        assert_eq!(rec.inits, 1);
        assert_eq!(rec.starts, 3);
        assert_eq!(rec.ends.len(), 3);
        assert_eq!(rec.snapshots, vec![Tick(0), Tick(1), Tick(2)]);
        assert_eq!(rec.summary, Some(summary));
        assert!(rec.ends.iter().all(|s| s.active == 3 && s.non_root == 0));
    }

    #[test]
    fn snapshot_interval_respected() {
        let config = SimConfig { snapshot_interval_ticks: 2, ..test_config(5) };
        let mut sim = SimBuilder::new(config).population(triangle()).build().unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec);
        assert_eq!(rec.snapshots, vec![Tick(0), Tick(2)]);

        let config = SimConfig { snapshot_interval_ticks: 0, ..test_config(5) };
        let mut sim = SimBuilder::new(config).population(triangle()).build().unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec);
        assert!(rec.snapshots.is_empty());
    }

    #[test]
    fn promotion_reported_when_agent_comes_into_view() {
        // 0,1,2 see each other; 3 starts far away and sees nobody.
        let pop = placed(&[(2.0, 2.0), (4.0, 2.0), (3.0, 4.0), (30.0, 30.0)], 5.0);
        let mut sim = SimBuilder::new(test_config(50)).population(pop).build().unwrap();
        assert!(sim.graph.is_non_root(AgentId(3)));

        // Carry agent 3 next to the cluster between ticks.
        sim.population.agent_mut(AgentId(3)).move_toward(Position::new(3.0, 3.0), None);

        let mut rec = Recorder::default();
        sim.step(&mut rec);
        assert_eq!(rec.promotions.len(), 1);
        assert_eq!(rec.promotions[0].root, AgentId(3));
        assert_eq!(rec.ends[0].promoted, 1);
        assert_eq!(rec.ends[0].non_root, 0);
        assert!(!sim.graph.is_non_root(AgentId(3)));
    }

    #[test]
    fn non_root_set_only_shrinks() {
        let config = SimConfig {
            agent_count: 15,
            perception_radius: Some(5.0),
            ..test_config(80)
        };
        let mut sim = SimBuilder::new(config).build().unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec);
        for pair in rec.non_roots.windows(2) {
            assert!(pair[1].is_subset(&pair[0]), "NonRoot set grew: {:?} -> {:?}", pair[0], pair[1]);
        }
    }
}

// ── Processing order ──────────────────────────────────────────────────────────

#[cfg(test)]
mod order_tests {
    use super::*;

    #[test]
    fn later_roots_see_earlier_moves() {
        // 0 follows (1, 2) and 1 follows (2, 3); 2 and 3 never move.  1 jumps
        // to (5, 10).  If 1 went first, 0 lands on the midpoint of (5, 10) and
        // (0, 10); otherwise on the midpoint of (10, 0) and (0, 10).
        let deps = vec![dep(0, 1, 2), dep(1, 2, 3)];
        let after_parent  = Position::new(2.5, 10.0);
        let before_parent = Position::new(5.0, 5.0);

        let mut seen = HashSet::new();
        for seed in 0..16 {
            let config = SimConfig { seed, step_size: None, ..test_config(10) };
            let pop = placed(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)], 0.0);
            let mut sim = SimBuilder::new(config)
                .population(pop)
                .dependencies(deps.clone())
                .build()
                .unwrap();

            // A hand-wired graph draws nothing, so the first tick's shuffle is
            // the seed's first draw.
            let mut expected = deps.clone();
            SimRng::new(seed).shuffle(&mut expected);
            let parent_first = expected[0].root == AgentId(1);

            sim.step(&mut NoopObserver);
            assert_eq!(sim.last_order(), expected.as_slice());
            assert_eq!(sim.population.position(AgentId(1)), Position::new(5.0, 10.0));
            let want = if parent_first { after_parent } else { before_parent };
            assert_eq!(sim.population.position(AgentId(0)), want, "seed {seed}");
            seen.insert(parent_first);
        }
        assert_eq!(seen.len(), 2, "16 seeds should exercise both orders");
    }

    #[test]
    fn order_is_reshuffled_every_tick() {
        // Eight agents on a ring; the first six follow their two successors.
        let ring: Vec<(f64, f64)> = (0..8u32)
            .map(|i| {
                let angle = f64::from(i) * std::f64::consts::TAU / 8.0;
                (10.0 + 6.0 * angle.cos(), 10.0 + 6.0 * angle.sin())
            })
            .collect();
        let deps: Vec<Dependency> = (0..6).map(|i| dep(i, i + 1, i + 2)).collect();
        let mut sim = SimBuilder::new(test_config(50))
            .population(placed(&ring, 0.0))
            .dependencies(deps.clone())
            .build()
            .unwrap();
        assert!(sim.last_order().is_empty());

        let mut replica = SimRng::new(42);
        let mut orders = Vec::new();
        for _ in 0..4 {
            let mut expected = deps.clone();
            replica.shuffle(&mut expected);
            sim.step(&mut NoopObserver);
            assert_eq!(sim.last_order(), expected.as_slice());
            orders.push(expected);
        }
        assert!(orders.windows(2).any(|w| w[0] != w[1]), "same order on every tick");
    }
}

// ── Deadlock window ───────────────────────────────────────────────────────────

#[cfg(test)]
mod deadlock_tests {
    use std::collections::BTreeSet;

    use tp_core::AgentId;

    use crate::DeadlockWindow;

    fn set(ids: &[u32]) -> BTreeSet<AgentId> {
        ids.iter().map(|&i| AgentId(i)).collect()
    }

    #[test]
    fn needs_full_window() {
        let mut w = DeadlockWindow::new(3);
        assert!(!w.observe(set(&[1, 2])));
        assert!(!w.observe(set(&[1, 2])));
        assert!(w.observe(set(&[1, 2])));
    }

    #[test]
    fn change_resets_detection() {
        let mut w = DeadlockWindow::new(3);
        w.observe(set(&[1, 2]));
        w.observe(set(&[1, 2]));
        assert!(!w.observe(set(&[1])));
        assert!(!w.observe(set(&[1])));
        assert!(w.observe(set(&[1])));
        assert_eq!(w.latest(), Some(&set(&[1])));
    }

    #[test]
    fn empty_set_is_never_a_deadlock() {
        let mut w = DeadlockWindow::new(2);
        w.observe(set(&[]));
        assert!(!w.observe(set(&[])));
    }

    #[test]
    fn zero_capacity_clamped() {
        let mut w = DeadlockWindow::new(0);
        assert!(w.observe(set(&[4])));
    }
}
