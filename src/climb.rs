use std::collections::HashSet;

use rand::rngs::SmallRng;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::action::Swap;
use crate::model::grid::Cell;
use crate::model::placement::Placement;
use crate::score::{Score, ScoreCache};

pub const DEFAULT_PATIENCE: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    /// Consecutive non-improving trials tolerated before stopping.
    pub patience: usize,
    pub max_iterations: Option<usize>,
}

impl Default for Params {
    fn default() -> Self {
        Params { patience: DEFAULT_PATIENCE, max_iterations: None }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SearchError {
    #[error("no eligible swap: {movable} movable seats spread over {groups} groups")]
    NoEligibleSwap { movable: usize, groups: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initialized,
    Improving,
    Converged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    Converged,
    IterationLimit,
}

/// An accepted swap and the score it lifted the placement to.
#[derive(Debug, Clone, PartialEq)]
pub struct Improvement {
    pub swap: Swap,
    pub score: Score,
    pub iteration: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub initial_score: Score,
    pub score: Score,
    pub iterations: usize,
    pub improvements: usize,
    pub stop: Stop,
}

/// Receives every accepted swap so callers can persist only the changed cells.
pub trait Observer {
    fn improved(&mut self, placement: &Placement, improvement: &Improvement);
}

impl<F> Observer for F
where
    F: FnMut(&Placement, &Improvement),
{
    fn improved(&mut self, placement: &Placement, improvement: &Improvement) {
        self(placement, improvement)
    }
}

struct State {
    placement: Placement,
    cache: ScoreCache,
    phase: Phase,
    stop: Option<Stop>,
    n_iterations: usize,
    n_unimproved: usize,
    n_improvements: usize,
}

struct SwapGenerator {
    occupied: Vec<Cell>,
    rng: SmallRng,
}

impl SwapGenerator {
    fn pick<F: Fn(&Cell) -> bool>(&mut self, eligible: F) -> Cell {
        loop {
            let cell = self.occupied[self.rng.gen_range(0..self.occupied.len())];
            if eligible(&cell) {
                return cell;
            }
        }
    }

    fn next(&mut self, placement: &Placement) -> Swap {
        let movable = |cell: &Cell| placement.get(cell).is_some_and(|seat| !seat.pinned);
        let first = self.pick(&movable);
        let group = placement.group_at(&first);
        let second = self.pick(|cell| *cell != first && movable(cell) && placement.group_at(cell) != group);
        Swap::new(first, second)
    }
}

/// Hill climber over pairwise swaps; only strict improvements are kept.
pub struct Climber {
    params: Params,
    state: State,
    generator: SwapGenerator,
    initial_score: Score,
}

impl Climber {
    /// Fails when the placement has no pair of movable seats in different
    /// groups, since the swap sampler could never succeed.
    pub fn new(placement: Placement, params: Params, rng: SmallRng) -> Result<Climber, SearchError> {
        let movable = placement.movable().count();
        let groups = placement
            .movable()
            .map(|(_, seat)| seat.person.group_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        if movable < 2 || groups < 2 {
            return Err(SearchError::NoEligibleSwap { movable, groups });
        }

        let cache = ScoreCache::create(&placement);
        let initial_score = cache.score;
        info!(score = initial_score, movable, groups, "local search initialized");
        Ok(Climber {
            params,
            generator: SwapGenerator { occupied: placement.cells().collect(), rng },
            state: State {
                placement,
                cache,
                phase: Phase::Initialized,
                stop: None,
                n_iterations: 0,
                n_unimproved: 0,
                n_improvements: 0,
            },
            initial_score,
        })
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn score(&self) -> Score {
        self.state.cache.score
    }

    pub fn placement(&self) -> &Placement {
        &self.state.placement
    }

    pub fn into_placement(self) -> Placement {
        self.state.placement
    }

    pub fn iterations(&self) -> usize {
        self.state.n_iterations
    }

    fn stop_reason(&self) -> Option<Stop> {
        if self.state.n_unimproved > self.params.patience {
            Some(Stop::Converged)
        } else if self.params.max_iterations.is_some_and(|max| self.state.n_iterations >= max) {
            Some(Stop::IterationLimit)
        } else {
            None
        }
    }

    /// Runs one trial swap. Returns the improvement when the swap was kept.
    pub fn step(&mut self) -> Option<Improvement> {
        if self.state.phase == Phase::Converged {
            return None;
        }
        self.state.phase = Phase::Improving;
        self.state.n_iterations += 1;

        let swap = self.generator.next(&self.state.placement);
        let diff = self.state.cache.simulate(&self.state.placement, &swap);
        let improvement = if diff > 0 && self.state.cache.act(&mut self.state.placement, &swap).is_ok() {
            self.state.n_unimproved = 0;
            self.state.n_improvements += 1;
            debug!(
                first = %swap.first,
                second = %swap.second,
                score = self.state.cache.score,
                iteration = self.state.n_iterations,
                "swap accepted"
            );
            Some(Improvement { swap, score: self.state.cache.score, iteration: self.state.n_iterations })
        } else {
            trace!(first = %swap.first, second = %swap.second, diff, "swap rejected");
            self.state.n_unimproved += 1;
            None
        };

        if let Some(stop) = self.stop_reason() {
            self.state.phase = Phase::Converged;
            self.state.stop = Some(stop);
        }
        improvement
    }

    pub fn run<O: Observer + ?Sized>(&mut self, observer: &mut O) -> Report {
        while self.state.phase != Phase::Converged {
            if let Some(improvement) = self.step() {
                observer.improved(&self.state.placement, &improvement);
            }
        }
        let report = self.report();
        info!(
            initial = report.initial_score,
            score = report.score,
            iterations = report.iterations,
            improvements = report.improvements,
            stop = ?report.stop,
            "local search finished"
        );
        report
    }

    pub fn report(&self) -> Report {
        Report {
            initial_score: self.initial_score,
            score: self.state.cache.score,
            iterations: self.state.n_iterations,
            improvements: self.state.n_improvements,
            stop: self.state.stop.unwrap_or(Stop::Converged),
        }
    }
}


#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::model::entity::Person;
    use crate::score::score;

    fn placement(rows: &[&[(&str, &str, bool)]]) -> Placement {
        let mut placement = Placement::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, (id, group, pinned)) in row.iter().enumerate() {
                placement.bind(Cell::new(c + 1, r + 1), Person::new(*id, *group), *pinned);
            }
        }
        placement
    }

    fn rng(seed: u64) -> SmallRng {
        SmallRng::seed_from_u64(seed)
    }

    #[test]
    fn two_by_two_reaches_best_layout() {
        for seed in 0..10 {
            let start = placement(&[
                &[("A", "x", false), ("C", "y", false)],
                &[("D", "y", false), ("B", "x", false)],
            ]);
            let mut climber = Climber::new(start, Params::default(), rng(seed)).unwrap();
            assert_eq!(climber.phase(), Phase::Initialized);
            let report = climber.run(&mut |_: &Placement, _: &Improvement| {});
            assert_eq!(report.score, 20);
            assert_eq!(report.stop, Stop::Converged);
            assert_eq!(climber.phase(), Phase::Converged);
            assert_eq!(score(climber.placement()), 20);
        }
    }

    #[test]
    fn accepted_scores_strictly_increase_and_pins_hold() {
        let start = placement(&[
            &[("#P", "x", true), ("a", "y", false), ("b", "x", false), ("c", "z", false)],
            &[("d", "z", false), ("#Q", "y", true), ("e", "x", false), ("f", "y", false)],
            &[("g", "x", false), ("h", "z", false), ("i", "y", false), ("j", "z", false)],
        ]);
        let mut last = score(&start);
        let mut climber = Climber::new(start, Params::default(), rng(7)).unwrap();
        let report = climber.run(&mut |placement: &Placement, improvement: &Improvement| {
            assert!(improvement.score > last);
            assert_eq!(improvement.score, score(placement));
            assert_eq!(placement.cell_of("#P"), Some(Cell::new(1, 1)));
            assert_eq!(placement.cell_of("#Q"), Some(Cell::new(2, 2)));
            assert!(!placement.get(&improvement.swap.first).unwrap().pinned);
            assert!(!placement.get(&improvement.swap.second).unwrap().pinned);
            last = improvement.score;
        });
        assert!(report.score >= report.initial_score);
        assert_eq!(report.score, last);
        assert_eq!(climber.into_placement().len(), 12);
    }

    #[test]
    fn one_movable_seat_is_rejected() {
        let start = placement(&[&[("#P", "x", true), ("a", "y", false)]]);
        let err = Climber::new(start, Params::default(), rng(0)).err();
        assert_eq!(err, Some(SearchError::NoEligibleSwap { movable: 1, groups: 1 }));
    }

    #[test]
    fn single_group_is_rejected() {
        let start = placement(&[&[("a", "x", false), ("b", "x", false), ("c", "x", false)]]);
        let err = Climber::new(start, Params::default(), rng(0)).err();
        assert_eq!(err, Some(SearchError::NoEligibleSwap { movable: 3, groups: 1 }));
    }

    #[test]
    fn ties_are_never_accepted() {
        let start = placement(&[&[("a", "x", false), ("b", "y", false), ("c", "z", false)]]);
        let params = Params { patience: 25, max_iterations: None };
        let mut climber = Climber::new(start.clone(), params, rng(3)).unwrap();
        let mut accepted = 0;
        let report = climber.run(&mut |_: &Placement, _: &Improvement| accepted += 1);
        assert_eq!(accepted, 0);
        assert_eq!(report.iterations, 26);
        assert_eq!(report.improvements, 0);
        assert_eq!(climber.placement(), &start);
    }

    #[test]
    fn iteration_cap_stops_early() {
        let start = placement(&[&[("a", "x", false), ("b", "y", false), ("c", "z", false)]]);
        let params = Params { patience: 1000, max_iterations: Some(10) };
        let mut climber = Climber::new(start, params, rng(3)).unwrap();
        let report = climber.run(&mut |_: &Placement, _: &Improvement| {});
        assert_eq!(report.iterations, 10);
        assert_eq!(report.stop, Stop::IterationLimit);
        assert_eq!(climber.step(), None);
    }
}
