use itertools::Itertools;

use crate::action::{ActionError, Swap};
use crate::model::grid::Cell;
use crate::model::placement::Placement;

pub type Score = u64;
pub type ScoreDiff = i64;

/// Reward for a same-group neighbor directly to the right.
pub const RIGHT_WEIGHT: Score = 10;
/// Reward for a same-group neighbor directly below.
pub const DOWN_WEIGHT: Score = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Edge {
    from: Cell,
    to: Cell,
    weight: Score,
}

impl Edge {
    fn forward(cell: Cell) -> [Edge; 2] {
        [
            Edge { from: cell, to: cell.right(), weight: RIGHT_WEIGHT },
            Edge { from: cell, to: cell.down(), weight: DOWN_WEIGHT },
        ]
    }

    fn touching(cell: Cell) -> impl Iterator<Item = Edge> {
        let backward = [
            cell.left().map(|left| Edge { from: left, to: cell, weight: RIGHT_WEIGHT }),
            cell.up().map(|up| Edge { from: up, to: cell, weight: DOWN_WEIGHT }),
        ];
        Edge::forward(cell).into_iter().chain(backward.into_iter().flatten())
    }

    fn score<'a, F>(&self, group_of: F) -> Score
    where
        F: Fn(&Cell) -> Option<&'a str>,
    {
        match (group_of(&self.from), group_of(&self.to)) {
            (Some(a), Some(b)) if a == b => self.weight,
            _ => 0,
        }
    }
}

impl Placement {
    pub fn calc_score(&self) -> Score {
        self.cells()
            .flat_map(Edge::forward)
            .map(|edge| edge.score(|cell| self.group_at(cell)))
            .sum()
    }
}

/// Adjacency score of a placement: every occupied cell earns `RIGHT_WEIGHT`
/// when its right neighbor shares its group and `DOWN_WEIGHT` when the cell
/// below does. Only forward neighbors are inspected, so each pair counts once.
pub fn score(placement: &Placement) -> Score {
    placement.calc_score()
}

/// Running score of a placement, updated from swap deltas instead of full rescans.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCache {
    pub score: Score,
}

impl ScoreCache {
    pub fn create(placement: &Placement) -> ScoreCache {
        ScoreCache { score: placement.calc_score() }
    }

    /// Score change `swap` would cause, computed from the edges touching the two cells.
    pub fn simulate(&self, placement: &Placement, swap: &Swap) -> ScoreDiff {
        let edges = Edge::touching(swap.first)
            .chain(Edge::touching(swap.second))
            .unique()
            .collect_vec();
        let before: Score = edges
            .iter()
            .map(|edge| edge.score(|cell| placement.group_at(cell)))
            .sum();
        let after: Score = edges
            .iter()
            .map(|edge| edge.score(|cell| placement.group_at(&swap.source_of(*cell))))
            .sum();
        after as ScoreDiff - before as ScoreDiff
    }

    pub fn act(&mut self, placement: &mut Placement, swap: &Swap) -> Result<ScoreDiff, ActionError> {
        let diff = self.simulate(placement, swap);
        placement.apply(swap)?;
        self.score = self.score.saturating_add_signed(diff);
        Ok(diff)
    }
}
