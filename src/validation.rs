use itertools::Itertools;
use thiserror::Error;
use tracing::info;

use crate::model::entity::{Id, Person};
use crate::model::grid::{Layout, Marker};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("assignable counts differ: roster has {roster}, layout has {layout}")]
    AssignableCount { roster: usize, layout: usize },
    #[error("pinned counts differ: roster has {roster}, layout has {layout}")]
    PinnedCount { roster: usize, layout: usize },
    #[error("pinned members differ: roster has {roster}, layout has {layout}")]
    PinnedIdentity { roster: Id, layout: Id },
}

/// What one data source claims about the seating: who is pinned and how
/// many people are free to move.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub pinned: Vec<Id>,
    pub assignable: usize,
}

impl Summary {
    pub fn new(pinned: Vec<Id>, assignable: usize) -> Summary {
        Summary { pinned, assignable }
    }

    pub fn of_roster<F>(people: &[Person], is_pinned: F) -> Summary
    where
        F: Fn(&Person) -> bool,
    {
        let (pinned, assignable): (Vec<_>, Vec<_>) = people.iter().partition(|p| is_pinned(p));
        Summary {
            pinned: pinned.into_iter().map(|p| p.id.clone()).collect(),
            assignable: assignable.len(),
        }
    }

    pub fn of_layout(layout: &Layout) -> Summary {
        layout.iter().fold(Summary::default(), |mut summary, (_, marker)| {
            match marker {
                Marker::Pinned(id) => summary.pinned.push(id.clone()),
                Marker::Assignable => summary.assignable += 1,
                Marker::Empty => {}
            }
            summary
        })
    }
}

/// Fails on the first disagreement between the two summaries.
pub fn check(roster: &Summary, layout: &Summary) -> Result<(), ValidationError> {
    if roster.assignable != layout.assignable {
        return Err(ValidationError::AssignableCount { roster: roster.assignable, layout: layout.assignable });
    }
    if roster.pinned.len() != layout.pinned.len() {
        return Err(ValidationError::PinnedCount { roster: roster.pinned.len(), layout: layout.pinned.len() });
    }
    let mismatch = roster.pinned.iter().sorted()
        .zip(layout.pinned.iter().sorted())
        .find(|(a, b)| a != b);
    if let Some((a, b)) = mismatch {
        return Err(ValidationError::PinnedIdentity { roster: a.clone(), layout: b.clone() });
    }
    info!(pinned = ?roster.pinned, assignable = roster.assignable, "sources agree");
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<Id> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn matching_sources_pass_regardless_of_order() {
        let roster = Summary::new(ids(&["#B", "#A"]), 4);
        let layout = Summary::new(ids(&["#A", "#B"]), 4);
        assert_eq!(check(&roster, &layout), Ok(()));
    }

    #[test]
    fn assignable_count_mismatch() {
        let roster = Summary::new(vec![], 4);
        let layout = Summary::new(vec![], 5);
        assert_eq!(check(&roster, &layout), Err(ValidationError::AssignableCount { roster: 4, layout: 5 }));
    }

    #[test]
    fn pinned_count_mismatch() {
        let roster = Summary::new(ids(&["#A", "#B", "#C"]), 2);
        let layout = Summary::new(ids(&["#A", "#B"]), 2);
        assert_eq!(check(&roster, &layout), Err(ValidationError::PinnedCount { roster: 3, layout: 2 }));
    }

    #[test]
    fn pinned_identity_mismatch() {
        let roster = Summary::new(ids(&["#A", "#C"]), 0);
        let layout = Summary::new(ids(&["#A", "#B"]), 0);
        assert_eq!(
            check(&roster, &layout),
            Err(ValidationError::PinnedIdentity { roster: "#C".into(), layout: "#B".into() })
        );
    }

    #[test]
    fn summaries_from_sources() {
        let people = vec![Person::new("#A", "x"), Person::new("b", "x"), Person::new("c", "y")];
        let roster = Summary::of_roster(&people, |p| p.id.starts_with('#'));
        assert_eq!(roster, Summary::new(ids(&["#A"]), 2));

        let layout = Layout::from_rows(vec![
            vec![Marker::Pinned("#A".into()), Marker::Assignable],
            vec![Marker::Empty, Marker::Assignable],
        ]);
        assert_eq!(Summary::of_layout(&layout), roster);
    }
}
