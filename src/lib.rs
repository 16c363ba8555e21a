//! Seat assignment that keeps groups sitting together.
//!
//! A roster of people, each belonging to a group, is placed onto a grid of
//! seats. Some seats are pinned to a named person; the rest are filled at
//! random and then improved by hill climbing over pairwise swaps, rewarding
//! same-group neighbors to the right and below.

pub mod action;
pub mod climb;
pub mod config;
pub mod error;
pub mod model;
pub mod score;
pub mod seating;
pub mod sheet;
pub mod validation;

use tracing::info;

pub use crate::climb::{Climber, Improvement, Observer, Params, Report, Stop};
pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::model::entity::{Color, Person, Roster};
pub use crate::model::grid::{Cell, Layout, Marker};
pub use crate::model::placement::{Placement, Seat};
pub use crate::score::{score, Score};

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub placement: Placement,
    pub report: Report,
}

/// Validates the two sources against each other, seats everyone and runs the
/// local search, reporting each accepted swap to `observer`.
pub fn arrange<O>(people: Vec<Person>, layout: &Layout, config: &Config, observer: &mut O) -> Result<Outcome>
where
    O: Observer + ?Sized,
{
    let markers = &config.markers;
    validation::check(
        &validation::Summary::of_roster(&people, |p| markers.is_pinned(p)),
        &validation::Summary::of_layout(layout),
    )?;

    let roster = Roster::split(people, |p| markers.is_pinned(p))?;
    info!(pinned = roster.pinned.len(), assignable = roster.assignable.len(), "roster split");

    let mut rng = config.search.rng();
    let placement = seating::seat(&roster, layout, &mut rng)?;
    let mut climber = Climber::new(placement, config.search.params(), rng)?;
    let report = climber.run(observer);
    Ok(Outcome { placement: climber.into_placement(), report })
}
