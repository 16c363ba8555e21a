use std::collections::HashMap;

use itertools::Itertools;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::entity::{Id, Person, Roster};
use crate::model::grid::{Cell, Layout, Marker};
use crate::model::placement::Placement;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SeatingError {
    #[error("no pinned member named {id} for the seat at {cell}")]
    MissingPinnedMember { id: Id, cell: Cell },
    #[error("pinned members without a seat in the layout: {}", .ids.join(", "))]
    UnconsumedPinnedMembers { ids: Vec<Id> },
    #[error("members left without an assignable seat: {}", .ids.join(", "))]
    UnassignedMembers { ids: Vec<Id> },
    #[error("no member left for the assignable seat at {cell}")]
    NotEnoughMembers { cell: Cell },
    #[error("member {id} appears more than once in the roster")]
    DuplicatePerson { id: Id },
}

/// Builds the starting placement: pinned people go to the seats naming them,
/// assignable people are drawn at random without replacement for each
/// assignable seat. Cells are visited column-major.
pub fn seat<R: Rng + ?Sized>(roster: &Roster, layout: &Layout, rng: &mut R) -> Result<Placement, SeatingError> {
    let mut pinned: HashMap<&str, &Person> = roster.pinned.iter().map(|p| (p.id.as_str(), p)).collect();
    let mut pool: Vec<&Person> = roster.assignable.iter().collect();
    let mut placement = Placement::new();

    for (cell, marker) in layout.iter() {
        match marker {
            Marker::Empty => {}
            Marker::Pinned(id) => {
                let person = pinned
                    .remove(id.as_str())
                    .ok_or_else(|| SeatingError::MissingPinnedMember { id: id.clone(), cell })?;
                placement.bind(cell, person.clone(), true);
            }
            Marker::Assignable => {
                if pool.is_empty() {
                    return Err(SeatingError::NotEnoughMembers { cell });
                }
                let person = pool.swap_remove(rng.gen_range(0..pool.len()));
                debug!(%cell, id = %person.id, "seated");
                placement.bind(cell, person.clone(), false);
            }
        }
    }

    if !pinned.is_empty() {
        let ids = pinned.into_keys().map(str::to_owned).sorted().collect();
        return Err(SeatingError::UnconsumedPinnedMembers { ids });
    }
    if !pool.is_empty() {
        let ids = pool.into_iter().map(|p| p.id.clone()).sorted().collect();
        return Err(SeatingError::UnassignedMembers { ids });
    }

    info!(seats = placement.len(), pinned = roster.pinned.len(), "initial placement built");
    Ok(placement)
}
