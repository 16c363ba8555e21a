use std::mem;

use thiserror::Error;

use crate::model::grid::Cell;
use crate::model::placement::Placement;

/// Exchange of the occupants of two unpinned seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swap {
    pub first: Cell,
    pub second: Cell,
}

impl Swap {
    pub fn new(first: Cell, second: Cell) -> Swap {
        Swap { first, second }
    }

    pub fn touches(&self, cell: &Cell) -> bool {
        self.first == *cell || self.second == *cell
    }

    /// The cell whose occupant lands on `cell` once the swap is applied.
    pub fn source_of(&self, cell: Cell) -> Cell {
        if cell == self.first {
            self.second
        } else if cell == self.second {
            self.first
        } else {
            cell
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ActionError {
    #[error("no seat at {0}")]
    Vacant(Cell),
    #[error("seat at {0} is pinned")]
    Pinned(Cell),
    #[error("cannot swap {0} with itself")]
    SameCell(Cell),
}

impl Placement {
    fn check_movable(&self, cell: &Cell) -> Result<(), ActionError> {
        match self.get(cell) {
            None => Err(ActionError::Vacant(*cell)),
            Some(seat) if seat.pinned => Err(ActionError::Pinned(*cell)),
            Some(_) => Ok(()),
        }
    }

    /// Exchanges the people bound at the two cells; pin flags stay with the cells.
    pub fn apply(&mut self, swap: &Swap) -> Result<(), ActionError> {
        if swap.first == swap.second {
            return Err(ActionError::SameCell(swap.first));
        }
        self.check_movable(&swap.first)?;
        self.check_movable(&swap.second)?;

        let first = self.seats.get(&swap.first).ok_or(ActionError::Vacant(swap.first))?.person.clone();
        let second = self.seats.get_mut(&swap.second).ok_or(ActionError::Vacant(swap.second))?;
        let displaced = mem::replace(&mut second.person, first);
        let first = self.seats.get_mut(&swap.first).ok_or(ActionError::Vacant(swap.first))?;
        first.person = displaced;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity::Person;

    fn placement() -> Placement {
        let mut placement = Placement::new();
        placement.bind(Cell::new(1, 1), Person::new("#Ann", "x"), true);
        placement.bind(Cell::new(2, 1), Person::new("Bob", "x"), false);
        placement.bind(Cell::new(1, 2), Person::new("Cid", "y"), false);
        placement
    }

    #[test]
    fn apply_exchanges_people_and_keeps_flags() {
        let mut placement = placement();
        placement.apply(&Swap::new(Cell::new(2, 1), Cell::new(1, 2))).unwrap();
        assert_eq!(placement.cell_of("Bob"), Some(Cell::new(1, 2)));
        assert_eq!(placement.cell_of("Cid"), Some(Cell::new(2, 1)));
        assert!(placement.movable().all(|(_, seat)| !seat.pinned));
        assert_eq!(placement.movable().count(), 2);
    }

    #[test]
    fn applying_twice_restores_bindings() {
        let original = placement();
        let mut placement = original.clone();
        let swap = Swap::new(Cell::new(2, 1), Cell::new(1, 2));
        placement.apply(&swap).unwrap();
        placement.apply(&swap).unwrap();
        assert_eq!(placement, original);
    }

    #[test]
    fn illegal_swaps_leave_placement_untouched() {
        let original = placement();
        let mut placement = original.clone();
        assert_eq!(
            placement.apply(&Swap::new(Cell::new(1, 1), Cell::new(2, 1))),
            Err(ActionError::Pinned(Cell::new(1, 1)))
        );
        assert_eq!(
            placement.apply(&Swap::new(Cell::new(2, 1), Cell::new(5, 5))),
            Err(ActionError::Vacant(Cell::new(5, 5)))
        );
        assert_eq!(
            placement.apply(&Swap::new(Cell::new(2, 1), Cell::new(2, 1))),
            Err(ActionError::SameCell(Cell::new(2, 1)))
        );
        assert_eq!(placement, original);
    }

    #[test]
    fn source_of_maps_swapped_cells() {
        let swap = Swap::new(Cell::new(1, 1), Cell::new(3, 2));
        assert_eq!(swap.source_of(Cell::new(1, 1)), Cell::new(3, 2));
        assert_eq!(swap.source_of(Cell::new(3, 2)), Cell::new(1, 1));
        assert_eq!(swap.source_of(Cell::new(2, 2)), Cell::new(2, 2));
        assert!(swap.touches(&Cell::new(3, 2)));
    }
}
