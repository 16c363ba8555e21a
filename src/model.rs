pub mod entity {
    use std::collections::HashSet;
    use std::fmt;

    use crate::seating::SeatingError;

    pub type Id = String;
    pub type GroupId = String;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct Color(pub String);

    impl fmt::Display for Color {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Person {
        pub id: Id,
        pub group_id: GroupId,
        pub color: Option<Color>,
    }

    impl Person {
        pub fn new(id: impl Into<Id>, group_id: impl Into<GroupId>) -> Person {
            Person {
                id: id.into(),
                group_id: group_id.into(),
                color: None,
            }
        }

        pub fn with_color(mut self, color: Color) -> Person {
            self.color = Some(color);
            self
        }
    }

    /// Partition of the full roster into people bound to a named seat and
    /// people free to sit anywhere assignable.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Roster {
        pub pinned: Vec<Person>,
        pub assignable: Vec<Person>,
    }

    impl Roster {
        pub fn split<F>(people: Vec<Person>, is_pinned: F) -> Result<Roster, SeatingError>
        where
            F: Fn(&Person) -> bool,
        {
            let mut seen = HashSet::new();
            let mut roster = Roster::default();
            for person in people {
                if !seen.insert(person.id.clone()) {
                    return Err(SeatingError::DuplicatePerson { id: person.id });
                }
                if is_pinned(&person) {
                    roster.pinned.push(person);
                } else {
                    roster.assignable.push(person);
                }
            }
            Ok(roster)
        }

        pub fn len(&self) -> usize {
            self.pinned.len() + self.assignable.len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }
}


pub mod grid {
    use std::fmt;

    use super::entity::Id;

    /// 1-based grid coordinate.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Cell {
        pub column: usize,
        pub row: usize,
    }

    impl Cell {
        pub fn new(column: usize, row: usize) -> Cell {
            Cell { column, row }
        }

        pub fn right(&self) -> Cell {
            Cell::new(self.column + 1, self.row)
        }

        pub fn down(&self) -> Cell {
            Cell::new(self.column, self.row + 1)
        }

        pub fn left(&self) -> Option<Cell> {
            (self.column > 1).then(|| Cell::new(self.column - 1, self.row))
        }

        pub fn up(&self) -> Option<Cell> {
            (self.row > 1).then(|| Cell::new(self.column, self.row - 1))
        }
    }

    impl fmt::Display for Cell {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "(column {}, row {})", self.column, self.row)
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub enum Marker {
        #[default]
        Empty,
        Pinned(Id),
        Assignable,
    }

    /// Seat markers over `[1..columns] x [1..rows]`, stored column-major.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Layout {
        columns: usize,
        rows: usize,
        markers: Vec<Marker>,
    }

    impl Layout {
        pub fn new(columns: usize, rows: usize) -> Layout {
            Layout {
                columns,
                rows,
                markers: vec![Marker::Empty; columns * rows],
            }
        }

        /// Builds a layout from row-major marker rows; short rows are padded with `Empty`.
        pub fn from_rows(rows: Vec<Vec<Marker>>) -> Layout {
            let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
            let mut layout = Layout::new(columns, rows.len());
            for (r, markers) in rows.into_iter().enumerate() {
                for (c, marker) in markers.into_iter().enumerate() {
                    layout.set(Cell::new(c + 1, r + 1), marker);
                }
            }
            layout
        }

        pub fn columns(&self) -> usize {
            self.columns
        }

        pub fn rows(&self) -> usize {
            self.rows
        }

        fn index(&self, cell: Cell) -> Option<usize> {
            let inside = (1..=self.columns).contains(&cell.column) && (1..=self.rows).contains(&cell.row);
            inside.then(|| (cell.column - 1) * self.rows + (cell.row - 1))
        }

        pub fn set(&mut self, cell: Cell, marker: Marker) {
            match self.index(cell) {
                Some(index) => self.markers[index] = marker,
                None => panic!("{} lies outside the layout", cell),
            }
        }

        pub fn marker(&self, cell: Cell) -> &Marker {
            static EMPTY: Marker = Marker::Empty;
            self.index(cell).map_or(&EMPTY, |index| &self.markers[index])
        }

        /// Every cell in column-major, ascending order.
        pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
            (1..=self.columns).flat_map(move |column| (1..=self.rows).map(move |row| Cell::new(column, row)))
        }

        pub fn iter(&self) -> impl Iterator<Item = (Cell, &Marker)> + '_ {
            self.cells().zip(self.markers.iter())
        }
    }
}


pub mod placement {
    use std::collections::BTreeMap;

    use super::entity::Person;
    use super::grid::Cell;

    #[derive(Debug, Clone, PartialEq)]
    pub struct Seat {
        pub person: Person,
        pub pinned: bool,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Placement {
        pub(crate) seats: BTreeMap<Cell, Seat>,
    }

    impl Placement {
        pub fn new() -> Placement {
            Placement::default()
        }

        /// Binds `person` at `cell`, returning the seat previously there.
        pub fn bind(&mut self, cell: Cell, person: Person, pinned: bool) -> Option<Seat> {
            self.seats.insert(cell, Seat { person, pinned })
        }

        pub fn get(&self, cell: &Cell) -> Option<&Seat> {
            self.seats.get(cell)
        }

        pub fn group_at(&self, cell: &Cell) -> Option<&str> {
            self.seats.get(cell).map(|seat| seat.person.group_id.as_str())
        }

        pub fn cell_of(&self, id: &str) -> Option<Cell> {
            self.seats.iter().find(|(_, seat)| seat.person.id == id).map(|(cell, _)| *cell)
        }

        pub fn len(&self) -> usize {
            self.seats.len()
        }

        pub fn is_empty(&self) -> bool {
            self.seats.is_empty()
        }

        pub fn iter(&self) -> impl Iterator<Item = (&Cell, &Seat)> {
            self.seats.iter()
        }

        pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
            self.seats.keys().copied()
        }

        /// Occupied cells whose occupant may be swapped.
        pub fn movable(&self) -> impl Iterator<Item = (Cell, &Seat)> {
            self.seats.iter().filter(|(_, seat)| !seat.pinned).map(|(cell, seat)| (*cell, seat))
        }
    }
}
