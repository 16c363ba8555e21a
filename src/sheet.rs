//! CSV renditions of the roster and seat sheets.
//!
//! The roster sheet has one column per group: the first row holds the group
//! name and the members follow top-down until the first blank cell. The seat
//! sheet has no header; each cell is blank, a pinned member's name, or the
//! assignable marker. Rows made only of blanks must still carry their commas,
//! since the reader drops empty lines.

use std::io;

use csv::{ReaderBuilder, WriterBuilder};
use itertools::Itertools;
use thiserror::Error;

use crate::config::{Config, MarkerConfig};
use crate::model::entity::Person;
use crate::model::grid::{Cell, Layout, Marker};
use crate::model::placement::{Placement, Seat};

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("unrecognized seat marker {text:?} at {cell}")]
    UnknownMarker { cell: Cell, text: String },

    #[error("group column {column} lists members but has no name")]
    EmptyHeader { column: usize },
}

fn read_grid<R: io::Read>(reader: R) -> Result<Vec<Vec<String>>, SheetError> {
    let mut reader = ReaderBuilder::new().has_headers(false).flexible(true).from_reader(reader);
    reader
        .records()
        .map(|record| Ok(record?.iter().map(|field| field.trim().to_owned()).collect()))
        .collect()
}

pub fn read_roster<R: io::Read>(reader: R, config: &Config) -> Result<Vec<Person>, SheetError> {
    let grid = read_grid(reader)?;
    let Some((header, rows)) = grid.split_first() else {
        return Ok(Vec::new());
    };

    let mut people = Vec::new();
    for (index, group) in header.iter().enumerate() {
        let members = rows
            .iter()
            .map(|row| row.get(index).map_or("", String::as_str))
            .take_while(|name| !name.is_empty())
            .collect_vec();
        if group.is_empty() {
            if members.is_empty() {
                continue;
            }
            return Err(SheetError::EmptyHeader { column: index + 1 });
        }
        let color = config.color_of(group);
        people.extend(members.into_iter().map(|name| Person {
            id: name.to_owned(),
            group_id: group.clone(),
            color: color.clone(),
        }));
    }
    Ok(people)
}

fn classify(cell: Cell, text: String, markers: &MarkerConfig) -> Result<Marker, SheetError> {
    if text.is_empty() {
        Ok(Marker::Empty)
    } else if text.starts_with(&markers.pinned_prefix) {
        Ok(Marker::Pinned(text))
    } else if text.contains(&markers.assignable) {
        Ok(Marker::Assignable)
    } else {
        Err(SheetError::UnknownMarker { cell, text })
    }
}

pub fn read_layout<R: io::Read>(reader: R, markers: &MarkerConfig) -> Result<Layout, SheetError> {
    let rows = read_grid(reader)?
        .into_iter()
        .enumerate()
        .map(|(r, row)| {
            row.into_iter()
                .enumerate()
                .map(|(c, text)| classify(Cell::new(c + 1, r + 1), text, markers))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Layout::from_rows(rows))
}

/// Writes one CSV row per layout row, rendering occupied cells with `field`.
pub fn write_grid<W, F>(placement: &Placement, layout: &Layout, writer: W, field: F) -> Result<(), SheetError>
where
    W: io::Write,
    F: Fn(&Seat) -> String,
{
    let mut writer = WriterBuilder::new().from_writer(writer);
    for row in 1..=layout.rows() {
        let record = (1..=layout.columns())
            .map(|column| placement.get(&Cell::new(column, row)).map(&field).unwrap_or_default())
            .collect_vec();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_names<W: io::Write>(placement: &Placement, layout: &Layout, writer: W) -> Result<(), SheetError> {
    write_grid(placement, layout, writer, |seat| seat.person.id.clone())
}

pub fn write_colors<W: io::Write>(placement: &Placement, layout: &Layout, writer: W) -> Result<(), SheetError> {
    write_grid(placement, layout, writer, |seat| {
        seat.person.color.as_ref().map(ToString::to_string).unwrap_or_default()
    })
}
