//! Table presentation state: header sorting, pagination and in-place cell
//! edits. None of it touches the view's row list; sorting only changes the
//! order rows are drawn in, and edits are thrown away on commit.

use std::cmp::Ordering;

use tracing::debug;

use crate::models::DisplayRow;
use crate::rows::by_date_desc;

pub const PAGE_SIZE: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Name,
    Date,
}

impl Column {
    pub fn header(self) -> &'static str {
        match self {
            Column::Name => "Workout",
            Column::Date => "Date",
        }
    }

    pub fn value(self, row: &DisplayRow) -> String {
        match self {
            Column::Name => row.workout_name.clone(),
            Column::Date => row.workout_date.to_string(),
        }
    }
}

pub const COLUMNS: [Column; 2] = [Column::Name, Column::Date];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// What a click on a grid cell does. A primary click activates the row,
/// so in-place editing hangs off the secondary button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellGesture {
    Activate,
    Edit,
    Ignore,
}

pub fn cell_gesture(primary_clicked: bool, secondary_clicked: bool) -> CellGesture {
    if secondary_clicked {
        CellGesture::Edit
    } else if primary_clicked {
        CellGesture::Activate
    } else {
        CellGesture::Ignore
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellEdit {
    pub row_id: usize,
    pub column: Column,
    pub buffer: String,
}

#[derive(Clone, Debug, Default)]
pub struct GridState {
    pub sort: Option<(Column, SortDirection)>,
    pub page: usize,
    pub editing: Option<CellEdit>,
}

impl GridState {
    /// Header click cycles ascending, descending, unsorted.
    pub fn toggle_sort(&mut self, column: Column) {
        self.sort = match self.sort {
            Some((c, SortDirection::Ascending)) if c == column => Some((column, SortDirection::Descending)),
            Some((c, SortDirection::Descending)) if c == column => None,
            _ => Some((column, SortDirection::Ascending)),
        };
        self.page = 0;
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(PAGE_SIZE).max(1)
    }

    pub fn clamp_page(&mut self, total: usize) {
        let last = self.page_count(total) - 1;
        if self.page > last {
            self.page = last;
        }
    }

    pub fn next_page(&mut self, total: usize) {
        if self.page + 1 < self.page_count(total) {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// Rows for the current page, in display order.
    pub fn visible<'a>(&self, rows: &'a [DisplayRow]) -> Vec<&'a DisplayRow> {
        let mut ordered: Vec<&DisplayRow> = rows.iter().collect();
        if let Some((column, direction)) = self.sort {
            ordered.sort_by(|a, b| {
                let ord = compare(column, a, b);
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
        ordered.into_iter().skip(self.page * PAGE_SIZE).take(PAGE_SIZE).collect()
    }

    pub fn begin_edit(&mut self, row: &DisplayRow, column: Column) {
        self.editing = Some(CellEdit {
            row_id: row.id,
            column,
            buffer: column.value(row),
        });
    }

    /// No commit handler exists, so the edited text is dropped.
    pub fn finish_edit(&mut self) {
        if let Some(edit) = self.editing.take() {
            debug!(row_id = edit.row_id, column = ?edit.column, "cell edit discarded");
        }
    }
}

fn compare(column: Column, a: &DisplayRow, b: &DisplayRow) -> Ordering {
    match column {
        Column::Name => a.workout_name.to_lowercase().cmp(&b.workout_name.to_lowercase()),
        // Ascending means oldest first, the reverse of the stored order.
        Column::Date => by_date_desc(b, a),
    }
}
