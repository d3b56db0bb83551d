//models.rs
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Date format the workouts table expects on insert.
pub const SQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub workout_id: i64,
    pub usr_id: i64,
    pub workout_name: String,
    pub workout_date: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewWorkout {
    pub usr_id: i64,
    pub name: String,
    pub date: String,
}

impl NewWorkout {
    pub fn new(usr_id: i64, name: &str, entered: NaiveDateTime) -> Self {
        Self {
            usr_id,
            name: name.to_string(),
            date: entered.format(SQL_DATETIME_FORMAT).to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreatedWorkout {
    pub success: i64,
}

/// Date shown in a row: either the server's text, or the value picked in the
/// create dialog. A freshly created row keeps the picked value rather than
/// the formatted string that was posted.
#[derive(Clone, Debug, PartialEq)]
pub enum WorkoutDate {
    Server(String),
    Entered(NaiveDateTime),
}

impl WorkoutDate {
    pub fn sort_key(&self) -> Option<NaiveDateTime> {
        match self {
            WorkoutDate::Server(raw) => crate::rows::parse_workout_date(raw),
            WorkoutDate::Entered(at) => Some(*at),
        }
    }
}

impl fmt::Display for WorkoutDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkoutDate::Server(raw) => f.write_str(raw),
            WorkoutDate::Entered(at) => write!(f, "{}", at.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

/// A record as displayed. `id` is a sequence number local to the current
/// row set; only `workout_id` identifies the workout to the server.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayRow {
    pub id: usize,
    pub workout_id: i64,
    pub usr_id: i64,
    pub workout_name: String,
    pub workout_date: WorkoutDate,
}

impl DisplayRow {
    pub fn from_record(id: usize, record: &WorkoutRecord) -> Self {
        Self {
            id,
            workout_id: record.workout_id,
            usr_id: record.usr_id,
            workout_name: record.workout_name.clone(),
            workout_date: WorkoutDate::Server(record.workout_date.clone()),
        }
    }
}
