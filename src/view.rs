//! State of the "View Workouts" screen and its update contract.
//!
//! All mutable screen state lives in [`ViewState`]. User actions and request
//! completions both arrive as [`Event`]s through [`ViewState::apply`], which
//! mutates the state and returns the [`Effect`]s the host must carry out:
//! requests to start, or a surface to navigate to.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::grid::GridState;
use crate::models::{CurrentUser, DisplayRow, NewWorkout, WorkoutDate, WorkoutRecord};
use crate::routes::Route;
use crate::rows::{build_rows, sort_rows};

pub const INVALID_WORKOUT_ALERT: &str = "Invalid Workout";
pub const DELETE_FAILED_ALERT: &str = "Error removing workouts";

#[derive(Clone, Debug, PartialEq)]
pub enum Access {
    Pending,
    Granted(CurrentUser),
    /// The identity check failed for a reason other than a rejected
    /// session. Rows are shown but nothing can be created.
    Unverified,
    Denied,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CreateForm {
    pub open: bool,
    pub name: String,
    pub date: NaiveDateTime,
    pub submitting: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    LoadIdentity,
    LoadWorkouts,
    Create { workout: NewWorkout, entered: NaiveDateTime },
    Delete { workout_ids: Vec<i64> },
    Logout,
}

#[derive(Debug)]
pub enum Event {
    IdentityLoaded(Result<CurrentUser, ApiError>),
    WorkoutsLoaded(Result<Vec<WorkoutRecord>, ApiError>),
    OpenCreate,
    CloseCreate,
    SubmitCreate,
    Created {
        usr_id: i64,
        name: String,
        entered: NaiveDateTime,
        result: Result<i64, ApiError>,
    },
    /// Full list of checked sequence ids after a checkbox change.
    SelectionChanged(Vec<usize>),
    DeleteSelected,
    /// One outcome per delete request, delivered once all have settled.
    Deleted(Vec<(i64, Result<(), ApiError>)>),
    Logout,
    LoggedOut(Result<(), ApiError>),
    RowActivated(usize),
    ViewBests,
    DismissAlert,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Spawn(Request),
    Navigate(Route),
}

#[derive(Debug)]
pub struct ViewState {
    pub access: Access,
    rows: Vec<DisplayRow>,
    next_seq: usize,
    selected: Vec<DisplayRow>,
    pub form: CreateForm,
    pub grid: GridState,
    pub alert: Option<String>,
    pub deleting: bool,
    pub logging_out: bool,
    pub loading: bool,
}

impl ViewState {
    /// Fresh state plus the two independent mount-time fetches.
    pub fn mount(now: NaiveDateTime) -> (Self, Vec<Effect>) {
        let state = Self {
            access: Access::Pending,
            rows: Vec::new(),
            next_seq: 0,
            selected: Vec::new(),
            form: CreateForm {
                open: false,
                name: String::new(),
                date: now,
                submitting: false,
            },
            grid: GridState::default(),
            alert: None,
            deleting: false,
            logging_out: false,
            loading: true,
        };
        let effects = vec![
            Effect::Spawn(Request::LoadIdentity),
            Effect::Spawn(Request::LoadWorkouts),
        ];
        (state, effects)
    }

    /// Rows the grid may draw. Nothing is shown while the identity check is
    /// pending or after it rejected the session.
    pub fn rows(&self) -> &[DisplayRow] {
        match self.access {
            Access::Granted(_) | Access::Unverified => &self.rows,
            Access::Pending | Access::Denied => &[],
        }
    }

    pub fn selected(&self) -> &[DisplayRow] {
        &self.selected
    }

    pub fn checked_ids(&self) -> Vec<usize> {
        self.selected.iter().map(|r| r.id).collect()
    }

    pub fn is_checked(&self, seq: usize) -> bool {
        self.selected.iter().any(|r| r.id == seq)
    }

    /// Checked ids after flipping one checkbox.
    pub fn toggled(&self, seq: usize) -> Vec<usize> {
        let mut ids = self.checked_ids();
        if let Some(pos) = ids.iter().position(|&id| id == seq) {
            ids.remove(pos);
        } else {
            ids.push(seq);
        }
        ids
    }

    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::IdentityLoaded(result) => self.on_identity(result),
            Event::WorkoutsLoaded(result) => self.on_workouts(result),
            Event::OpenCreate => {
                self.form.open = true;
                Vec::new()
            }
            Event::CloseCreate => {
                self.form.open = false;
                Vec::new()
            }
            Event::SubmitCreate => self.submit_create(),
            Event::Created {
                usr_id,
                name,
                entered,
                result,
            } => {
                self.on_created(usr_id, name, entered, result);
                Vec::new()
            }
            Event::SelectionChanged(ids) => {
                self.select(&ids);
                Vec::new()
            }
            Event::DeleteSelected => self.delete_selected(),
            Event::Deleted(outcomes) => {
                self.on_deleted(outcomes);
                Vec::new()
            }
            Event::Logout => {
                if self.logging_out {
                    return Vec::new();
                }
                self.logging_out = true;
                vec![Effect::Spawn(Request::Logout)]
            }
            Event::LoggedOut(result) => {
                self.logging_out = false;
                match result {
                    Ok(()) => {
                        info!("logged out");
                        vec![Effect::Navigate(Route::Login)]
                    }
                    Err(err) => {
                        warn!(error = %err, "logout failed");
                        self.alert = Some(format!("{err} error logging out"));
                        Vec::new()
                    }
                }
            }
            Event::RowActivated(seq) => match self.rows().iter().find(|r| r.id == seq) {
                Some(row) => vec![Effect::Navigate(Route::EditWorkout {
                    workout_id: row.workout_id,
                })],
                None => Vec::new(),
            },
            Event::ViewBests => vec![Effect::Navigate(Route::PersonalBests)],
            Event::DismissAlert => {
                self.alert = None;
                Vec::new()
            }
        }
    }

    fn on_identity(&mut self, result: Result<CurrentUser, ApiError>) -> Vec<Effect> {
        match result {
            Ok(user) => {
                debug!(user_id = user.id, "identity resolved");
                self.access = Access::Granted(user);
                Vec::new()
            }
            Err(ApiError::Unauthorized) => {
                info!("not signed in, redirecting to login");
                self.access = Access::Denied;
                vec![Effect::Navigate(Route::Login)]
            }
            Err(err) if err.is_offline() => {
                warn!(error = %err, "identity check failed, client offline");
                vec![Effect::Navigate(Route::Offline)]
            }
            Err(err) => {
                warn!(error = %err, "identity check failed, showing rows without create");
                self.access = Access::Unverified;
                Vec::new()
            }
        }
    }

    fn on_workouts(&mut self, result: Result<Vec<WorkoutRecord>, ApiError>) -> Vec<Effect> {
        self.loading = false;
        match result {
            Ok(records) if !records.is_empty() => {
                self.rows = build_rows(&records);
                self.next_seq = self.rows.len();
                self.selected.clear();
                self.grid.clamp_page(self.rows.len());
                debug!(count = self.rows.len(), "workouts loaded");
                Vec::new()
            }
            Ok(_) => Vec::new(),
            Err(err) if err.is_offline() => {
                warn!(error = %err, "workout list failed, client offline");
                vec![Effect::Navigate(Route::Offline)]
            }
            Err(err) => {
                warn!(error = %err, "workout list failed");
                Vec::new()
            }
        }
    }

    fn submit_create(&mut self) -> Vec<Effect> {
        if self.form.submitting {
            return Vec::new();
        }
        let usr_id = match &self.access {
            Access::Granted(user) => user.id,
            _ => {
                warn!("create attempted before identity resolved");
                self.alert = Some(INVALID_WORKOUT_ALERT.to_string());
                return Vec::new();
            }
        };
        self.form.submitting = true;
        let workout = NewWorkout::new(usr_id, &self.form.name, self.form.date);
        vec![Effect::Spawn(Request::Create {
            workout,
            entered: self.form.date,
        })]
    }

    fn on_created(&mut self, usr_id: i64, name: String, entered: NaiveDateTime, result: Result<i64, ApiError>) {
        self.form.submitting = false;
        match result {
            Ok(workout_id) => {
                self.rows.push(DisplayRow {
                    id: self.next_seq,
                    workout_id,
                    usr_id,
                    workout_name: name,
                    workout_date: WorkoutDate::Entered(entered),
                });
                sort_rows(&mut self.rows);
                self.next_seq += 1;
                self.form.name.clear();
                self.form.open = false;
                info!(workout_id, "workout created");
            }
            Err(err) => {
                warn!(error = %err, "create workout rejected");
                self.alert = Some(INVALID_WORKOUT_ALERT.to_string());
            }
        }
    }

    fn select(&mut self, ids: &[usize]) {
        self.selected = ids
            .iter()
            .filter_map(|id| self.rows.iter().find(|row| row.id == *id))
            .cloned()
            .collect();
        debug!(selected = ?self.checked_ids(), "selection changed");
    }

    fn delete_selected(&mut self) -> Vec<Effect> {
        if self.selected.is_empty() || self.deleting {
            return Vec::new();
        }
        self.deleting = true;
        let workout_ids = self.selected.iter().map(|r| r.workout_id).collect();
        vec![Effect::Spawn(Request::Delete { workout_ids })]
    }

    /// Rows whose delete succeeded are removed; rows whose delete failed stay
    /// and remain selected. Any failure raises the alert.
    fn on_deleted(&mut self, outcomes: Vec<(i64, Result<(), ApiError>)>) {
        self.deleting = false;
        let mut removed = HashSet::new();
        let mut failed = 0usize;
        for (workout_id, result) in outcomes {
            match result {
                Ok(()) => {
                    removed.insert(workout_id);
                }
                Err(err) => {
                    warn!(workout_id, error = %err, "delete failed");
                    failed += 1;
                }
            }
        }

        self.rows.retain(|row| !removed.contains(&row.workout_id));
        self.renumber();
        let kept: Vec<i64> = self
            .selected
            .iter()
            .map(|r| r.workout_id)
            .filter(|id| !removed.contains(id))
            .collect();
        self.selected = self
            .rows
            .iter()
            .filter(|row| kept.contains(&row.workout_id))
            .cloned()
            .collect();
        self.grid.editing = None;
        self.grid.clamp_page(self.rows.len());

        if failed > 0 {
            self.alert = Some(DELETE_FAILED_ALERT.to_string());
        }
        info!(removed = removed.len(), failed, "delete settled");
    }

    /// Compact sequence ids to 0..N-1, keeping their relative order.
    fn renumber(&mut self) {
        let mut by_seq: Vec<usize> = (0..self.rows.len()).collect();
        by_seq.sort_by_key(|&i| self.rows[i].id);
        for (seq, index) in by_seq.into_iter().enumerate() {
            self.rows[index].id = seq;
        }
        self.next_seq = self.rows.len();
    }
}
