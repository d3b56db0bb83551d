use std::collections::HashSet;
use std::sync::{Arc, Barrier, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::StatusCode;

use workout_log::api::WorkoutApi;
use workout_log::error::ApiError;
use workout_log::models::{CurrentUser, NewWorkout, WorkoutRecord};
use workout_log::routes::Route;
use workout_log::runtime::Runtime;
use workout_log::view::{Effect, Event, Request, ViewState, DELETE_FAILED_ALERT};

const WAIT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct FakeApi {
    unauthorized: bool,
    records: Vec<WorkoutRecord>,
    failing_deletes: HashSet<i64>,
    panicking_deletes: HashSet<i64>,
    list_barrier: Option<Arc<Barrier>>,
    delete_barrier: Option<Arc<Barrier>>,
    deleted: Mutex<Vec<i64>>,
    created: Mutex<Vec<NewWorkout>>,
}

impl WorkoutApi for FakeApi {
    fn current_user(&self) -> Result<CurrentUser, ApiError> {
        if self.unauthorized {
            Err(ApiError::Unauthorized)
        } else {
            Ok(CurrentUser { id: 5 })
        }
    }

    fn list_workouts(&self) -> Result<Vec<WorkoutRecord>, ApiError> {
        if let Some(barrier) = &self.list_barrier {
            barrier.wait();
        }
        Ok(self.records.clone())
    }

    fn create_workout(&self, workout: &NewWorkout) -> Result<i64, ApiError> {
        if workout.name.is_empty() {
            return Err(ApiError::Status {
                status: StatusCode::BAD_REQUEST,
                body: "name required".to_string(),
            });
        }
        self.created.lock().unwrap().push(workout.clone());
        Ok(100)
    }

    fn delete_workout(&self, workout_id: i64) -> Result<(), ApiError> {
        // Every delete waits for its siblings, so this only returns if the
        // requests really run at the same time.
        if let Some(barrier) = &self.delete_barrier {
            barrier.wait();
        }
        if self.panicking_deletes.contains(&workout_id) {
            panic!("delete of {workout_id} blew up");
        }
        self.deleted.lock().unwrap().push(workout_id);
        if self.failing_deletes.contains(&workout_id) {
            Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: String::new(),
            })
        } else {
            Ok(())
        }
    }

    fn logout(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

fn record(workout_id: i64, name: &str, date: &str) -> WorkoutRecord {
    WorkoutRecord {
        workout_id,
        usr_id: 5,
        workout_name: name.to_string(),
        workout_date: date.to_string(),
    }
}

fn records() -> Vec<WorkoutRecord> {
    vec![
        record(3, "Push", "2024-01-10 08:00:00"),
        record(5, "Pull", "2024-03-02 08:00:00"),
        record(7, "Legs", "2024-02-14 08:00:00"),
        record(9, "Core", "2023-12-01 08:00:00"),
    ]
}

/// Drives a view the way the app shell does, collecting navigations.
struct Harness {
    view: ViewState,
    runtime: Runtime,
    navigations: Vec<Route>,
}

impl Harness {
    fn mount(api: Arc<FakeApi>) -> Self {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let (view, effects) = ViewState::mount(now);
        let mut harness = Self {
            view,
            runtime: Runtime::new(api),
            navigations: Vec::new(),
        };
        harness.run(effects);
        harness
    }

    fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Spawn(request) => {
                    self.runtime.spawn(request);
                }
                Effect::Navigate(route) => self.navigations.push(route),
            }
        }
    }

    fn send(&mut self, event: Event) {
        let effects = self.view.apply(event);
        self.run(effects);
    }

    /// Wait for `n` completions and apply them.
    fn settle(&mut self, n: usize) {
        for _ in 0..n {
            let event = self.runtime.wait(WAIT).expect("request did not complete");
            self.send(event);
        }
    }
}

#[test]
fn mount_loads_identity_and_rows() {
    let api = Arc::new(FakeApi {
        records: records(),
        ..FakeApi::default()
    });
    let mut harness = Harness::mount(api);
    harness.settle(2);

    let ids: Vec<i64> = harness.view.rows().iter().map(|r| r.workout_id).collect();
    assert_eq!(ids, vec![5, 7, 3, 9]);
    assert!(harness.navigations.is_empty());
}

#[test]
fn unauthorized_session_redirects_without_rows() {
    let api = Arc::new(FakeApi {
        unauthorized: true,
        records: records(),
        ..FakeApi::default()
    });
    let mut harness = Harness::mount(api);
    harness.settle(2);

    assert_eq!(harness.navigations, vec![Route::Login]);
    assert!(harness.view.rows().is_empty());
}

#[test]
fn create_round_trip_adds_one_row() {
    let api = Arc::new(FakeApi {
        records: records(),
        ..FakeApi::default()
    });
    let mut harness = Harness::mount(Arc::clone(&api));
    harness.settle(2);

    harness.send(Event::OpenCreate);
    harness.view.form.name = "Leg Day".to_string();
    harness.view.form.date = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap().and_hms_opt(18, 45, 0).unwrap();
    harness.send(Event::SubmitCreate);
    harness.settle(1);

    assert_eq!(harness.view.rows().len(), 5);
    assert!(harness.view.rows().iter().any(|r| r.workout_name == "Leg Day" && r.workout_id == 100));
    assert!(!harness.view.form.open);

    let sent = api.created.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].date, "2024-02-20 18:45:00");
    assert_eq!(sent[0].usr_id, 5);
}

#[test]
fn rejected_create_changes_nothing() {
    let api = Arc::new(FakeApi {
        records: records(),
        ..FakeApi::default()
    });
    let mut harness = Harness::mount(api);
    harness.settle(2);
    let before = harness.view.rows().to_vec();

    harness.send(Event::OpenCreate);
    harness.send(Event::SubmitCreate);
    harness.settle(1);

    assert_eq!(harness.view.rows(), before.as_slice());
    assert!(harness.view.form.open);
    assert!(harness.view.alert.is_some());
}

#[test]
fn deletes_run_concurrently_and_remove_rows() {
    let api = Arc::new(FakeApi {
        records: records(),
        delete_barrier: Some(Arc::new(Barrier::new(2))),
        ..FakeApi::default()
    });
    let mut harness = Harness::mount(Arc::clone(&api));
    harness.settle(2);

    // sequence ids follow fetch order, so 0 and 2 are workouts 3 and 7
    harness.send(Event::SelectionChanged(vec![0, 2]));
    harness.send(Event::DeleteSelected);
    harness.settle(1);

    assert_eq!(harness.view.rows().len(), 2);
    assert!(harness.view.rows().iter().all(|r| r.workout_id != 3 && r.workout_id != 7));
    assert!(harness.view.alert.is_none());

    let mut deleted = api.deleted.lock().unwrap().clone();
    deleted.sort_unstable();
    assert_eq!(deleted, vec![3, 7]);
}

#[test]
fn failed_delete_alerts_and_keeps_that_row() {
    let api = Arc::new(FakeApi {
        records: records(),
        failing_deletes: [7].into_iter().collect(),
        ..FakeApi::default()
    });
    let mut harness = Harness::mount(api);
    harness.settle(2);

    harness.send(Event::SelectionChanged(vec![0, 2]));
    harness.send(Event::DeleteSelected);
    harness.settle(1);

    let ids: Vec<i64> = harness.view.rows().iter().map(|r| r.workout_id).collect();
    assert_eq!(ids, vec![5, 7, 9]);
    assert_eq!(harness.view.alert.as_deref(), Some(DELETE_FAILED_ALERT));
}

#[test]
fn logout_then_navigates_to_login() {
    let api = Arc::new(FakeApi::default());
    let mut harness = Harness::mount(api);
    harness.settle(2);

    harness.send(Event::Logout);
    harness.settle(1);
    assert_eq!(harness.navigations, vec![Route::Login]);
}

#[test]
fn panicked_delete_worker_counts_as_failure() {
    let api = Arc::new(FakeApi {
        records: records(),
        panicking_deletes: [3].into_iter().collect(),
        ..FakeApi::default()
    });
    let mut harness = Harness::mount(Arc::clone(&api));
    harness.settle(2);

    harness.send(Event::SelectionChanged(vec![0, 2]));
    harness.send(Event::DeleteSelected);
    harness.settle(1);

    let ids: Vec<i64> = harness.view.rows().iter().map(|r| r.workout_id).collect();
    assert_eq!(ids, vec![5, 3, 9]);
    assert_eq!(harness.view.alert.as_deref(), Some(DELETE_FAILED_ALERT));
    assert!(!harness.view.deleting);
    assert_eq!(api.deleted.lock().unwrap().clone(), vec![7]);
}

#[test]
fn results_after_unmount_are_dropped() {
    let gate = Arc::new(Barrier::new(2));
    let stale_api = Arc::new(FakeApi {
        records: vec![record(42, "Stale", "2025-01-01 08:00:00")],
        list_barrier: Some(Arc::clone(&gate)),
        ..FakeApi::default()
    });
    let stale = Runtime::new(stale_api);
    let worker = stale.spawn(Request::LoadWorkouts);

    // Unmount while the list request is still in flight, then let it finish.
    drop(stale);
    gate.wait();
    assert!(worker.join().is_ok());

    let mut harness = Harness::mount(Arc::new(FakeApi {
        records: records(),
        ..FakeApi::default()
    }));
    harness.settle(2);

    let ids: Vec<i64> = harness.view.rows().iter().map(|r| r.workout_id).collect();
    assert_eq!(ids, vec![5, 7, 3, 9]);
    assert!(harness.runtime.wait(Duration::from_millis(100)).is_none());
}
