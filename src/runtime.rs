//! Runs view requests on background threads.
//!
//! Completions come back as [`Event`]s on a channel owned by the mounted
//! view. When the view is unmounted the receiver is dropped and late results
//! are discarded.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

use crate::api::WorkoutApi;
use crate::error::ApiError;
use crate::view::{Event, Request};

pub struct Runtime {
    api: Arc<dyn WorkoutApi>,
    tx: Sender<Event>,
    rx: Receiver<Event>,
    ctx: Option<eframe::egui::Context>,
}

impl Runtime {
    pub fn new(api: Arc<dyn WorkoutApi>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { api, tx, rx, ctx: None }
    }

    /// Repaint this context whenever a request completes.
    pub fn with_repaint(mut self, ctx: eframe::egui::Context) -> Self {
        self.ctx = Some(ctx);
        self
    }

    /// Run `request` on its own thread. The handle is only useful to callers
    /// that need to know the worker has finished; the app shell drops it.
    pub fn spawn(&self, request: Request) -> JoinHandle<()> {
        debug!(?request, "spawning request");
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let ctx = self.ctx.clone();
        thread::spawn(move || {
            let event = execute(api.as_ref(), request);
            // The view may be gone already; that is fine.
            if tx.send(event).is_ok() {
                if let Some(ctx) = ctx {
                    ctx.request_repaint();
                }
            }
        })
    }

    /// Completed events, without blocking.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }

    pub fn wait(&self, timeout: Duration) -> Option<Event> {
        self.rx.recv_timeout(timeout).ok()
    }
}

fn execute(api: &dyn WorkoutApi, request: Request) -> Event {
    match request {
        Request::LoadIdentity => Event::IdentityLoaded(api.current_user()),
        Request::LoadWorkouts => Event::WorkoutsLoaded(api.list_workouts()),
        Request::Create { workout, entered } => {
            let result = api.create_workout(&workout);
            Event::Created {
                usr_id: workout.usr_id,
                name: workout.name,
                entered,
                result,
            }
        }
        Request::Delete { workout_ids } => {
            let outcomes: Vec<(i64, Result<(), ApiError>)> = thread::scope(|scope| {
                let handles: Vec<_> = workout_ids
                    .iter()
                    .map(|&workout_id| scope.spawn(move || (workout_id, api.delete_workout(workout_id))))
                    .collect();
                handles
                    .into_iter()
                    .zip(workout_ids.iter())
                    .map(|(handle, &workout_id)| {
                        handle
                            .join()
                            .unwrap_or_else(|_| (workout_id, Err(ApiError::Worker("delete worker panicked".to_string()))))
                    })
                    .collect()
            });
            Event::Deleted(outcomes)
        }
        Request::Logout => Event::LoggedOut(api.logout()),
    }
}
