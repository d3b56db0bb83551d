use std::sync::Arc;

use chrono::Local;
use eframe::{egui, App, CreationContext, Frame};
use tracing::info;

use crate::api::WorkoutApi;
use crate::routes::Route;
use crate::runtime::Runtime;
use crate::ui;
use crate::view::{Effect, Event, ViewState};

/// A mounted workout list: its state plus the channel its requests report to.
struct Mounted {
    view: ViewState,
    runtime: Runtime,
}

pub struct WorkoutApp {
    api: Arc<dyn WorkoutApi>,
    ctx: egui::Context,
    route: Route,
    mounted: Option<Mounted>,
}

impl WorkoutApp {
    pub fn new(cc: &CreationContext, api: Arc<dyn WorkoutApi>) -> Self {
        let mut style = (*cc.egui_ctx.style()).clone();
        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::new(18.0, egui::FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Heading,
            egui::FontId::new(28.0, egui::FontFamily::Proportional),
        );
        cc.egui_ctx.set_style(style);

        let mut app = WorkoutApp {
            api,
            ctx: cc.egui_ctx.clone(),
            route: Route::Workouts,
            mounted: None,
        };
        app.mount();
        app
    }

    fn mount(&mut self) {
        let runtime = Runtime::new(Arc::clone(&self.api)).with_repaint(self.ctx.clone());
        let (view, effects) = ViewState::mount(Local::now().naive_local());
        self.mounted = Some(Mounted { view, runtime });
        self.run_effects(effects);
    }

    fn navigate(&mut self, route: Route) {
        info!(path = %route, "navigating");
        // Dropping the mounted view drops its receiver; in-flight results
        // for it are discarded.
        self.mounted = None;
        self.route = route;
        if self.route == Route::Workouts {
            self.mount();
        }
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Spawn(request) => {
                    if let Some(mounted) = &self.mounted {
                        mounted.runtime.spawn(request);
                    }
                }
                Effect::Navigate(route) => {
                    self.navigate(route);
                    return;
                }
            }
        }
    }

    fn dispatch(&mut self, events: Vec<Event>) {
        for event in events {
            let Some(mounted) = self.mounted.as_mut() else {
                return;
            };
            let effects = mounted.view.apply(event);
            self.run_effects(effects);
        }
    }

    fn show_workouts(&mut self, ctx: &egui::Context) {
        let Some(mounted) = self.mounted.as_mut() else {
            return;
        };
        let completed = mounted.runtime.drain();
        self.dispatch(completed);

        let actions = match self.mounted.as_mut() {
            Some(mounted) => ui::show_workouts(ctx, &mut mounted.view),
            None => return,
        };
        self.dispatch(actions);
    }
}

impl App for WorkoutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        match self.route.clone() {
            Route::Workouts => self.show_workouts(ctx),
            Route::Login => {
                if ui::show_surface(ctx, "Signed out", "Sign in to continue.", "Back to workouts") {
                    self.navigate(Route::Workouts);
                }
            }
            Route::Offline => {
                if ui::show_surface(ctx, "Offline", "The workout server can't be reached.", "Retry") {
                    self.navigate(Route::Workouts);
                }
            }
            Route::EditWorkout { workout_id } => {
                let detail = format!("Editing workout #{workout_id}");
                if ui::show_surface(ctx, "Edit Workout", &detail, "Back to workouts") {
                    self.navigate(Route::Workouts);
                }
            }
            Route::PersonalBests => {
                if ui::show_surface(ctx, "Personal Bests", "Your PRs live here.", "Back to workouts") {
                    self.navigate(Route::Workouts);
                }
            }
        }
    }
}
