use std::fmt;

/// Surfaces the workout list can navigate to. Only `Workouts` is rendered by
/// this crate; the others belong to collaborating screens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Workouts,
    Login,
    Offline,
    /// Carries the workout to edit as navigation state.
    EditWorkout { workout_id: i64 },
    PersonalBests,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Workouts => f.write_str("/viewWorkouts"),
            Route::Login => f.write_str("/login"),
            Route::Offline => f.write_str("/offline"),
            Route::EditWorkout { .. } => f.write_str("/editWorkout"),
            Route::PersonalBests => f.write_str("/personalBests"),
        }
    }
}
