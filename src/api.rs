//! Blocking client for the workout API.
//!
//! [`WorkoutApi`] is the seam the view runtime talks to; [`HttpClient`] is
//! the reqwest implementation. Every call blocks, so callers run them off the
//! UI thread (see [`crate::runtime`]).

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{header, Method, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};
use crate::models::{CreatedWorkout, CurrentUser, NewWorkout, WorkoutRecord};

pub const CURRENT_USER_PATH: &str = "/api/users/current/";
pub const WORKOUTS_PATH: &str = "/api/workouts/";
pub const LOGOUT_PATH: &str = "/api/users/logout";

pub trait WorkoutApi: Send + Sync {
    fn current_user(&self) -> Result<CurrentUser, ApiError>;
    fn list_workouts(&self) -> Result<Vec<WorkoutRecord>, ApiError>;
    /// Returns the id the server assigned to the new workout.
    fn create_workout(&self, workout: &NewWorkout) -> Result<i64, ApiError>;
    fn delete_workout(&self, workout_id: i64) -> Result<(), ApiError>;
    /// Any HTTP response counts as logged out; only transport failures error.
    fn logout(&self) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    http: Client,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(cookie) = &config.session_cookie {
            let value = header::HeaderValue::from_str(cookie).map_err(|_| ConfigError::Cookie)?;
            default_headers.insert(header::COOKIE, value);
        }

        let mut builder = Client::builder().default_headers(default_headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "building request");
        self.http.request(method, url)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        request.send().map_err(ApiError::from_transport)
    }
}

/// Turn a non-success response into an error, keeping its body for the log.
fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(ApiError::Status { status, body });
    }
    Ok(response)
}

/// The list endpoint wraps the records in an object; the records are its
/// first value. Anything other than an array there means no records.
pub fn parse_workout_list(body: Value) -> Result<Vec<WorkoutRecord>, ApiError> {
    let first = match body {
        Value::Object(map) => map.into_iter().next().map(|(_, v)| v),
        _ => None,
    };
    match first {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(|e| ApiError::Decode(e.to_string())))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

impl WorkoutApi for HttpClient {
    fn current_user(&self) -> Result<CurrentUser, ApiError> {
        let response = check_status(self.send(self.request(Method::GET, CURRENT_USER_PATH))?)?;
        response.json().map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn list_workouts(&self) -> Result<Vec<WorkoutRecord>, ApiError> {
        let response = check_status(self.send(self.request(Method::GET, WORKOUTS_PATH))?)?;
        let body: Value = response.json().map_err(|e| ApiError::Decode(e.to_string()))?;
        parse_workout_list(body)
    }

    fn create_workout(&self, workout: &NewWorkout) -> Result<i64, ApiError> {
        let response = check_status(self.send(self.request(Method::POST, WORKOUTS_PATH).json(workout))?)?;
        let created: CreatedWorkout = response.json().map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(created.success)
    }

    fn delete_workout(&self, workout_id: i64) -> Result<(), ApiError> {
        let path = format!("{WORKOUTS_PATH}{workout_id}");
        check_status(self.send(self.request(Method::DELETE, &path))?)?;
        Ok(())
    }

    fn logout(&self) -> Result<(), ApiError> {
        let response = self.send(self.request(Method::POST, LOGOUT_PATH).json(&serde_json::json!({})))?;
        debug!(status = %response.status(), "logout response");
        Ok(())
    }
}
