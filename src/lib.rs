pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod grid;
pub mod models;
pub mod routes;
pub mod rows;
pub mod runtime;
pub mod ui;
pub mod view;
