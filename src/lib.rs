//! CandiDash - terminal dashboard for tracking job applications.
//!
//! The crate is a library so integration tests can drive the wizard and
//! the API client directly; the `candidash` binary is a thin CLI over
//! [`app::App`].

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod types;
pub mod ui;
pub mod wizard;
