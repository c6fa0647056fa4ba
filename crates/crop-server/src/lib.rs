//! Crop Server - the analysis endpoint
//!
//! Accepts `POST /api/analyze` multipart uploads, runs the [`Analyzer`],
//! appends an analysis record to the store as a fire-and-forget side effect,
//! and answers with the diagnosis or a typed error body.
//!
//! The HTTP response depends only on the Analyzer outcome. Store failures are
//! logged and broadcast on [`AppState::subscribe_store_errors`]; they never
//! change the status code the client sees.
//!
//! # Example
//!
//! ```rust,ignore
//! use crop_server::{AppState, PlaceholderAnalyzer, spawn_ephemeral};
//! use crop_store::MemoryStore;
//! use std::sync::Arc;
//!
//! let state = AppState::new(
//!     Arc::new(PlaceholderAnalyzer::default()),
//!     Arc::new(MemoryStore::new()),
//! );
//! let addr = spawn_ephemeral(state, 10 * 1024 * 1024);
//! println!("listening on {addr}");
//! ```

#![warn(unreachable_pub)]

pub mod analyzer;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use analyzer::{AnalysisInput, Analyzer, AnalyzerError, PlaceholderAnalyzer};
pub use error::{ApiError, ServerError};
pub use routes::routes;
pub use server::{serve, spawn_ephemeral};
pub use state::AppState;
