//! handpoint-platform: I/O boundary for handpoint.
//!
//! This crate provides:
//! - Pointer injection on the local display via `enigo`
//! - The fire-and-forget HTTP backend client (`tokio` + `reqwest`)
//! - The JSON-lines landmark source reader
//! - Click acknowledgment feedback
//!
//! ## Module Structure
//!
//! - `error` - Common error types
//! - `injector` - Pointer sinks (enigo, no-op)
//! - `backend` - Remote backend sink and health probe
//! - `landmark_source` - Landmark stream reader thread
//! - `feedback` - Feedback sinks

mod backend;
mod error;
mod feedback;
mod injector;
mod landmark_source;

pub use error::{PlatformError, PlatformResult};

pub use backend::{BackendHealth, HttpBackend};
pub use feedback::LogFeedback;
pub use injector::{EnigoPointer, NoopPointer};
pub use landmark_source::{
    open_input, parse_line, start_json_source, SourceConfig, SourceEvent, SourceHandle,
};
