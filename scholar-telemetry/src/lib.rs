//! # scholar-telemetry
//!
//! Logging for the scholar study assistant.
//!
//! - [`init_telemetry`] installs the global subscriber: a stderr layer
//!   filtered by `RUST_LOG` and, when configured, an append-only log file
//!   that receives every turn record.
//! - [`TurnCapture`] keeps matching events in memory, for tests and
//!   embedding applications that want to inspect turn records directly.
//!
//! Turn records are emitted by `scholar-rag` on the [`TURN_TARGET`] target.

mod init;
pub mod memory;

pub use init::{TelemetryConfig, TelemetryError, file_layer, init_telemetry};
pub use memory::{CapturedEvent, TurnCapture};

/// Target of the one-per-turn `info` event (document, query, context, prompt, response).
pub const TURN_TARGET: &str = "scholar::turn";
