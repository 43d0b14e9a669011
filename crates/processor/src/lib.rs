//! `cmdcore-processor`: transactional command processing.
//!
//! The [`CommandProcessor`] gates each command behind an authorization chain
//! and the target's lifecycle, applies it, records it for single-step undo,
//! and announces the outcome on an optional notification bus.

pub mod config;
pub mod error;
pub mod history;
pub mod processor;

pub use config::{ConfigError, HISTORY_LIMIT_ENV, ProcessorConfig};
pub use error::ProcessorError;
pub use history::{CommandDescriptor, History};
pub use processor::{CommandProcessor, Stage};
