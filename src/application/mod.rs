//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod services;
pub mod session;

pub use error::{ApplicationError, ApplicationResult, LoadStage};
pub use error_ext::SourceResultExt;
pub use session::{BrowseSession, SessionCommand, SessionOutcome};
