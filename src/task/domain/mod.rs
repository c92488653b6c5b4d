//! Domain model for task records.
//!
//! Records are parsed through a validating codec so that a stored payload
//! either yields a complete [`TaskRecord`] or a [`MalformedRecord`] error,
//! never a partially populated value.

mod error;
mod ids;
mod record;
mod status;

pub use error::{MalformedRecord, ParseTaskStatusError, TaskDomainError};
pub use ids::{RecordKey, TaskId};
pub use record::TaskRecord;
pub use status::TaskStatus;
