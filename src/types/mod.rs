//! Public types for the Muninn API.

mod descriptor;
mod outcome;

pub use descriptor::{
    DEFAULT_EXPIRATION, DEFAULT_TIMEOUT_SECS, ExportSpec, RequestDescriptor, RequestInput,
};
pub use outcome::{FailureKind, FetchOutcome, MSG_CACHE, MSG_LIVE, MSG_THROTTLED};
