//! Submission pipeline: request validation, the worker pool, and per-submission handles.

pub mod dispatcher;
pub mod guard;
pub mod handle;
pub mod request;
pub mod result;

pub use dispatcher::Dispatcher;
pub use guard::SubmissionGuard;
pub use handle::SubmissionHandle;
pub use request::SubmissionRequest;
pub use result::SubmissionResult;
