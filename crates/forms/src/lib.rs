//! Dynamic form controller.
//!
//! [`FormSession`] wires the schema generator, field parsing, the webhook
//! client, and optional history persistence into one submit pipeline, and
//! manages the form's visible state machine
//! (`Idle → Validating → Submitting → {Success | Error}`).

pub mod session;
pub mod sink;

pub use session::{FormSession, FormState, SubmissionDisplay, SubmitError};
pub use sink::{SubmissionRecord, SubmissionSink};
