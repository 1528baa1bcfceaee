use lagar_core::error::CoreError;

/// Failures surfaced by the job controller.
///
/// An admission conflict is not an error; it is a rejected
/// [`StartOutcome`](crate::controller::StartOutcome).
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Job store error: {0}")]
    Store(#[from] sqlx::Error),
}
