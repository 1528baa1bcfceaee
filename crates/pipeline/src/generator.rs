//! The opaque unit of work a seed run executes.

use async_trait::async_trait;

use crate::progress::ProgressSink;

/// Error returned by a generator. Only its `Display` text is kept.
pub type GeneratorError = Box<dyn std::error::Error + Send + Sync>;

/// A slow, fallible job that narrates itself through a [`ProgressSink`].
///
/// The controller and the worker treat it as a black box: they start it,
/// await it, and record success or the stringified error.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, progress: &ProgressSink) -> Result<(), GeneratorError>;
}
