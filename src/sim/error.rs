use thiserror::Error;

use crate::support::thermo::PropertyError;

/// Errors that stop a simulation.
///
/// The details of a fatal condition are written to the diagnostics sink
/// before the error is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("fatal: {message}")]
    Fatal { message: String },

    #[error(transparent)]
    Property(#[from] PropertyError),
}

impl SimError {
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }
}
