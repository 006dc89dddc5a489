use thiserror::Error;

/// A property lookup fell outside its tabulated range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// Temperature, pressure, or quality beyond the table limits.
    #[error("property out of range: {context}")]
    OutOfDomain { context: String },
}
