use thiserror::Error;

/// The error type for `instance-seg-metric` operations.
///
/// Failures raised by the underlying metric computation are not wrapped here;
/// they are returned to the caller in the computation's own error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricError {
    /// Error for when the metric configuration is logically inconsistent.
    #[error("Invalid metric configuration: {reason}")]
    InvalidConfiguration {
        /// The reason why the configuration is invalid.
        reason: String,
    },

    /// Error for when a sample record lacks one of its required entries.
    #[error("Missing field `{field}` in {record}")]
    MissingField {
        /// The record that was being read (e.g. `data_sample`).
        record: String,
        /// The name of the missing entry.
        field: String,
    },
}

/// A specialized `Result` type for `instance-seg-metric` operations.
pub type MetricResult<T> = Result<T, MetricError>;
