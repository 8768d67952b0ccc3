use thiserror::Error;

/// Errors raised while turning a form submission into a feature record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// A selection falls outside the closed label domain of its field.
    #[error("Unrecognized option '{label}' for {field}")]
    UnrecognizedOption {
        /// Form field whose domain was violated.
        field: &'static str,
        /// Label received from the form host.
        label: String,
    },
    /// A numeric answer is not finite or lies outside the form's bounds.
    #[error("Invalid {field}: {value} (expected {min}..={max})")]
    InvalidMeasurement {
        /// Form field holding the value.
        field: &'static str,
        /// Value received from the form host.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
}
