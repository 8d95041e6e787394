//! Error types for orbit collaborators

use thiserror::Error;

/// Result type for orbit construction
pub type OrbitResult<T> = Result<T, OrbitError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrbitError {
    /// Trajectory descriptor cannot describe a bound orbit above the Earth
    #[error("invalid orbital elements: {0}")]
    InvalidElements(String),

    #[error("invalid ground station: {0}")]
    InvalidStation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = OrbitError::InvalidElements("eccentricity 1.2 >= 1".into());
        assert_eq!(err.to_string(), "invalid orbital elements: eccentricity 1.2 >= 1");
    }
}
