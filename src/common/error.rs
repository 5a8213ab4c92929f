//! Error types for crank_driving_planner

use thiserror::Error;

/// Main error type for the planner
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Invalid configuration parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// A corridor boundary too short to form a segment
    #[error("Degenerate {side} boundary: {points} point(s), at least 2 required")]
    DegenerateBoundary { side: &'static str, points: usize },
    /// Configuration file could not be read
    #[error("Config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),
    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    /// External collaborator failed to produce a result
    #[error("Planning error: {0}")]
    PlanningError(String),
}

/// Result type alias for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
