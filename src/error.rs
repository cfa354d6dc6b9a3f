//! soft‑failure taxonomy for the tile grid & atlas

use std::fmt;

/// how bad a reported problem is – none of them stop the frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    ConfigurationWarning,
    BoundsViolation,
    InvariantViolation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TilemapError {
    /// grid or atlas dimensions are not whole multiples of their cell size
    Configuration {
        what: &'static str,
        size: (u32, u32),
        cell: (u32, u32),
    },
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
    /// a chunk artifact was requested past the end of the artifact list
    ChunkOrder { expected: usize, got: usize },
}

impl TilemapError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::Configuration { .. } => Severity::ConfigurationWarning,
            Self::OutOfBounds { .. } => Severity::BoundsViolation,
            Self::ChunkOrder { .. } => Severity::InvariantViolation,
        }
    }
}

impl fmt::Display for TilemapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { what, size, cell } => write!(
                f,
                "{what} size {}x{} is not divisible by {}x{}",
                size.0, size.1, cell.0, cell.1
            ),
            Self::OutOfBounds { x, y, width, height } => write!(
                f,
                "tile position ({x}, {y}) is out of bounds ({width}x{height})"
            ),
            Self::ChunkOrder { expected, got } => write!(
                f,
                "chunk index is out of order: expected {expected}, got {got}"
            ),
        }
    }
}

impl std::error::Error for TilemapError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_follows_variant() {
        let e = TilemapError::OutOfBounds { x: -1, y: 0, width: 16, height: 16 };
        assert_eq!(e.severity(), Severity::BoundsViolation);
        assert_eq!(e.to_string(), "tile position (-1, 0) is out of bounds (16x16)");

        let e = TilemapError::ChunkOrder { expected: 2, got: 5 };
        assert_eq!(e.severity(), Severity::InvariantViolation);
    }
}
