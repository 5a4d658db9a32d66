//! Pet position on the shared playfield.
//!
//! Coordinates are percentages of the playfield, `(0,0)` being the top-left
//! corner. Different producers of positions are held to different bounds:
//!
//! - [`PositionBounds::PLAYFIELD`]: the invariant every folded state satisfies
//! - [`PositionBounds::MODEL`]: applied to positions proposed by the language model
//! - [`PositionBounds::FALLBACK`]: applied to locally synthesized positions

use serde::{Deserialize, Serialize};

/// Inclusive range applied to both axes of a [`Position`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionBounds {
    min: f64,
    max: f64,
}

impl PositionBounds {
    /// Full playfield.
    pub const PLAYFIELD: PositionBounds = PositionBounds {
        min: 0.0,
        max: 100.0,
    };

    /// Range for model-proposed positions.
    pub const MODEL: PositionBounds = PositionBounds {
        min: 15.0,
        max: 85.0,
    };

    /// Range for fallback and offline-responder positions.
    pub const FALLBACK: PositionBounds = PositionBounds {
        min: 20.0,
        max: 80.0,
    };

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamp a single coordinate. NaN collapses to the midpoint.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return (self.min + self.max) / 2.0;
        }
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, position: Position) -> bool {
        (self.min..=self.max).contains(&position.x) && (self.min..=self.max).contains(&position.y)
    }
}

/// A point on the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Center of the playfield, where the pet goes when called.
    pub const CENTER: Position = Position { x: 50.0, y: 50.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamp each axis independently into `bounds`.
    pub fn clamped(self, bounds: PositionBounds) -> Self {
        Self {
            x: bounds.clamp(self.x),
            y: bounds.clamp(self.y),
        }
    }

    /// Move by the given offset, then clamp into `bounds`.
    pub fn offset(self, dx: f64, dy: f64, bounds: PositionBounds) -> Self {
        Self::new(self.x + dx, self.y + dy).clamped(bounds)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::CENTER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_model_bounds() {
        let pos = Position::new(-10.0, 120.0).clamped(PositionBounds::MODEL);
        assert_eq!(pos, Position::new(15.0, 85.0));
    }

    #[test]
    fn test_clamped_keeps_in_range_values() {
        let pos = Position::new(30.0, 40.0).clamped(PositionBounds::MODEL);
        assert_eq!(pos, Position::new(30.0, 40.0));
    }

    #[test]
    fn test_nan_collapses_to_midpoint() {
        let pos = Position::new(f64::NAN, 10.0).clamped(PositionBounds::FALLBACK);
        assert_eq!(pos, Position::new(50.0, 20.0));
    }

    #[test]
    fn test_infinity_clamps_to_edge() {
        let pos =
            Position::new(f64::INFINITY, f64::NEG_INFINITY).clamped(PositionBounds::PLAYFIELD);
        assert_eq!(pos, Position::new(100.0, 0.0));
    }

    #[test]
    fn test_offset_clamps() {
        let pos = Position::new(75.0, 25.0).offset(15.0, -15.0, PositionBounds::FALLBACK);
        assert_eq!(pos, Position::new(80.0, 20.0));
    }

    #[test]
    fn test_bounds_nest() {
        for bounds in [PositionBounds::MODEL, PositionBounds::FALLBACK] {
            assert!(bounds.min() >= PositionBounds::PLAYFIELD.min());
            assert!(bounds.max() <= PositionBounds::PLAYFIELD.max());
        }
        assert!(PositionBounds::MODEL.contains(Position::new(20.0, 80.0)));
        assert!(!PositionBounds::FALLBACK.contains(Position::new(15.0, 50.0)));
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(Position::new(50.0, 30.0)).expect("serialize");
        assert_eq!(json, serde_json::json!({"x": 50.0, "y": 30.0}));
    }
}
