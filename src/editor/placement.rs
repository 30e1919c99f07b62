//! Drop placement relative to a target row.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Pointer offsets in the top quarter of a row drop before it.
pub const BEFORE_THRESHOLD: f64 = 0.25;
/// Pointer offsets in the bottom quarter of a row drop after it.
pub const AFTER_THRESHOLD: f64 = 0.75;

/// Where a dragged node lands relative to the drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Sibling immediately before the target
    Before,
    /// Sibling immediately after the target
    After,
    /// Last child of the target
    Inside,
}

impl Placement {
    /// Classifies a pointer position within a hovered row.
    ///
    /// `offset_y` is measured from the top of the row. A row with no height
    /// cannot be split and always classifies as `Inside`.
    ///
    /// # Example
    ///
    /// ```
    /// use treequill::editor::placement::Placement;
    ///
    /// assert_eq!(Placement::from_pointer(2.0, 20.0), Placement::Before);
    /// assert_eq!(Placement::from_pointer(10.0, 20.0), Placement::Inside);
    /// assert_eq!(Placement::from_pointer(18.0, 20.0), Placement::After);
    /// ```
    pub fn from_pointer(offset_y: f64, row_height: f64) -> Self {
        if row_height.is_nan() || row_height <= 0.0 {
            return Placement::Inside;
        }
        let ratio = offset_y / row_height;
        if ratio < BEFORE_THRESHOLD {
            Placement::Before
        } else if ratio > AFTER_THRESHOLD {
            Placement::After
        } else {
            Placement::Inside
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Before => "before",
            Placement::After => "after",
            Placement::Inside => "inside",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown placement `{0}` (expected before, after or inside)")]
pub struct ParsePlacementError(String);

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "before" => Ok(Placement::Before),
            "after" => Ok(Placement::After),
            "inside" => Ok(Placement::Inside),
            _ => Err(ParsePlacementError(s.to_string())),
        }
    }
}
