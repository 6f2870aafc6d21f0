//! Contains utilities, enums, constants and simple data structures that are
//! used across the program.

use crate::core::error::Error;
use std::str::FromStr;

/// The direction in which the layers are stacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutDirection {
    TopToBottom,
    BottomToTop,
    LeftToRight,
    RightToLeft,
}

impl LayoutDirection {
    /// \returns True if the layers are stacked along the y axis.
    pub fn is_vertical(&self) -> bool {
        match self {
            LayoutDirection::TopToBottom | LayoutDirection::BottomToTop => true,
            LayoutDirection::LeftToRight | LayoutDirection::RightToLeft => {
                false
            }
        }
    }

    /// \returns True if layer zero is placed at the far end of the layer
    /// axis.
    pub fn is_mirrored(&self) -> bool {
        match self {
            LayoutDirection::TopToBottom | LayoutDirection::LeftToRight => {
                false
            }
            LayoutDirection::BottomToTop | LayoutDirection::RightToLeft => true,
        }
    }
}

impl Default for LayoutDirection {
    fn default() -> Self {
        LayoutDirection::TopToBottom
    }
}

impl FromStr for LayoutDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tb" | "top-to-bottom" => Ok(LayoutDirection::TopToBottom),
            "bt" | "bottom-to-top" => Ok(LayoutDirection::BottomToTop),
            "lr" | "left-to-right" => Ok(LayoutDirection::LeftToRight),
            "rl" | "right-to-left" => Ok(LayoutDirection::RightToLeft),
            _ => Err(Error::InvalidOption {
                option: "direction",
                value: s.to_string(),
            }),
        }
    }
}

/// The side of the layer that blocks are packed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn is_left(&self) -> bool {
        match self {
            Side::Left => true,
            Side::Right => false,
        }
    }
}

/// Selects which neighbors a vertex aligns with: the layer above (upper) or
/// the layer below (lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSet {
    Upper,
    Lower,
}

impl EdgeSet {
    pub fn is_upper(&self) -> bool {
        match self {
            EdgeSet::Upper => true,
            EdgeSet::Lower => false,
        }
    }
}

/// One of the four mirrored passes of the coordinate assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    pub side: Side,
    pub edges: EdgeSet,
}

/// The number of passes that are combined into the final coordinates.
pub const NUM_MODES: usize = 4;

impl Mode {
    pub fn new(side: Side, edges: EdgeSet) -> Self {
        Self { side, edges }
    }

    /// The modes in index order.
    pub fn all() -> [Mode; NUM_MODES] {
        [
            Mode::new(Side::Left, EdgeSet::Upper),
            Mode::new(Side::Right, EdgeSet::Upper),
            Mode::new(Side::Left, EdgeSet::Lower),
            Mode::new(Side::Right, EdgeSet::Lower),
        ]
    }

    /// \returns the slot of this mode in the per-vertex scratch arrays.
    pub fn index(&self) -> usize {
        let e = if self.edges.is_upper() { 0 } else { 1 };
        let s = if self.side.is_left() { 0 } else { 1 };
        e * 2 + s
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let side = if self.side.is_left() { "left" } else { "right" };
        let edges = if self.edges.is_upper() { "upper" } else { "lower" };
        write!(f, "{}-{}", edges, side)
    }
}

#[test]
fn test_mode_index() {
    for (i, mode) in Mode::all().iter().enumerate() {
        assert_eq!(mode.index(), i);
    }
    assert_eq!(Mode::new(Side::Right, EdgeSet::Lower).index(), 3);
    assert_eq!(Mode::all()[2].to_string(), "lower-left");
}

#[test]
fn test_parse_direction() {
    let dir: LayoutDirection = "lr".parse().unwrap();
    assert_eq!(dir, LayoutDirection::LeftToRight);
    assert!(!dir.is_vertical());
    assert!("Bottom-To-Top".parse::<LayoutDirection>().unwrap().is_mirrored());
    assert!("diagonal".parse::<LayoutDirection>().is_err());
}
