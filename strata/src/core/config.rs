//! The knobs that control the placer.

use crate::core::base::{LayoutDirection, NUM_MODES};
use crate::core::error::Error;
use crate::core::geometry::clamp_non_negative;
use std::str::FromStr;

/// Selects how the four per-mode coordinates are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionMode {
    /// Take the coordinates of a single mode (0..4) as they are.
    Single(usize),
    /// The arithmetic mean of all four modes.
    Average,
}

impl FromStr for PositionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("average") || s.eq_ignore_ascii_case("avg")
        {
            return Ok(PositionMode::Average);
        }
        match s.parse::<usize>() {
            Ok(idx) if idx < NUM_MODES => Ok(PositionMode::Single(idx)),
            _ => Err(Error::InvalidOption {
                option: "position mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Selects the shape of the emitted edge routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRouting {
    /// Straight polylines through the dummy vertices.
    Traditional,
    /// Right-angle polylines that leave and enter between the layers.
    Orthogonal,
}

impl FromStr for EdgeRouting {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "traditional" | "straight" => Ok(EdgeRouting::Traditional),
            "orthogonal" | "ortho" => Ok(EdgeRouting::Orthogonal),
            _ => Err(Error::InvalidOption {
                option: "edge routing",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub direction: LayoutDirection,
    /// The gap between two consecutive layers.
    pub layer_distance: f64,
    /// The minimal gap between two neighbors in a layer.
    pub vertex_distance: f64,
    pub position_mode: PositionMode,
    pub edge_routing: EdgeRouting,
    /// Check the spacing of every mode after it is computed.
    pub validate: bool,
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self {
            direction: LayoutDirection::TopToBottom,
            layer_distance: 40.,
            vertex_distance: 20.,
            position_mode: PositionMode::Average,
            edge_routing: EdgeRouting::Traditional,
            validate: true,
        }
    }

    pub fn set_direction(&mut self, direction: LayoutDirection) -> &mut Self {
        self.direction = direction;
        self
    }

    pub fn set_layer_distance(&mut self, distance: f64) -> &mut Self {
        self.layer_distance = clamp_non_negative(distance);
        self
    }

    pub fn set_vertex_distance(&mut self, distance: f64) -> &mut Self {
        self.vertex_distance = clamp_non_negative(distance);
        self
    }

    pub fn set_position_mode(&mut self, mode: PositionMode) -> &mut Self {
        self.position_mode = mode;
        self
    }

    pub fn set_edge_routing(&mut self, routing: EdgeRouting) -> &mut Self {
        self.edge_routing = routing;
        self
    }

    pub fn set_validate(&mut self, validate: bool) -> &mut Self {
        self.validate = validate;
        self
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn test_parse_options() {
    assert_eq!(
        "average".parse::<PositionMode>().unwrap(),
        PositionMode::Average
    );
    assert_eq!("2".parse::<PositionMode>().unwrap(), PositionMode::Single(2));
    assert!("4".parse::<PositionMode>().is_err());
    assert_eq!(
        "Orthogonal".parse::<EdgeRouting>().unwrap(),
        EdgeRouting::Orthogonal
    );
    assert!("curvy".parse::<EdgeRouting>().is_err());
}

#[test]
fn test_config_setters() {
    let mut config = LayoutConfig::new();
    config
        .set_layer_distance(-5.)
        .set_vertex_distance(7.)
        .set_position_mode(PositionMode::Single(1));
    assert_eq!(config.layer_distance, 0.);
    assert_eq!(config.vertex_distance, 7.);
    assert_eq!(config.position_mode, PositionMode::Single(1));
}
