use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Flow direction of the rank axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Direction {
    /// `LR`
    #[default]
    LeftToRight,
    /// `TB`, also accepted as `TD`
    TopToBottom,
    /// `RL`
    RightToLeft,
    /// `BT`
    BottomToTop,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeftToRight => "LR",
            Self::TopToBottom => "TB",
            Self::RightToLeft => "RL",
            Self::BottomToTop => "BT",
        }
    }

    /// Ranks advance along x.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftToRight | Self::RightToLeft)
    }

    /// Ranks advance toward smaller coordinates.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::RightToLeft | Self::BottomToTop)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LR" => Ok(Self::LeftToRight),
            "TB" | "TD" => Ok(Self::TopToBottom),
            "RL" => Ok(Self::RightToLeft),
            "BT" => Ok(Self::BottomToTop),
            other => Err(GraphError::InvalidConfig(format!(
                "unknown direction '{other}' (expected LR, TB, RL or BT)"
            ))),
        }
    }
}

impl From<Direction> for &'static str {
    fn from(direction: Direction) -> Self {
        direction.as_str()
    }
}

impl TryFrom<String> for Direction {
    type Error = GraphError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Spacing and direction for the layered layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub direction: Direction,

    /// Box size of every node
    pub node_width: f64,
    pub node_height: f64,

    /// Gap between neighbours in one rank
    pub node_gap_within_layer: f64,

    /// Gap between consecutive ranks
    pub layer_gap: f64,

    pub margin_x: f64,
    pub margin_y: f64,

    /// Crossing-reduction passes; each pass is one down and one up sweep
    pub max_sweeps: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::LeftToRight,
            node_width: 220.0,
            node_height: 100.0,
            node_gap_within_layer: 80.0,
            layer_gap: 120.0,
            margin_x: 20.0,
            margin_y: 20.0,
            max_sweeps: 24,
        }
    }
}

impl LayoutConfig {
    /// Left-to-right flow
    pub fn horizontal() -> Self {
        Self::default()
    }

    /// Top-to-bottom flow
    pub fn vertical() -> Self {
        Self {
            direction: Direction::TopToBottom,
            ..Self::default()
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Parse from TOML; absent keys take their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate().map_err(GraphError::InvalidConfig)?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        for (name, value) in [
            ("nodeWidth", self.node_width),
            ("nodeHeight", self.node_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{name} must be a positive number, got {value}"));
            }
        }

        for (name, value) in [
            ("nodeGapWithinLayer", self.node_gap_within_layer),
            ("layerGap", self.layer_gap),
            ("marginX", self.margin_x),
            ("marginY", self.margin_y),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be a non-negative number, got {value}"));
            }
        }

        Ok(())
    }
}
