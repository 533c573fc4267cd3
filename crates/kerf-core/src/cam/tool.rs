//! Tool definitions. The CAM layer currently machines with ball-nose
//! cutters only; other tool geometries are not modelled.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A ball-nose end mill: `radius` is always `diameter / 2`, derived rather
/// than stored, so the two can never drift apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    diameter: f64,
    flute_length: Option<f64>,
    shank_diameter: Option<f64>,
}

impl ToolDefinition {
    pub fn ball_nose(name: impl Into<String>, diameter: f64) -> Result<Self> {
        if diameter <= 0.0 {
            return Err(Error::invalid_parameter("ball_nose", "diameter", diameter));
        }
        Ok(Self {
            name: name.into(),
            diameter,
            flute_length: None,
            shank_diameter: None,
        })
    }

    pub fn with_flute_length(mut self, length: f64) -> Result<Self> {
        if length <= 0.0 {
            return Err(Error::invalid_parameter("with_flute_length", "length", length));
        }
        self.flute_length = Some(length);
        Ok(self)
    }

    pub fn with_shank_diameter(mut self, diameter: f64) -> Result<Self> {
        if diameter <= 0.0 {
            return Err(Error::invalid_parameter(
                "with_shank_diameter",
                "diameter",
                diameter,
            ));
        }
        self.shank_diameter = Some(diameter);
        Ok(self)
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn radius(&self) -> f64 {
        self.diameter * 0.5
    }

    pub fn flute_length(&self) -> Option<f64> {
        self.flute_length
    }

    pub fn shank_diameter(&self) -> Option<f64> {
        self.shank_diameter
    }

    pub fn kind(&self) -> &'static str {
        "ballnose"
    }

    /// A one-line, LLM/UI-facing summary, in the spirit of `Node::readback`.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}, dia {} mm, radius {} mm)",
            self.name,
            self.kind(),
            self.diameter,
            self.radius()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_is_half_diameter() {
        let tool = ToolDefinition::ball_nose("6mm ball", 6.0).unwrap();
        assert_eq!(tool.radius(), 3.0);
    }

    #[test]
    fn rejects_non_positive_diameter() {
        assert!(ToolDefinition::ball_nose("bad", 0.0).is_err());
        assert!(ToolDefinition::ball_nose("bad", -1.0).is_err());
    }
}
