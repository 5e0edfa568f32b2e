//! Engine configuration.

use crate::error::CoreResult;
use serde::{Deserialize, Serialize};

/// Order in which hit testing visits the shape list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HitOrder {
    /// Oldest shape first; an older shape shadows newer ones drawn over it.
    #[default]
    Creation,
    /// Topmost painted shape first.
    Topmost,
}

/// Parameters for turning a freehand point sequence into an outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeOptions {
    /// Added to the shape's stroke width to get the outline diameter.
    pub base_size: f64,
    pub thinning: f64,
    pub smoothing: f64,
    pub streamline: f64,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self {
            base_size: 4.0,
            thinning: 0.5,
            smoothing: 0.5,
            streamline: 0.5,
        }
    }
}

/// Tunables shared by the factory, hit tester and renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chebyshev distance under which a point counts as "on" a handle.
    pub near_tolerance: f64,
    /// Maximum detour for the line/arrow on-segment test.
    pub on_line_tolerance: f64,
    /// Maximum distance from a freehand segment.
    pub freehand_tolerance: f64,
    /// Length of each arrowhead wing.
    pub arrow_head_length: f64,
    pub hit_order: HitOrder,
    pub stroke: StrokeOptions,
    /// Maximum number of decoded images kept in memory.
    pub image_cache_capacity: usize,
    /// Roughness of the built-in sketch generator.
    pub roughness: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            near_tolerance: 5.0,
            on_line_tolerance: 1.0,
            freehand_tolerance: 5.0,
            arrow_head_length: 20.0,
            hit_order: HitOrder::default(),
            stroke: StrokeOptions::default(),
            image_cache_capacity: 64,
            roughness: 1.0,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let config = serde_json::from_str(json)?;
        log::debug!("Loaded engine config: {:?}", config);
        Ok(config)
    }

    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{"near_tolerance": 8, "hit_order": "topmost"}"#).unwrap();
        assert!((config.near_tolerance - 8.0).abs() < f64::EPSILON);
        assert_eq!(config.hit_order, HitOrder::Topmost);
        assert!((config.arrow_head_length - 20.0).abs() < f64::EPSILON);
        assert!((config.stroke.thinning - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_json() {
        let err = EngineConfig::from_json("{near_tolerance").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_round_trip() {
        let config = EngineConfig::default();
        let parsed = EngineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
