//! Run configuration. Lengths are in millimetres, as the user enters them.

use serde::{Deserialize, Serialize};

use crate::error::{OperationError, Result};

/// How deep a floor is cut back into a door opening, as a fraction of the
/// host wall thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorCutDepth {
    #[default]
    Off,
    Half,
    Full,
}

impl DoorCutDepth {
    #[must_use]
    pub fn factor(self) -> f64 {
        match self {
            Self::Off => 0.0,
            Self::Half => 0.5,
            Self::Full => 1.0,
        }
    }
}

/// What happens to a floor that a door opening touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorCutPolicy {
    /// Floors are left alone.
    None,
    /// Floors are left intact and a threshold line is drawn across the door.
    MarkerOnly,
    /// The floor outline is rerouted into the opening.
    #[default]
    Reclip,
}

/// Name prefixes selecting the types the pipeline may use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogPrefixes {
    /// Prefix carried by every finish type of the organisation.
    pub organization: String,
    /// Sub-prefix, after `organization`, marking finish partitions.
    pub partition: String,
}

impl Default for CatalogPrefixes {
    fn default() -> Self {
        Self {
            organization: "АР_".into(),
            partition: "О".into(),
        }
    }
}

impl CatalogPrefixes {
    /// Full prefix of wall and skirt finish types.
    #[must_use]
    pub fn partition_prefix(&self) -> String {
        format!("{}{}", self.organization, self.partition)
    }
}

/// Unit suffixes written after values in room reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportUnits {
    pub area_suffix: String,
    pub length_suffix: String,
}

impl Default for ReportUnits {
    fn default() -> Self {
        Self {
            area_suffix: "м²".into(),
            length_suffix: "м".into(),
        }
    }
}

/// Immutable configuration shared by every stage of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub ceilings_height: f64,
    /// Extra wall finish height above the ceiling.
    pub walls_offset: f64,
    pub skirts_height: f64,
    pub door_cut_depth: DoorCutDepth,
    pub floor_cut_policy: FloorCutPolicy,
    /// Padding applied to element bounding volumes before door tests.
    pub opening_clearance: f64,
    /// Longest strip that can still be a column finish.
    pub column_max_length: f64,
    pub column_clearance: f64,
    /// Shorter pieces left by opening cuts are dropped.
    pub min_strip_length: f64,
    pub prefixes: CatalogPrefixes,
    pub report_units: ReportUnits,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ceilings_height: 3100.0,
            walls_offset: 110.0,
            skirts_height: 80.0,
            door_cut_depth: DoorCutDepth::Off,
            floor_cut_policy: FloorCutPolicy::Reclip,
            opening_clearance: 200.0,
            column_max_length: 800.0,
            column_clearance: 20.0,
            min_strip_length: 30.0,
            prefixes: CatalogPrefixes::default(),
            report_units: ReportUnits::default(),
        }
    }
}

impl PipelineConfig {
    /// Parses a configuration from JSON; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for malformed JSON or a
    /// negative length.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| OperationError::InvalidInput(format!("config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that all lengths are non-negative and finite.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("ceilings_height", self.ceilings_height),
            ("walls_offset", self.walls_offset),
            ("skirts_height", self.skirts_height),
            ("opening_clearance", self.opening_clearance),
            ("column_max_length", self.column_max_length),
            ("column_clearance", self.column_clearance),
            ("min_strip_length", self.min_strip_length),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(OperationError::InvalidInput(format!(
                    "{name} must be a non-negative length, got {value}"
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Wall finish height: ceiling height plus the offset above it.
    #[must_use]
    pub fn wall_height(&self) -> f64 {
        self.ceilings_height + self.walls_offset
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults() {
        let c = PipelineConfig::default();
        assert_relative_eq!(c.wall_height(), 3210.0);
        assert_eq!(c.floor_cut_policy, FloorCutPolicy::Reclip);
        assert_eq!(c.prefixes.partition_prefix(), "АР_О");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c = PipelineConfig::from_json(
            r#"{"skirts_height": 100, "door_cut_depth": "half", "floor_cut_policy": "marker_only"}"#,
        )
        .unwrap();
        assert_relative_eq!(c.skirts_height, 100.0);
        assert_relative_eq!(c.door_cut_depth.factor(), 0.5);
        assert_eq!(c.floor_cut_policy, FloorCutPolicy::MarkerOnly);
        assert_relative_eq!(c.ceilings_height, 3100.0);
        assert_eq!(c.report_units.area_suffix, "м²");
    }

    #[test]
    fn negative_length_is_rejected() {
        let err = PipelineConfig::from_json(r#"{"ceilings_height": -1}"#).unwrap_err();
        assert!(err.to_string().contains("ceilings_height"));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(PipelineConfig::from_json("{").is_err());
    }
}
