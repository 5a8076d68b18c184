use serde::{Deserialize, Serialize};

use crate::analysis::framework::FrameworkError;

/// One rung of the tier ladder: composites at or above `cutoff` earn `label`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierEntry {
    pub cutoff: f64,
    pub label: String,
}

/// Ordered tier thresholds. Entries descend by cutoff; composites below the
/// lowest cutoff take the catch-all `fallback` label. Cutoffs and labels are
/// configuration and change between framework revisions, so nothing here is
/// hardcoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierTable {
    pub entries: Vec<TierEntry>,
    pub fallback: String,
}

impl TierTable {
    /// The v3 ladder: 4.0 / 3.0 / 2.5 with a Monitor catch-all.
    pub fn standard() -> Self {
        Self {
            entries: vec![
                TierEntry {
                    cutoff: 4.0,
                    label: "Must-Have".to_string(),
                },
                TierEntry {
                    cutoff: 3.0,
                    label: "Should-Have".to_string(),
                },
                TierEntry {
                    cutoff: 2.5,
                    label: "Nice-to-Have".to_string(),
                },
            ],
            fallback: "Monitor".to_string(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), FrameworkError> {
        if self.entries.is_empty() {
            return Err(FrameworkError::MalformedTierTable {
                reason: "tier table has no entries",
            });
        }
        if self.fallback.trim().is_empty() {
            return Err(FrameworkError::MalformedTierTable {
                reason: "catch-all label is empty",
            });
        }

        let mut previous: Option<f64> = None;
        for entry in &self.entries {
            if !entry.cutoff.is_finite() {
                return Err(FrameworkError::MalformedTierTable {
                    reason: "cutoffs must be finite",
                });
            }
            if entry.label.trim().is_empty() {
                return Err(FrameworkError::MalformedTierTable {
                    reason: "tier label is empty",
                });
            }
            if let Some(prev) = previous {
                if entry.cutoff >= prev {
                    return Err(FrameworkError::MalformedTierTable {
                        reason: "cutoffs must strictly descend",
                    });
                }
            }
            previous = Some(entry.cutoff);
        }

        Ok(())
    }

    /// The highest tier the composite meets or exceeds.
    pub fn classify(&self, composite: f64) -> &str {
        self.entries
            .iter()
            .find(|entry| composite >= entry.cutoff)
            .map(|entry| entry.label.as_str())
            .unwrap_or(self.fallback.as_str())
    }
}

/// Label set for the two-axis grid, plus the reduced two-region labels used
/// when the X axis is structurally absent (an entity not yet on the
/// platform has no performance data to gate on).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadrantLabels {
    pub both_high: String,
    pub x_high_only: String,
    pub y_high_only: String,
    pub both_low: String,
    pub prospect: String,
    pub watch: String,
}

/// Two independent threshold gates over a pair of named track axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadrantScheme {
    pub axis_x: String,
    pub axis_y: String,
    pub gate_x: f64,
    pub gate_y: f64,
    pub labels: QuadrantLabels,
}

impl QuadrantScheme {
    /// Performance × demand with the v3 label set.
    pub fn standard() -> Self {
        Self {
            axis_x: "performance".to_string(),
            axis_y: "demand".to_string(),
            gate_x: 3.5,
            gate_y: 3.5,
            labels: QuadrantLabels {
                both_high: "Priority".to_string(),
                x_high_only: "Protect".to_string(),
                y_high_only: "Develop".to_string(),
                both_low: "Monitor".to_string(),
                prospect: "Prospect".to_string(),
                watch: "Monitor".to_string(),
            },
        }
    }

    pub(crate) fn validate(&self) -> Result<(), FrameworkError> {
        if !self.gate_x.is_finite() || !self.gate_y.is_finite() {
            return Err(FrameworkError::MalformedQuadrantScheme {
                reason: "gates must be finite",
            });
        }
        if self.axis_x.trim().is_empty() || self.axis_y.trim().is_empty() {
            return Err(FrameworkError::MalformedQuadrantScheme {
                reason: "axis names are empty",
            });
        }
        let labels = [
            &self.labels.both_high,
            &self.labels.x_high_only,
            &self.labels.y_high_only,
            &self.labels.both_low,
            &self.labels.prospect,
            &self.labels.watch,
        ];
        if labels.iter().any(|label| label.trim().is_empty()) {
            return Err(FrameworkError::MalformedQuadrantScheme {
                reason: "quadrant label is empty",
            });
        }
        Ok(())
    }

    /// Classify one entity. `axis_x` is `None` when the entity has no data
    /// for the X track at all; the scheme then falls back to the reduced
    /// prospect/watch split gated on the Y axis alone.
    pub fn classify(&self, axis_x: Option<f64>, axis_y: f64) -> &str {
        match axis_x {
            Some(x) => {
                let x_high = x >= self.gate_x;
                let y_high = axis_y >= self.gate_y;
                match (x_high, y_high) {
                    (true, true) => &self.labels.both_high,
                    (true, false) => &self.labels.x_high_only,
                    (false, true) => &self.labels.y_high_only,
                    (false, false) => &self.labels.both_low,
                }
            }
            None if axis_y >= self.gate_y => &self.labels.prospect,
            None => &self.labels.watch,
        }
    }
}
