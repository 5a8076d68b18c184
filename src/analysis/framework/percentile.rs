use serde::{Deserialize, Serialize};

use super::FrameworkError;

/// How a value landing exactly on a band floor is bucketed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Inclusive floors: a rank equal to a band floor earns that band.
    PromoteAtFloor,
    /// Exclusive floors: a rank equal to a band floor falls to the band below.
    DemoteAtFloor,
}

/// One band of the percentile-to-score table: a percentile rank at or above
/// `floor` earns `score`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileBand {
    pub floor: f64,
    pub score: u8,
}

/// Percentile boundary table mapping a rank within a population to an
/// ordinal 1-5 score. Bands are ordered by descending floor and the lowest
/// band must reach rank 0.0 so every value is classifiable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileTable {
    pub bands: Vec<PercentileBand>,
    #[serde(default = "default_tie_break")]
    pub tie_break: TieBreak,
}

fn default_tie_break() -> TieBreak {
    TieBreak::PromoteAtFloor
}

impl Default for PercentileTable {
    fn default() -> Self {
        Self::quintiles()
    }
}

impl PercentileTable {
    /// Even quintiles: top 20% earns 5, bottom 20% earns 1.
    pub fn quintiles() -> Self {
        Self {
            bands: vec![
                PercentileBand { floor: 0.8, score: 5 },
                PercentileBand { floor: 0.6, score: 4 },
                PercentileBand { floor: 0.4, score: 3 },
                PercentileBand { floor: 0.2, score: 2 },
                PercentileBand { floor: 0.0, score: 1 },
            ],
            tie_break: TieBreak::PromoteAtFloor,
        }
    }

    /// Top-weighted bands used for long-tail factors: top 10% earns 5,
    /// top 25% earns 4, top half earns 3.
    pub fn top_weighted() -> Self {
        Self {
            bands: vec![
                PercentileBand { floor: 0.90, score: 5 },
                PercentileBand { floor: 0.75, score: 4 },
                PercentileBand { floor: 0.50, score: 3 },
                PercentileBand { floor: 0.25, score: 2 },
                PercentileBand { floor: 0.0, score: 1 },
            ],
            tie_break: TieBreak::PromoteAtFloor,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), FrameworkError> {
        if self.bands.is_empty() {
            return Err(FrameworkError::MalformedPercentileTable {
                reason: "boundary table has no bands",
            });
        }

        let mut previous: Option<f64> = None;
        for band in &self.bands {
            if !band.floor.is_finite() || band.floor < 0.0 || band.floor > 1.0 {
                return Err(FrameworkError::MalformedPercentileTable {
                    reason: "band floors must lie within [0.0, 1.0]",
                });
            }
            if !(1..=5).contains(&band.score) {
                return Err(FrameworkError::MalformedPercentileTable {
                    reason: "band scores must lie within 1..=5",
                });
            }
            if let Some(prev) = previous {
                if band.floor >= prev {
                    return Err(FrameworkError::MalformedPercentileTable {
                        reason: "band floors must strictly descend",
                    });
                }
            }
            previous = Some(band.floor);
        }

        let lowest = self.bands[self.bands.len() - 1].floor;
        if lowest != 0.0 {
            return Err(FrameworkError::MalformedPercentileTable {
                reason: "lowest band must reach rank 0.0",
            });
        }

        Ok(())
    }

    /// Bin a raw value against its comparison population.
    ///
    /// Rank is the fraction of the population strictly below the value, so
    /// with `PromoteAtFloor` a value tied exactly on a band floor takes the
    /// higher bucket. A population of one cannot be ranked against peers and
    /// earns the neutral middle score. Returns `None` for an empty
    /// population; callers surface that as a named error.
    pub fn bin(&self, value: f64, population: &[f64]) -> Option<u8> {
        if population.is_empty() {
            return None;
        }
        if population.len() == 1 {
            return Some(3);
        }

        let below = population.iter().filter(|peer| **peer < value).count();
        let rank = below as f64 / population.len() as f64;

        for band in &self.bands {
            let hit = match self.tie_break {
                TieBreak::PromoteAtFloor => rank >= band.floor,
                TieBreak::DemoteAtFloor => rank > band.floor || band.floor == 0.0,
            };
            if hit {
                return Some(band.score);
            }
        }

        self.bands.last().map(|band| band.score)
    }
}
