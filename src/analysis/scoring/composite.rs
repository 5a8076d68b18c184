use std::collections::BTreeMap;

use crate::analysis::framework::WEIGHT_TOLERANCE;

use super::ScoringError;

/// A factor score paired with its (already renormalized) weight.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedFactor {
    pub factor: String,
    pub score: u8,
    pub weight: f64,
}

/// One track's weighted subtotal, ready for composition.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSubtotal {
    pub track: String,
    pub subtotal: f64,
    pub weight: f64,
}

/// The composed result for one entity: the clamped composite, the per-track
/// subtotal breakdown kept for audits, and whether any configured track had
/// to be dropped for lack of data.
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    pub value: f64,
    pub breakdown: BTreeMap<String, f64>,
    pub partial: bool,
    pub dropped_tracks: Vec<String>,
}

/// Scale weights over the applicable subset back to a unit sum. Returns
/// `None` when nothing applicable carries weight.
pub(crate) fn renormalize(weights: &[f64]) -> Option<Vec<f64>> {
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return None;
    }
    Some(weights.iter().map(|weight| weight / sum).collect())
}

/// Σ(score × weight) over the factors of one track. The supplied weights
/// must sum to 1.0; a failed guard names the track it happened in.
pub(crate) fn aggregate_track(
    track: &str,
    factors: &[WeightedFactor],
) -> Result<f64, ScoringError> {
    let weight_sum: f64 = factors.iter().map(|factor| factor.weight).sum();
    if (weight_sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(ScoringError::WeightSum {
            scope: track.to_string(),
            sum: weight_sum,
        });
    }

    Ok(factors
        .iter()
        .map(|factor| f64::from(factor.score) * factor.weight)
        .sum())
}

/// Combine track subtotals into the final composite. Tracks the entity had
/// no data for arrive in `dropped_tracks`; the remaining track weights are
/// renormalized so partial composites stay on the 1.0-5.0 scale.
pub(crate) fn compose(
    present: &[TrackSubtotal],
    dropped_tracks: Vec<String>,
) -> Result<Composite, ScoringError> {
    let weights: Vec<f64> = present.iter().map(|track| track.weight).collect();
    let renormalized = renormalize(&weights).ok_or_else(|| ScoringError::WeightSum {
        scope: "tracks".to_string(),
        sum: weights.iter().sum(),
    })?;

    let value: f64 = present
        .iter()
        .zip(&renormalized)
        .map(|(track, weight)| track.subtotal * weight)
        .sum();

    let breakdown = present
        .iter()
        .map(|track| (track.track.clone(), track.subtotal))
        .collect();

    Ok(Composite {
        value: value.clamp(1.0, 5.0),
        partial: !dropped_tracks.is_empty(),
        breakdown,
        dropped_tracks,
    })
}
