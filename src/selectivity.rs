use serde::{Deserialize, Serialize};

use crate::constants::SELECTIVITY_TIERS;
use crate::error::InvalidInput;

/// Achievable probability range (percent) for a selectivity tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierBounds {
    pub min_chance: f64,
    pub max_chance: f64,
}

impl TierBounds {
    pub fn clamp(&self, probability: f64) -> f64 {
        probability.clamp(self.min_chance, self.max_chance)
    }

    pub fn contains(&self, probability: f64) -> bool {
        probability >= self.min_chance && probability <= self.max_chance
    }
}

/// One row of the tier table: acceptance rates up to `max_rate` share `bounds`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierBand {
    pub max_rate: f64,
    pub bounds: TierBounds,
}

/// Acceptance-rate tiers and the probability band each one allows.
///
/// Even a perfect applicant stays well below certainty at the most selective
/// schools, and a weak applicant keeps non-zero odds at open admission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TierTable")]
pub struct SelectivityTierModel {
    bands: Vec<TierBand>,
}

/// Unvalidated tier table as it appears in configuration.
#[derive(Deserialize)]
struct TierTable {
    bands: Vec<TierBand>,
}

impl TryFrom<TierTable> for SelectivityTierModel {
    type Error = InvalidInput;

    fn try_from(table: TierTable) -> Result<Self, Self::Error> {
        SelectivityTierModel::new(table.bands)
    }
}

impl Default for SelectivityTierModel {
    fn default() -> Self {
        let bands = SELECTIVITY_TIERS
            .iter()
            .map(|&(max_rate, min_chance, max_chance)| TierBand {
                max_rate,
                bounds: TierBounds {
                    min_chance,
                    max_chance,
                },
            })
            .collect();
        SelectivityTierModel { bands }
    }
}

/// Reject acceptance rates outside (0, 1].
pub fn validate_acceptance_rate(rate: f64) -> Result<f64, InvalidInput> {
    if rate.is_finite() && rate > 0.0 && rate <= 1.0 {
        Ok(rate)
    } else {
        Err(InvalidInput::AcceptanceRate(rate))
    }
}

impl SelectivityTierModel {
    /// Build a custom tier table. Bands must be sorted by rate, end at 1.0 and
    /// carry `0 <= min <= max <= 100`.
    pub fn new(bands: Vec<TierBand>) -> Result<Self, InvalidInput> {
        let invalid = |reason: &str| InvalidInput::TierTable {
            reason: reason.to_string(),
        };

        let last = bands.last().ok_or_else(|| invalid("table is empty"))?;
        if bands.iter().any(|b| !b.max_rate.is_finite() || b.max_rate <= 0.0) {
            return Err(invalid("band acceptance rates must be finite and positive"));
        }
        if (last.max_rate - 1.0).abs() > f64::EPSILON {
            return Err(invalid("last band must cover acceptance rates up to 1.0"));
        }
        if bands.windows(2).any(|w| w[0].max_rate >= w[1].max_rate) {
            return Err(invalid("bands must be strictly increasing in acceptance rate"));
        }
        for band in &bands {
            let b = band.bounds;
            if !(0.0..=100.0).contains(&b.min_chance)
                || !(0.0..=100.0).contains(&b.max_chance)
                || b.min_chance > b.max_chance
            {
                return Err(invalid("band bounds must satisfy 0 <= min <= max <= 100"));
            }
        }

        Ok(SelectivityTierModel { bands })
    }

    pub fn bands(&self) -> &[TierBand] {
        &self.bands
    }

    /// Probability band for a school with the given acceptance rate.
    pub fn tier_bounds(&self, acceptance_rate: f64) -> Result<TierBounds, InvalidInput> {
        let rate = validate_acceptance_rate(acceptance_rate)?;
        self.bands
            .iter()
            .find(|band| rate <= band.max_rate)
            .or(self.bands.last())
            .map(|band| band.bounds)
            .ok_or(InvalidInput::TierTable {
                reason: "table is empty".to_string(),
            })
    }
}
