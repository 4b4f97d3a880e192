use serde::{Deserialize, Serialize};

use crate::category::{Category, CategoryThresholds};
use crate::constants::{
    EXCEPTIONAL_ANCHOR_GAIN, LOW_ANCHOR_DROP, PERFECT_SHARE_OF_MAX, QUALITY_BASELINE_ANCHOR,
    QUALITY_EXCEPTIONAL_ANCHOR, QUALITY_LOW_ANCHOR, QUALITY_STRONG_ANCHOR, RULE_BASED_RANGE,
    RULE_BASED_SELECTIVITY, STRONG_ANCHOR_GAIN,
};
use crate::error::InvalidInput;
use crate::selectivity::{SelectivityTierModel, TierBounds};

/// How a quality score is turned into a probability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingStrategy {
    /// Piecewise interpolation between anchors inside the selectivity tier.
    #[default]
    Tiered,
    /// Quality score scaled by a coarse selectivity multiplier.
    RuleBased,
}

/// Output of the mapper for one (quality, college) pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MappedProbability {
    /// Rounded probability in percent
    pub probability: u8,
    /// Unrounded probability in percent
    pub raw: f64,
    pub category: Category,
    pub bounds: TierBounds,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityMapper {
    pub strategy: MappingStrategy,
    pub tiers: SelectivityTierModel,
    pub thresholds: CategoryThresholds,
}

impl ProbabilityMapper {
    pub fn new(
        strategy: MappingStrategy,
        tiers: SelectivityTierModel,
        thresholds: CategoryThresholds,
    ) -> Self {
        ProbabilityMapper {
            strategy,
            tiers,
            thresholds,
        }
    }

    /// Map a quality score (0-100) and an acceptance rate (0, 1] to a probability and category.
    pub fn map(&self, quality: f64, acceptance_rate: f64) -> Result<MappedProbability, InvalidInput> {
        if !quality.is_finite() || !(0.0..=100.0).contains(&quality) {
            return Err(InvalidInput::QualityScore(quality));
        }
        let bounds = self.tiers.tier_bounds(acceptance_rate)?;

        let raw = match self.strategy {
            MappingStrategy::Tiered => tiered_probability(quality, acceptance_rate, &bounds),
            MappingStrategy::RuleBased => rule_based_probability(quality, acceptance_rate, &bounds),
        };

        let probability = raw.round().clamp(0.0, 100.0) as u8;
        Ok(MappedProbability {
            probability,
            raw,
            category: self.thresholds.classify(probability as f64),
            bounds,
        })
    }
}

/// Anchored interpolation inside the tier.
///
/// Anchors: q=0 at the tier minimum, q=55 at the acceptance-rate baseline,
/// q=70/85 at 35%/70% of the way from baseline to the tier maximum and q=100
/// at 95% of the maximum. Each segment is linear, so the curve is monotone
/// and flattens towards the top.
fn tiered_probability(quality: f64, acceptance_rate: f64, bounds: &TierBounds) -> f64 {
    let (min, max) = (bounds.min_chance, bounds.max_chance);
    let baseline = bounds.clamp(acceptance_rate * 100.0);
    let headroom = max - baseline;

    let low = baseline - LOW_ANCHOR_DROP * (baseline - min);
    let strong = baseline + STRONG_ANCHOR_GAIN * headroom;
    let exceptional = baseline + EXCEPTIONAL_ANCHOR_GAIN * headroom;
    let perfect = (PERFECT_SHARE_OF_MAX * max).max(exceptional);

    let anchors = [
        (0.0, min),
        (QUALITY_LOW_ANCHOR, low),
        (QUALITY_BASELINE_ANCHOR, baseline),
        (QUALITY_STRONG_ANCHOR, strong),
        (QUALITY_EXCEPTIONAL_ANCHOR, exceptional),
        (100.0, perfect),
    ];

    let raw = anchors
        .windows(2)
        .find(|w| quality <= w[1].0)
        .map(|w| {
            let ((q0, p0), (q1, p1)) = (w[0], w[1]);
            p0 + (quality - q0) / (q1 - q0) * (p1 - p0)
        })
        .unwrap_or(perfect);

    bounds.clamp(raw)
}

fn rule_based_probability(quality: f64, acceptance_rate: f64, bounds: &TierBounds) -> f64 {
    let multiplier = RULE_BASED_SELECTIVITY
        .iter()
        .find(|(below, _)| acceptance_rate < *below)
        .map(|(_, m)| *m)
        .unwrap_or(1.0);
    let (lo, hi) = RULE_BASED_RANGE;
    bounds.clamp((quality * multiplier).clamp(lo, hi))
}
