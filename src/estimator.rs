use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::aggregate::aggregate;
use crate::catalog::CollegeResolver;
use crate::category::{Category, CategoryThresholds};
use crate::constants::{HIGH_CONFIDENCE, MEDIUM_CONFIDENCE};
use crate::error::{EstimateError, EstimateResult};
use crate::factors::{score_factors, FactorScore};
use crate::mapper::{MappingStrategy, ProbabilityMapper};
use crate::portfolio::Portfolio;
use crate::profile::{CollegeProfile, ImportanceLevel, StudentProfile};
use crate::selectivity::{SelectivityTierModel, TierBounds};

/// Estimator settings. The tier table and thresholds are calibration, not derived values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub strategy: MappingStrategy,
    pub tiers: SelectivityTierModel,
    pub thresholds: CategoryThresholds,

    /// Importance assumed for factors a college does not classify
    pub default_importance: ImportanceLevel,

    /// Estimate batches on the rayon pool
    pub parallel: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= HIGH_CONFIDENCE {
            ConfidenceLevel::High
        } else if confidence >= MEDIUM_CONFIDENCE {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// Admission chance of one student at one college.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdmissionEstimate {
    pub college: String,

    /// Probability of admission in percent
    pub probability: u8,
    pub category: Category,

    /// College-independent applicant strength, 0-100
    pub quality_score: u8,

    /// Share of usable profile fields that were supplied, 0-1
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,

    pub tier: TierBounds,
    pub strategy: MappingStrategy,
    pub factors: Vec<FactorScore>,
}

/// Fraction of the fields this college's statistics can use that the student supplied.
pub fn profile_confidence(student: &StudentProfile, college: &CollegeProfile) -> f64 {
    let gpa_usable = college.gpa_reference().is_some();
    let test_usable = college.has_test_band();
    let test_supplied = (student.sat_total.is_some() && college.sat_band.is_some())
        || (student.act_composite.is_some() && college.act_band.is_some());

    let fields = [
        (gpa_usable, student.gpa.is_some()),
        (test_usable, test_supplied),
        (true, student.ap_ib_count.is_some()),
        (true, student.activities.is_some()),
        (true, student.essay_quality.is_some()),
        (true, student.recommendation_quality.is_some()),
    ];

    let usable = fields.iter().filter(|(usable, _)| *usable).count();
    let supplied = fields
        .iter()
        .filter(|(usable, supplied)| *usable && *supplied)
        .count();

    supplied as f64 / usable as f64
}

/// Runs the scorers, aggregator, mapper and classifier for a student.
///
/// Holds no state between calls; estimates for different inputs may run concurrently.
#[derive(Clone, Debug, Default)]
pub struct AdmissionEstimator {
    config: EstimatorConfig,
    mapper: ProbabilityMapper,
}

impl AdmissionEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        let mapper = ProbabilityMapper::new(config.strategy, config.tiers.clone(), config.thresholds);
        AdmissionEstimator { config, mapper }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate the admission chance of `student` at `college`.
    ///
    /// Returns `NoCollegeData` when the college has no acceptance rate rather
    /// than inventing one.
    pub fn estimate(
        &self,
        student: &StudentProfile,
        college: &CollegeProfile,
    ) -> EstimateResult<AdmissionEstimate> {
        let acceptance_rate = college.acceptance_rate.ok_or_else(|| EstimateError::NoCollegeData {
            college: college.name.clone(),
        })?;

        for warning in student.sanity_check() {
            warn!(college = %college.name, "suspicious profile value: {}", warning);
        }

        let factors = score_factors(student, college, self.config.default_importance)?;
        let quality = aggregate(&factors)?;
        let mapped = self.mapper.map(quality, acceptance_rate)?;
        let confidence = profile_confidence(student, college);

        debug!(
            college = %college.name,
            quality,
            probability = mapped.probability,
            category = %mapped.category,
            confidence,
            "admission estimate"
        );

        Ok(AdmissionEstimate {
            college: college.name.clone(),
            probability: mapped.probability,
            category: mapped.category,
            quality_score: quality.round() as u8,
            confidence,
            confidence_level: ConfidenceLevel::from_confidence(confidence),
            tier: mapped.bounds,
            strategy: self.config.strategy,
            factors,
        })
    }

    /// Resolve `key` through the lookup, then estimate. Unknown keys are `NoCollegeData`.
    pub fn estimate_by_key<R: CollegeResolver + ?Sized>(
        &self,
        student: &StudentProfile,
        resolver: &R,
        key: &str,
    ) -> EstimateResult<AdmissionEstimate> {
        let college = resolver.resolve(key).ok_or_else(|| EstimateError::NoCollegeData {
            college: key.to_string(),
        })?;
        self.estimate(student, college)
    }

    /// Estimate every college for one student and gather the results into a portfolio.
    ///
    /// Colleges that fail are reported in `Portfolio::excluded`; the rest are
    /// sorted by probability, highest first.
    pub fn estimate_portfolio(&self, student: &StudentProfile, colleges: &[CollegeProfile]) -> Portfolio {
        let run = |college: &CollegeProfile| (college.name.clone(), self.estimate(student, college));

        let results: Vec<_> = if self.config.parallel {
            colleges.par_iter().map(run).collect()
        } else {
            colleges.iter().map(run).collect()
        };

        let mut portfolio = Portfolio::from_results(results);
        portfolio.sort_by_probability();
        portfolio
    }
}
