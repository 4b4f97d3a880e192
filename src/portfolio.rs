use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::warn;

use crate::category::Category;
use crate::error::{EstimateResult, InvalidInput};
use crate::estimator::AdmissionEstimate;

/// z for a 95% two-sided interval, used if the normal distribution cannot be built
const Z_95: f64 = 1.96;

/// A college left out of portfolio statistics, with the reason.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExcludedCollege {
    pub college: String,
    pub reason: String,
    /// True when the college simply has no admissions data, false for invalid input
    pub missing_data: bool,
}

/// The set of colleges a student is evaluating jointly.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    entries: Vec<AdmissionEstimate>,
    excluded: Vec<ExcludedCollege>,
}

impl Portfolio {
    pub fn new(entries: Vec<AdmissionEstimate>) -> Self {
        Portfolio {
            entries,
            excluded: Vec::new(),
        }
    }

    /// Split per-college results into usable estimates and excluded colleges.
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = (String, EstimateResult<AdmissionEstimate>)>,
    {
        let mut portfolio = Portfolio::default();
        for (college, result) in results {
            match result {
                Ok(estimate) => portfolio.entries.push(estimate),
                Err(err) => {
                    warn!(college = %college, error = %err, "college excluded from portfolio");
                    portfolio.excluded.push(ExcludedCollege {
                        missing_data: err.is_missing_data(),
                        reason: err.to_string(),
                        college,
                    });
                }
            }
        }
        portfolio
    }

    pub fn entries(&self) -> &[AdmissionEstimate] {
        &self.entries
    }

    pub fn excluded(&self) -> &[ExcludedCollege] {
        &self.excluded
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Admission probabilities in percent, in entry order.
    pub fn probabilities(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.probability as f64).collect()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.entries.iter().map(|e| e.category).collect()
    }

    /// Highest probability first; ties keep their original order.
    pub fn sort_by_probability(&mut self) {
        self.entries.sort_by(|a, b| b.probability.cmp(&a.probability));
    }
}

/// Probability (percent) of a given number of acceptances.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceBucket {
    pub count: usize,
    pub probability: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub level: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Closed-form statistics under independent admissions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalyticSummary {
    pub at_least_one_pct: f64,
    pub all_rejected_pct: f64,
    pub expected_acceptances: f64,
    pub variance: f64,
    pub confidence_interval: ConfidenceInterval,
    /// Exact acceptance-count distribution (Poisson binomial)
    pub distribution: Vec<AcceptanceBucket>,
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Check that every probability is a percentage in [0, 100].
pub fn validate_probabilities(probabilities: &[f64]) -> Result<(), InvalidInput> {
    match probabilities
        .iter()
        .find(|p| !p.is_finite() || **p < 0.0 || **p > 100.0)
    {
        Some(&bad) => Err(InvalidInput::Probability(bad)),
        None => Ok(()),
    }
}

/// Two-sided standard normal quantile for `level` (0.95 gives ~1.96).
pub fn z_score(level: f64) -> Result<f64, InvalidInput> {
    if !level.is_finite() || level <= 0.0 || level >= 1.0 {
        return Err(InvalidInput::ConfidenceLevel(level));
    }
    Ok(Normal::new(0.0, 1.0)
        .map(|normal| normal.inverse_cdf(0.5 + level / 2.0))
        .unwrap_or(Z_95))
}

/// Distribution of the number of acceptances, by dynamic programming over colleges.
pub fn exact_distribution(probabilities: &[f64]) -> Vec<f64> {
    let mut dist = vec![0.0; probabilities.len() + 1];
    dist[0] = 1.0;
    for (i, pct) in probabilities.iter().enumerate() {
        let p = pct / 100.0;
        for k in (1..=i + 1).rev() {
            dist[k] = dist[k] * (1.0 - p) + dist[k - 1] * p;
        }
        dist[0] *= 1.0 - p;
    }
    dist
}

/// Closed-form portfolio statistics for probabilities given in percent.
pub fn analyze(probabilities: &[f64], confidence_level: f64) -> Result<AnalyticSummary, InvalidInput> {
    validate_probabilities(probabilities)?;
    let z = z_score(confidence_level)?;

    let all_rejected: f64 = probabilities.iter().map(|pct| 1.0 - pct / 100.0).product();
    // Summing percents first keeps sums like 80 + 50 + 10 exact
    let expected = probabilities.iter().sum::<f64>() / 100.0;
    let variance: f64 = probabilities
        .iter()
        .map(|pct| {
            let p = pct / 100.0;
            p * (1.0 - p)
        })
        .sum();
    let margin = z * variance.sqrt();

    let distribution = exact_distribution(probabilities)
        .into_iter()
        .enumerate()
        .map(|(count, p)| AcceptanceBucket {
            count,
            probability: round1(p * 100.0),
        })
        .collect();

    Ok(AnalyticSummary {
        at_least_one_pct: round1((1.0 - all_rejected) * 100.0),
        all_rejected_pct: round1(all_rejected * 100.0),
        expected_acceptances: expected,
        variance,
        confidence_interval: ConfidenceInterval {
            level: confidence_level,
            lower: (expected - margin).max(0.0),
            upper: (expected + margin).min(probabilities.len() as f64),
        },
        distribution,
    })
}
