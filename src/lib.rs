//! Admit Core - College admission probability estimation and portfolio analysis.
//!
//! Scores a student profile against a college's published statistics, maps the
//! score to an admission probability bounded by the college's selectivity tier,
//! and evaluates a list of colleges jointly by closed form and Monte Carlo.
//! Python bindings are available behind the `python` feature.

pub mod advisor;
pub mod aggregate;
pub mod catalog;
pub mod category;
pub mod constants;
pub mod error;
pub mod estimator;
pub mod factors;
pub mod mapper;
pub mod percentile;
pub mod portfolio;
pub mod profile;
pub mod selectivity;
pub mod simulation;

#[cfg(feature = "python")]
mod python;

pub use advisor::{Advice, AdvisorConfig, PortfolioAdvisor, Recommendation};
pub use catalog::{CollegeCatalog, CollegeResolver};
pub use category::{Category, CategoryThresholds};
pub use error::{EstimateError, EstimateResult, InvalidInput};
pub use estimator::{AdmissionEstimate, AdmissionEstimator, ConfidenceLevel, EstimatorConfig};
pub use factors::{FactorKind, FactorScore, Impact};
pub use mapper::{MappingStrategy, ProbabilityMapper};
pub use portfolio::{analyze, Portfolio};
pub use profile::{
    Activity, ActivityTier, CollegeProfile, FactorImportance, ImportanceLevel, PercentileBand,
    StudentProfile,
};
pub use selectivity::{SelectivityTierModel, TierBounds};
pub use simulation::{PortfolioOutcome, PortfolioSimulator, SimulationConfig};
