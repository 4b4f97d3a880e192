//! Python bindings. Inputs and outputs cross the boundary as JSON strings.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::advisor::{AdvisorConfig, PortfolioAdvisor};
use crate::constants::{HIGH_CONFIDENCE, MEDIUM_CONFIDENCE, REACH_THRESHOLD, SAFETY_THRESHOLD, TARGET_THRESHOLD};
use crate::estimator::{AdmissionEstimator, EstimatorConfig};
use crate::portfolio::Portfolio;
use crate::profile::{CollegeProfile, StudentProfile};
use crate::simulation::{PortfolioSimulator, SimulationConfig};

fn parse<T: DeserializeOwned>(what: &str, json: &str) -> PyResult<T> {
    serde_json::from_str(json).map_err(|e| PyValueError::new_err(format!("invalid {}: {}", what, e)))
}

fn parse_or_default<T: DeserializeOwned + Default>(what: &str, json: Option<&str>) -> PyResult<T> {
    json.map_or_else(|| Ok(T::default()), |json| parse(what, json))
}

fn to_json<T: Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Estimate one student at one college.
#[pyfunction]
#[pyo3(signature = (student, college, config = None))]
fn estimate(student: &str, college: &str, config: Option<&str>) -> PyResult<String> {
    let student: StudentProfile = parse("student", student)?;
    let college: CollegeProfile = parse("college", college)?;
    let estimator = AdmissionEstimator::new(parse_or_default::<EstimatorConfig>("config", config)?);

    let estimate = estimator
        .estimate(&student, &college)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    to_json(&estimate)
}

/// Estimate a student against a list of colleges, sorted by probability.
#[pyfunction]
#[pyo3(signature = (student, colleges, config = None))]
fn estimate_portfolio(student: &str, colleges: &str, config: Option<&str>) -> PyResult<String> {
    let student: StudentProfile = parse("student", student)?;
    let colleges: Vec<CollegeProfile> = parse("colleges", colleges)?;
    let estimator = AdmissionEstimator::new(parse_or_default::<EstimatorConfig>("config", config)?);

    to_json(&estimator.estimate_portfolio(&student, &colleges))
}

/// Outcome statistics for a portfolio produced by `estimate_portfolio`.
#[pyfunction]
#[pyo3(signature = (portfolio, config = None))]
fn simulate(py: Python<'_>, portfolio: &str, config: Option<&str>) -> PyResult<String> {
    let portfolio: Portfolio = parse("portfolio", portfolio)?;
    let simulator = PortfolioSimulator::new(parse_or_default::<SimulationConfig>("config", config)?);

    let outcome = py
        .allow_threads(|| simulator.simulate(&portfolio))
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    to_json(&outcome)
}

/// Balance score, gaps and recommendations for a portfolio, optionally using a simulated outcome.
#[pyfunction]
#[pyo3(signature = (portfolio, outcome = None, config = None))]
fn advise(portfolio: &str, outcome: Option<&str>, config: Option<&str>) -> PyResult<String> {
    let portfolio: Portfolio = parse("portfolio", portfolio)?;
    let outcome = outcome.map(|json| parse("outcome", json)).transpose()?;
    let advisor = PortfolioAdvisor::new(parse_or_default::<AdvisorConfig>("config", config)?);

    to_json(&advisor.advise(&portfolio, outcome.as_ref()))
}

/// Python module definition
#[pymodule]
fn admit_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(estimate, m)?)?;
    m.add_function(wrap_pyfunction!(estimate_portfolio, m)?)?;
    m.add_function(wrap_pyfunction!(simulate, m)?)?;
    m.add_function(wrap_pyfunction!(advise, m)?)?;

    // Constants
    m.add("REACH_THRESHOLD", REACH_THRESHOLD)?;
    m.add("TARGET_THRESHOLD", TARGET_THRESHOLD)?;
    m.add("SAFETY_THRESHOLD", SAFETY_THRESHOLD)?;
    m.add("HIGH_CONFIDENCE", HIGH_CONFIDENCE)?;
    m.add("MEDIUM_CONFIDENCE", MEDIUM_CONFIDENCE)?;

    Ok(())
}
