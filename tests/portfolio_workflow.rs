//! End-to-end portfolio workflow
//!
//! 1. Student and college data arrive as JSON
//! 2. Each college is resolved through the catalog and estimated
//! 3. The portfolio is simulated
//! 4. The advisor scores balance and recommends changes

use admit_core::advisor::{PortfolioAdvisor, RecommendationAction};
use admit_core::catalog::{CollegeCatalog, CollegeResolver};
use admit_core::category::Category;
use admit_core::estimator::AdmissionEstimator;
use admit_core::portfolio::Portfolio;
use admit_core::profile::{CollegeProfile, StudentProfile};
use admit_core::simulation::{PortfolioSimulator, SimulationConfig};

const STUDENT_JSON: &str = r#"{
    "gpa": 3.85,
    "sat_total": 1460,
    "ap_ib_count": 9,
    "activities": [
        {"name": "Science Olympiad state medalist", "tier": 2},
        {"name": "Varsity soccer", "tier": 3},
        {"name": "Food bank volunteer", "tier": 4}
    ],
    "essay_quality": 75,
    "first_generation": true
}"#;

fn build_catalog() -> CollegeCatalog {
    let mut catalog = CollegeCatalog::from_profiles(vec![
        CollegeProfile::new("Ivy Example", 0.05)
            .with_sat_band(1480.0, 1570.0)
            .with_gpa_average(3.95),
        CollegeProfile::new("Tech Institute", 0.12)
            .with_sat_band(1450.0, 1560.0)
            .with_gpa_average(3.9),
        CollegeProfile::new("Liberal Arts College", 0.28)
            .with_sat_band(1330.0, 1480.0)
            .with_gpa_average(3.8),
        CollegeProfile::new("Flagship State", 0.45)
            .with_sat_band(1250.0, 1420.0)
            .with_gpa_average(3.7),
        CollegeProfile::new("Regional State", 0.82)
            .with_sat_band(1050.0, 1250.0)
            .with_gpa_average(3.3),
    ]);
    let mut mystery = CollegeProfile::new("Mystery College", 0.5);
    mystery.acceptance_rate = None;
    catalog.insert(mystery);
    catalog.add_alias("IE", "Ivy Example");
    catalog
}

fn build_portfolio(student: &StudentProfile, catalog: &CollegeCatalog, keys: &[&str]) -> Portfolio {
    let estimator = AdmissionEstimator::default();
    let mut portfolio = Portfolio::from_results(
        keys.iter()
            .map(|key| (key.to_string(), estimator.estimate_by_key(student, catalog, key))),
    );
    portfolio.sort_by_probability();
    portfolio
}

#[test]
fn test_estimate_simulate_advise() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let student: StudentProfile = serde_json::from_str(STUDENT_JSON).unwrap();
    let catalog = build_catalog();
    let keys = [
        "IE",
        "tech institute",
        "Liberal Arts College",
        "Flagship State",
        "Regional State",
        "Mystery College",
    ];
    let portfolio = build_portfolio(&student, &catalog, &keys);

    assert_eq!(portfolio.len(), 5);
    assert_eq!(portfolio.excluded().len(), 1);
    assert!(portfolio.excluded()[0].missing_data);
    assert!(portfolio
        .entries()
        .windows(2)
        .all(|w| w[0].probability >= w[1].probability));

    let ivy = portfolio
        .entries()
        .iter()
        .find(|e| e.college == "Ivy Example")
        .unwrap();
    let regional = portfolio
        .entries()
        .iter()
        .find(|e| e.college == "Regional State")
        .unwrap();
    assert!(ivy.category.is_reach());
    assert!(regional.probability > ivy.probability);
    assert!(ivy.tier.contains(ivy.probability as f64));

    let simulator = PortfolioSimulator::new(SimulationConfig {
        seed: Some(2024),
        ..Default::default()
    });
    let outcome = simulator.simulate(&portfolio).unwrap();

    let expected: f64 = portfolio.probabilities().iter().sum::<f64>() / 100.0;
    assert!((outcome.expected_acceptances - expected).abs() < 1e-9);
    assert!((outcome.simulation.at_least_one_pct - outcome.at_least_one_acceptance_pct).abs() < 1.5);
    assert_eq!(outcome.excluded.len(), 1);

    let advice = PortfolioAdvisor::default().advise(&portfolio, Some(&outcome));
    assert_eq!(advice.distribution.total(), 5);
    assert!(advice.balance_score <= 100);
    // Five colleges is under the suggested minimum list size
    assert!(advice
        .recommendations
        .iter()
        .any(|r| r.action == RecommendationAction::ExpandList));
    assert!(advice
        .recommendations
        .windows(2)
        .all(|w| w[0].priority <= w[1].priority));
}

#[test]
fn test_portfolio_survives_json() {
    let student: StudentProfile = serde_json::from_str(STUDENT_JSON).unwrap();
    let catalog = build_catalog();
    let portfolio = build_portfolio(&student, &catalog, &["Flagship State", "Regional State"]);

    let json = serde_json::to_string(&portfolio).unwrap();
    let restored: Portfolio = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.len(), 2);
    assert_eq!(restored.probabilities(), portfolio.probabilities());
    assert_eq!(restored.categories(), portfolio.categories());
    assert_eq!(restored.entries()[0].college, portfolio.entries()[0].college);
}

#[test]
fn test_unknown_key_is_missing_data() {
    let student = StudentProfile::default();
    let catalog = build_catalog();
    assert!(catalog.resolve("Nonexistent U").is_none());

    let err = AdmissionEstimator::default()
        .estimate_by_key(&student, &catalog, "Nonexistent U")
        .unwrap_err();
    assert!(err.is_missing_data());
}

#[test]
fn test_no_safety_list_is_told_to_add_one() {
    let student: StudentProfile = serde_json::from_str(STUDENT_JSON).unwrap();
    let catalog = build_catalog();
    let portfolio = build_portfolio(&student, &catalog, &["Ivy Example", "Tech Institute"]);
    assert!(portfolio.categories().iter().all(|c| *c != Category::Safety));

    let advice = PortfolioAdvisor::default().advise(&portfolio, None);
    assert_eq!(advice.recommendations[0].priority, 1);
    assert_eq!(
        advice.recommendations[0].action,
        RecommendationAction::Add(Category::Safety)
    );
}
