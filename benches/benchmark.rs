use admit_core::advisor::PortfolioAdvisor;
use admit_core::estimator::{AdmissionEstimator, EstimatorConfig};
use admit_core::portfolio::analyze;
use admit_core::profile::{Activity, ActivityTier, CollegeProfile, StudentProfile};
use admit_core::simulation::{simulate_probabilities, PortfolioSimulator, SimulationConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn create_test_student() -> StudentProfile {
    StudentProfile {
        gpa: Some(3.8),
        sat_total: Some(1420),
        ap_ib_count: Some(7),
        activities: Some(vec![
            Activity::new("Robotics captain", ActivityTier::State),
            Activity::new("Debate", ActivityTier::School),
            Activity::new("Orchestra", ActivityTier::Participation),
        ]),
        essay_quality: Some(70.0),
        first_generation: true,
        ..Default::default()
    }
}

fn create_college_list(n: usize) -> Vec<CollegeProfile> {
    (0..n)
        .map(|i| {
            let rate = 0.04 + 0.9 * i as f64 / n as f64;
            let sat_mid = 1500.0 - 300.0 * i as f64 / n as f64;
            CollegeProfile::new(format!("College{}", i), rate)
                .with_sat_band(sat_mid - 60.0, sat_mid + 60.0)
                .with_gpa_average(3.95 - 0.6 * i as f64 / n as f64)
        })
        .collect()
}

fn bench_estimate(c: &mut Criterion) {
    let estimator = AdmissionEstimator::default();
    let student = create_test_student();
    let college = &create_college_list(1)[0];

    c.bench_function("estimate_single", |b| {
        b.iter(|| estimator.estimate(black_box(&student), black_box(college)))
    });
}

fn bench_estimate_portfolio(c: &mut Criterion) {
    let student = create_test_student();
    let colleges = create_college_list(200);
    let sequential = AdmissionEstimator::default();
    let parallel = AdmissionEstimator::new(EstimatorConfig {
        parallel: true,
        ..Default::default()
    });

    c.bench_function("estimate_portfolio_200", |b| {
        b.iter(|| sequential.estimate_portfolio(black_box(&student), black_box(&colleges)))
    });

    c.bench_function("estimate_portfolio_200_parallel", |b| {
        b.iter(|| parallel.estimate_portfolio(black_box(&student), black_box(&colleges)))
    });
}

fn bench_analyze(c: &mut Criterion) {
    let probabilities: Vec<f64> = (0..15).map(|i| 5.0 + 6.0 * i as f64).collect();

    c.bench_function("analyze_15_colleges", |b| {
        b.iter(|| analyze(black_box(&probabilities), 0.95))
    });
}

fn bench_monte_carlo(c: &mut Criterion) {
    let probabilities: Vec<f64> = (0..12).map(|i| 5.0 + 7.5 * i as f64).collect();

    c.bench_function("simulate_10k_trials", |b| {
        let config = SimulationConfig {
            seed: Some(42),
            ..Default::default()
        };
        b.iter(|| simulate_probabilities(black_box(&probabilities), &config))
    });

    c.bench_function("simulate_1m_trials_parallel", |b| {
        let config = SimulationConfig {
            trials: 1_000_000,
            seed: Some(42),
            ..Default::default()
        };
        b.iter(|| simulate_probabilities(black_box(&probabilities), &config))
    });
}

fn bench_full_workflow(c: &mut Criterion) {
    let student = create_test_student();
    let colleges = create_college_list(12);
    let estimator = AdmissionEstimator::default();
    let simulator = PortfolioSimulator::new(SimulationConfig {
        seed: Some(7),
        ..Default::default()
    });
    let advisor = PortfolioAdvisor::default();

    c.bench_function("estimate_simulate_advise_12", |b| {
        b.iter(|| {
            let portfolio = estimator.estimate_portfolio(black_box(&student), &colleges);
            let outcome = simulator.simulate(&portfolio).ok();
            advisor.advise(&portfolio, outcome.as_ref())
        })
    });
}

criterion_group!(
    benches,
    bench_estimate,
    bench_estimate_portfolio,
    bench_analyze,
    bench_monte_carlo,
    bench_full_workflow,
);
criterion_main!(benches);
