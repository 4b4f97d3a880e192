use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::{classify, Category};
use crate::constants::{
    DEFAULT_CONFIDENCE_LEVEL, DEFAULT_PARALLEL_THRESHOLD, DEFAULT_SHARD_SIZE, DEFAULT_TRIALS,
    DISPLAY_BUCKET_FLOOR_PCT,
};
use crate::error::InvalidInput;
use crate::portfolio::{
    analyze, round1, validate_probabilities, AcceptanceBucket, AnalyticSummary,
    ConfidenceInterval, ExcludedCollege, Portfolio,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub trials: usize,

    /// Fixed seed for reproducible runs; `None` seeds from entropy
    pub seed: Option<u64>,

    /// Trials per shard. Each shard draws from its own seeded RNG.
    pub shard_size: usize,

    /// Trial count from which shards run in parallel
    pub parallel_threshold: usize,

    /// Two-sided level of the acceptance-count interval
    pub confidence_level: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            trials: DEFAULT_TRIALS,
            seed: None,
            shard_size: DEFAULT_SHARD_SIZE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
        }
    }
}

/// Monte Carlo statistics over the simulated trials.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub trials: usize,
    pub at_least_one_pct: f64,
    pub all_rejected_pct: f64,

    /// At least one reach or far reach school accepted; `None` without such schools
    pub top_choice_accepted_pct: Option<f64>,

    /// At least one acceptance, all of them from safeties; `None` without safeties
    pub only_safety_accepted_pct: Option<f64>,

    pub mean_acceptances: f64,

    /// Raw trial counts indexed by number of acceptances
    pub histogram: Vec<u64>,

    /// Histogram as percentages, buckets under 0.5% dropped
    pub distribution: Vec<AcceptanceBucket>,
}

/// Portfolio statistics: closed form where one exists, simulation for the rest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortfolioOutcome {
    pub at_least_one_acceptance_pct: f64,
    pub all_rejected_pct: f64,
    pub expected_acceptances: f64,
    pub variance_of_acceptances: f64,
    pub acceptance_distribution: Vec<AcceptanceBucket>,
    pub confidence_interval: ConfidenceInterval,
    pub analytic: AnalyticSummary,
    pub simulation: SimulationSummary,
    pub excluded: Vec<ExcludedCollege>,
}

#[derive(Clone, Copy, Debug)]
struct Member {
    p: f64,
    top: bool,
    safety: bool,
}

#[derive(Clone, Debug, Default)]
struct Tally {
    trials: u64,
    histogram: Vec<u64>,
    all_rejected: u64,
    top_accepted: u64,
    only_safety: u64,
    acceptances: u64,
}

impl Tally {
    fn new(colleges: usize) -> Self {
        Tally {
            histogram: vec![0; colleges + 1],
            ..Default::default()
        }
    }

    fn merge(mut self, other: Tally) -> Tally {
        self.trials += other.trials;
        self.all_rejected += other.all_rejected;
        self.top_accepted += other.top_accepted;
        self.only_safety += other.only_safety;
        self.acceptances += other.acceptances;
        for (count, n) in self.histogram.iter_mut().zip(other.histogram) {
            *count += n;
        }
        self
    }
}

/// Simulate `trials` admission cycles with a dedicated RNG.
fn run_shard(members: &[Member], trials: usize, seed: u64) -> Tally {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut tally = Tally::new(members.len());

    for _ in 0..trials {
        let mut accepted = 0usize;
        let mut top_hit = false;
        let mut only_safety = true;

        for member in members {
            if rng.gen::<f64>() < member.p {
                accepted += 1;
                top_hit |= member.top;
                only_safety &= member.safety;
            }
        }

        tally.histogram[accepted] += 1;
        tally.acceptances += accepted as u64;
        if accepted == 0 {
            tally.all_rejected += 1;
        } else if only_safety {
            tally.only_safety += 1;
        }
        if top_hit {
            tally.top_accepted += 1;
        }
    }

    tally.trials = trials as u64;
    tally
}

fn pct(count: u64, trials: u64) -> f64 {
    round1(count as f64 / trials as f64 * 100.0)
}

/// Run the Monte Carlo simulation over probabilities (percent) and their categories.
///
/// Trials are split into fixed-size shards seeded from one master RNG, so a
/// seeded run gives the same answer whether the shards run in sequence or on
/// the rayon pool.
pub fn simulate(
    probabilities: &[f64],
    categories: &[Category],
    config: &SimulationConfig,
) -> Result<SimulationSummary, InvalidInput> {
    if config.trials == 0 {
        return Err(InvalidInput::Trials);
    }
    if config.shard_size == 0 {
        return Err(InvalidInput::ShardSize);
    }
    if probabilities.len() != categories.len() {
        return Err(InvalidInput::LengthMismatch {
            probabilities: probabilities.len(),
            categories: categories.len(),
        });
    }
    validate_probabilities(probabilities)?;

    let members: Vec<Member> = probabilities
        .iter()
        .zip(categories)
        .map(|(&pct, &category)| Member {
            p: pct / 100.0,
            top: category.is_reach(),
            safety: category == Category::Safety,
        })
        .collect();

    let mut master = match config.seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };
    let shards: Vec<(usize, u64)> = (0..config.trials)
        .step_by(config.shard_size)
        .map(|start| {
            let size = config.shard_size.min(config.trials - start);
            (size, master.gen::<u64>())
        })
        .collect();

    let parallel = config.trials >= config.parallel_threshold;
    debug!(trials = config.trials, shards = shards.len(), parallel, "simulating portfolio");

    let empty = || Tally::new(members.len());
    let tally = if parallel {
        shards
            .par_iter()
            .map(|&(size, seed)| run_shard(&members, size, seed))
            .reduce(empty, Tally::merge)
    } else {
        shards
            .iter()
            .map(|&(size, seed)| run_shard(&members, size, seed))
            .fold(empty(), Tally::merge)
    };

    let has_top = members.iter().any(|m| m.top);
    let has_safety = members.iter().any(|m| m.safety);
    let trials = tally.trials;

    let distribution = tally
        .histogram
        .iter()
        .enumerate()
        .map(|(count, &n)| AcceptanceBucket {
            count,
            probability: pct(n, trials),
        })
        .filter(|bucket| bucket.probability >= DISPLAY_BUCKET_FLOOR_PCT)
        .collect();

    Ok(SimulationSummary {
        trials: config.trials,
        at_least_one_pct: pct(trials - tally.all_rejected, trials),
        all_rejected_pct: pct(tally.all_rejected, trials),
        top_choice_accepted_pct: has_top.then(|| pct(tally.top_accepted, trials)),
        only_safety_accepted_pct: has_safety.then(|| pct(tally.only_safety, trials)),
        mean_acceptances: tally.acceptances as f64 / trials as f64,
        histogram: tally.histogram,
        distribution,
    })
}

/// Simulate probabilities (percent), categorising each with the default thresholds.
pub fn simulate_probabilities(
    probabilities: &[f64],
    config: &SimulationConfig,
) -> Result<SimulationSummary, InvalidInput> {
    let categories: Vec<Category> = probabilities.iter().map(|&p| classify(p)).collect();
    simulate(probabilities, &categories, config)
}

/// Closed-form and Monte Carlo outcome statistics for a portfolio.
#[derive(Clone, Debug, Default)]
pub struct PortfolioSimulator {
    config: SimulationConfig,
}

impl PortfolioSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        PortfolioSimulator { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Analyse the portfolio's estimates. Excluded colleges are carried through, not counted.
    pub fn simulate(&self, portfolio: &Portfolio) -> Result<PortfolioOutcome, InvalidInput> {
        let probabilities = portfolio.probabilities();
        let categories = portfolio.categories();

        let analytic = analyze(&probabilities, self.config.confidence_level)?;
        let simulation = simulate(&probabilities, &categories, &self.config)?;

        Ok(PortfolioOutcome {
            at_least_one_acceptance_pct: analytic.at_least_one_pct,
            all_rejected_pct: analytic.all_rejected_pct,
            expected_acceptances: analytic.expected_acceptances,
            variance_of_acceptances: analytic.variance,
            acceptance_distribution: simulation.distribution.clone(),
            confidence_interval: analytic.confidence_interval,
            analytic,
            simulation,
            excluded: portfolio.excluded().to_vec(),
        })
    }
}
