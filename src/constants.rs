/// Neutral score used whenever a signal is absent
pub const NEUTRAL_SCORE: f64 = 50.0;

/// SAT total score range (extrapolation limits for the positioner)
pub const SAT_RANGE: (f64, f64) = (400.0, 1600.0);

/// ACT composite range
pub const ACT_RANGE: (f64, f64) = (1.0, 36.0);

/// GPA range after normalization to a 4.0 scale
pub const GPA_RANGE: (f64, f64) = (0.0, 4.0);

/// Blend of the academic components: (gpa, tests, rigor)
pub const ACADEMIC_BLEND: (f64, f64, f64) = (0.40, 0.40, 0.20);

/// GPA delta (student minus admitted average) thresholds and their scores.
/// Checked top to bottom; anything below the last threshold scores `GPA_DELTA_FLOOR`.
pub const GPA_DELTA_TIERS: [(f64, f64); 6] = [
    (0.30, 95.0),
    (0.15, 85.0),
    (0.0, 75.0),
    (-0.15, 60.0),
    (-0.30, 45.0),
    (-0.50, 30.0),
];

pub const GPA_DELTA_FLOOR: f64 = 15.0;

/// AP/IB course count step function: (minimum count, score)
pub const RIGOR_STEPS: [(u32, f64); 8] = [
    (12, 95.0),
    (10, 90.0),
    (8, 80.0),
    (6, 70.0),
    (4, 55.0),
    (2, 40.0),
    (1, 32.0),
    (0, 25.0),
];

/// Extracurricular score when the student lists no activities at all
pub const NO_ACTIVITY_SCORE: f64 = 15.0;

/// Demographic bonus caps, scaled by the college's importance weight
pub const FIRST_GEN_BONUS: f64 = 12.0;
pub const LEGACY_BONUS: f64 = 15.0;
pub const URM_BONUS: f64 = 12.0;

/// Selectivity tiers: (upper acceptance rate, min chance %, max chance %)
pub const SELECTIVITY_TIERS: [(f64, f64, f64); 7] = [
    (0.05, 1.0, 20.0),
    (0.10, 2.0, 30.0),
    (0.15, 3.0, 45.0),
    (0.25, 5.0, 60.0),
    (0.40, 10.0, 75.0),
    (0.60, 20.0, 88.0),
    (1.00, 35.0, 99.0),
];

/// Quality score anchors of the tiered mapping
pub const QUALITY_LOW_ANCHOR: f64 = 40.0;
pub const QUALITY_BASELINE_ANCHOR: f64 = 55.0;
pub const QUALITY_STRONG_ANCHOR: f64 = 70.0;
pub const QUALITY_EXCEPTIONAL_ANCHOR: f64 = 85.0;

/// Share of the baseline-to-min distance given up at the low anchor
pub const LOW_ANCHOR_DROP: f64 = 0.40;

/// Shares of the baseline-to-max distance gained at the upper anchors
pub const STRONG_ANCHOR_GAIN: f64 = 0.35;
pub const EXCEPTIONAL_ANCHOR_GAIN: f64 = 0.70;

/// A perfect quality score reaches this fraction of the tier maximum
pub const PERFECT_SHARE_OF_MAX: f64 = 0.95;

/// Rule-based mapping: (acceptance rate below, multiplier)
pub const RULE_BASED_SELECTIVITY: [(f64, f64); 3] = [(0.10, 0.6), (0.20, 0.75), (0.30, 0.85)];

/// Rule-based mapping output range in percent
pub const RULE_BASED_RANGE: (f64, f64) = (5.0, 95.0);

/// Category lower bounds in percent: reach, target, safety
pub const REACH_THRESHOLD: f64 = 15.0;
pub const TARGET_THRESHOLD: f64 = 30.0;
pub const SAFETY_THRESHOLD: f64 = 65.0;

/// Quality points a factor must move the score to count as a moderate or strong influence
pub const MODERATE_CONTRIBUTION: f64 = 2.0;
pub const STRONG_CONTRIBUTION: f64 = 8.0;

/// Confidence level lower bounds
pub const HIGH_CONFIDENCE: f64 = 0.8;
pub const MEDIUM_CONFIDENCE: f64 = 0.6;

/// Default Monte Carlo trial count
pub const DEFAULT_TRIALS: usize = 10_000;

/// Trials per shard when splitting the simulation
pub const DEFAULT_SHARD_SIZE: usize = 50_000;

/// Trial count from which shards run on the rayon pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1_000_000;

/// Histogram buckets below this percentage are hidden from the display distribution
pub const DISPLAY_BUCKET_FLOOR_PCT: f64 = 0.5;

/// Default two-sided confidence level for the acceptance-count interval
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Simulation signals feeding the advisor (percent)
pub const ALL_REJECTED_ALERT_PCT: f64 = 5.0;
pub const TOP_ACCEPTED_ALERT_PCT: f64 = 10.0;

/// Maximum number of recommendations returned by the advisor
pub const MAX_RECOMMENDATIONS: usize = 5;
