use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

use crate::constants::{
    ACADEMIC_BLEND, ACT_RANGE, FIRST_GEN_BONUS, GPA_DELTA_FLOOR, GPA_DELTA_TIERS, GPA_RANGE,
    LEGACY_BONUS, MODERATE_CONTRIBUTION, NEUTRAL_SCORE, NO_ACTIVITY_SCORE, RIGOR_STEPS, SAT_RANGE,
    STRONG_CONTRIBUTION, URM_BONUS,
};
use crate::error::InvalidInput;
use crate::percentile::position;
use crate::profile::{CollegeProfile, ImportanceLevel, StudentProfile};

/// Scoring categories combined into the quality score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Academic,
    Extracurricular,
    Essay,
    Demographic,
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FactorKind::Academic => "academic",
            FactorKind::Extracurricular => "extracurricular",
            FactorKind::Essay => "essay/recommendation",
            FactorKind::Demographic => "demographic",
        };
        f.write_str(name)
    }
}

/// Direction and size of a factor's pull on the quality score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    StrongNegative,
    ModerateNegative,
    #[default]
    Neutral,
    ModeratePositive,
    StrongPositive,
}

impl Impact {
    pub fn from_contribution(contribution: f64) -> Self {
        if contribution >= STRONG_CONTRIBUTION {
            Impact::StrongPositive
        } else if contribution >= MODERATE_CONTRIBUTION {
            Impact::ModeratePositive
        } else if contribution <= -STRONG_CONTRIBUTION {
            Impact::StrongNegative
        } else if contribution <= -MODERATE_CONTRIBUTION {
            Impact::ModerateNegative
        } else {
            Impact::Neutral
        }
    }
}

/// One category's contribution: a 0-100 sub-score and the weight it carries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub factor: FactorKind,
    pub score: f64,
    pub weight: f64,
    pub details: Vec<String>,

    /// Quality points this factor adds over a neutral applicant (negative when it drags)
    #[serde(default)]
    pub contribution: f64,
    #[serde(default)]
    pub impact: Impact,
}

impl FactorScore {
    pub fn new(factor: FactorKind, score: f64, weight: f64, details: Vec<String>) -> Self {
        FactorScore {
            factor,
            score,
            weight,
            details,
            contribution: 0.0,
            impact: Impact::Neutral,
        }
    }
}

fn importance(level: Option<ImportanceLevel>, default: ImportanceLevel) -> f64 {
    level.unwrap_or(default).weight()
}

/// Score for the gap between a student's GPA and the admitted average.
pub fn gpa_delta_score(delta: f64) -> f64 {
    GPA_DELTA_TIERS
        .iter()
        .find(|(threshold, _)| delta >= *threshold)
        .map(|(_, score)| *score)
        .unwrap_or(GPA_DELTA_FLOOR)
}

/// Monotone step over the number of AP/IB courses.
pub fn rigor_score(count: u32) -> f64 {
    RIGOR_STEPS
        .iter()
        .find(|(min, _)| count >= *min)
        .map(|(_, score)| *score)
        .unwrap_or(RIGOR_STEPS[RIGOR_STEPS.len() - 1].1)
}

/// Depth-over-volume table on activity counts per tier.
///
/// Two national-level activities already put a student at 90+, while any
/// number of participation-only activities stays at or below 30.
pub fn activity_score(counts: [u32; 4]) -> f64 {
    let [t1, t2, t3, t4] = counts;
    let score = if t1 >= 2 {
        90 + (2 * (t1 - 2) + t2).min(10)
    } else if t1 == 1 {
        75 + (4 * t2 + t3).min(12)
    } else if t2 >= 2 {
        65 + (3 * (t2 - 2) + t3).min(10)
    } else if t2 == 1 {
        52 + (3 * t3).min(10)
    } else if t3 >= 1 {
        38 + (3 * (t3 - 1) + t4).min(12)
    } else if t4 >= 1 {
        20 + (2 * (t4 - 1)).min(10)
    } else {
        return NO_ACTIVITY_SCORE;
    };
    score as f64
}

/// GPA, test scores and course rigor. `None` when none of the three can be scored.
pub fn score_academic(
    student: &StudentProfile,
    college: &CollegeProfile,
    default: ImportanceLevel,
) -> Option<FactorScore> {
    let (gpa_blend, test_blend, rigor_blend) = ACADEMIC_BLEND;
    let imp = &college.importance;
    let mut components: Vec<(f64, f64, f64)> = Vec::with_capacity(3);
    let mut details = Vec::new();

    if let Some(gpa) = student.normalized_gpa() {
        let gpa_score = if let Some(avg) = college.gpa_average {
            let delta = gpa - avg;
            details.push(format!("GPA {:.2} vs admitted average {:.2} ({:+.2})", gpa, avg, delta));
            Some(gpa_delta_score(delta))
        } else if let Some(band) = college.gpa_band.as_ref() {
            details.push(format!("GPA {:.2} vs admitted band {:.2}-{:.2}", gpa, band.p25, band.p75));
            Some(position(Some(gpa), Some(band), GPA_RANGE.0, GPA_RANGE.1))
        } else {
            None
        };
        if let Some(s) = gpa_score {
            components.push((gpa_blend, s, importance(imp.gpa, default)));
        }
    }

    let sat = student.sat_total.zip(college.sat_band.as_ref()).map(|(sat, band)| {
        position(Some(sat as f64), Some(band), SAT_RANGE.0, SAT_RANGE.1)
    });
    let act = student.act_composite.zip(college.act_band.as_ref()).map(|(act, band)| {
        position(Some(act as f64), Some(band), ACT_RANGE.0, ACT_RANGE.1)
    });
    let best_test = match (sat, act) {
        (Some(s), Some(a)) => Some(s.max(a)),
        (s, a) => s.or(a),
    };
    if let Some(test_score) = best_test {
        details.push(format!("test scores at position {:.1} of admitted class", test_score));
        components.push((test_blend, test_score, importance(imp.test_scores, default)));
    }

    if let Some(count) = student.ap_ib_count {
        details.push(format!("{} AP/IB courses", count));
        components.push((rigor_blend, rigor_score(count), importance(imp.course_rigor, default)));
    }

    if components.is_empty() {
        return None;
    }

    let blend_total: f64 = components.iter().map(|(b, _, _)| b).sum();
    let score = components.iter().map(|(b, s, _)| b * s).sum::<f64>() / blend_total;
    let weight = components.iter().map(|(_, _, w)| w).sum::<f64>() / components.len() as f64;

    Some(FactorScore::new(FactorKind::Academic, score, weight, details))
}

/// Activities by impact tier. `None` when the student did not report activities.
pub fn score_extracurricular(
    student: &StudentProfile,
    college: &CollegeProfile,
    default: ImportanceLevel,
) -> Option<FactorScore> {
    let counts = student.tier_counts()?;
    let details = vec![format!(
        "{} national, {} state, {} school, {} participation activities",
        counts[0], counts[1], counts[2], counts[3]
    )];

    Some(FactorScore::new(
        FactorKind::Extracurricular,
        activity_score(counts),
        importance(college.importance.extracurricular, default),
        details,
    ))
}

/// Essays and recommendations. Unassessed qualities count as neutral, never as strong.
pub fn score_essay(
    student: &StudentProfile,
    college: &CollegeProfile,
    default: ImportanceLevel,
) -> FactorScore {
    let essay_w = importance(college.importance.essay, default);
    let rec_w = importance(college.importance.recommendation, default);
    let essay = student.essay_quality.unwrap_or(NEUTRAL_SCORE).clamp(0.0, 100.0);
    let rec = student
        .recommendation_quality
        .unwrap_or(NEUTRAL_SCORE)
        .clamp(0.0, 100.0);

    let total = essay_w + rec_w;
    let score = if total > 0.0 {
        (essay * essay_w + rec * rec_w) / total
    } else {
        (essay + rec) / 2.0
    };

    let mut details = Vec::new();
    if student.essay_quality.is_none() && student.recommendation_quality.is_none() {
        details.push("no essay or recommendation assessment, scored neutral".to_string());
    }

    FactorScore::new(FactorKind::Essay, score, essay_w.max(rec_w), details)
}

/// Institutional hooks on a neutral baseline. Each bonus is capped and scaled by importance.
///
/// `None` when the student has no hook the college considers, so lacking a
/// hook never pulls the quality score toward neutral.
pub fn score_demographic(
    student: &StudentProfile,
    college: &CollegeProfile,
    default: ImportanceLevel,
) -> Option<FactorScore> {
    let imp = &college.importance;
    let hooks = [
        ("first-generation", student.first_generation, FIRST_GEN_BONUS, importance(imp.first_generation, default)),
        ("legacy", student.legacy, LEGACY_BONUS, importance(imp.legacy, default)),
        ("under-represented minority", student.urm, URM_BONUS, importance(imp.urm, default)),
    ];

    let mut score = NEUTRAL_SCORE;
    let mut weight: f64 = 0.0;
    let mut details = Vec::new();
    for (label, present, cap, hook_weight) in hooks {
        if present && hook_weight > 0.0 {
            let bonus = cap * hook_weight;
            score += bonus;
            weight = weight.max(hook_weight);
            details.push(format!("{} consideration (+{:.1})", label, bonus));
        }
    }

    if weight <= 0.0 {
        return None;
    }
    Some(FactorScore::new(FactorKind::Demographic, score.min(100.0), weight, details))
}

fn override_for(college: &CollegeProfile, factor: FactorKind) -> Option<f64> {
    let weights = &college.weights;
    match factor {
        FactorKind::Academic => weights.academic,
        FactorKind::Extracurricular => weights.extracurricular,
        FactorKind::Essay => weights.essay,
        FactorKind::Demographic => weights.demographic,
    }
}

/// Run every scorer, skipping those without data and applying explicit weight overrides.
///
/// Each factor's contribution is its weighted share of the distance from
/// neutral, so contributions sum to `quality - 50`. Factors come back ordered
/// by absolute contribution, largest first.
pub fn score_factors(
    student: &StudentProfile,
    college: &CollegeProfile,
    default: ImportanceLevel,
) -> Result<Vec<FactorScore>, InvalidInput> {
    let scored = [
        score_academic(student, college, default),
        score_extracurricular(student, college, default),
        Some(score_essay(student, college, default)),
        score_demographic(student, college, default),
    ];

    let mut factors = Vec::with_capacity(scored.len());
    for mut factor in scored.into_iter().flatten() {
        if let Some(weight) = override_for(college, factor.factor) {
            if !weight.is_finite() || weight < 0.0 {
                return Err(InvalidInput::Weight {
                    factor: factor.factor.to_string(),
                    value: weight,
                });
            }
            factor.weight = weight;
        }
        factors.push(factor);
    }

    let total_weight: f64 = factors.iter().map(|f| f.weight).sum();
    for factor in &mut factors {
        if total_weight > 0.0 {
            factor.contribution = (factor.score - NEUTRAL_SCORE) * factor.weight / total_weight;
        }
        factor.impact = Impact::from_contribution(factor.contribution);
        trace!(
            factor = %factor.factor,
            score = factor.score,
            weight = factor.weight,
            contribution = factor.contribution,
            "factor scored"
        );
    }
    factors.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));

    Ok(factors)
}
