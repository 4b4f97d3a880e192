use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::category::Category;
use crate::constants::{ALL_REJECTED_ALERT_PCT, MAX_RECOMMENDATIONS, TOP_ACCEPTED_ALERT_PCT};
use crate::estimator::AdmissionEstimate;
use crate::portfolio::Portfolio;
use crate::simulation::PortfolioOutcome;

/// Per-unit deductions from the balance score, each with its cap
const MISSING_SAFETY_PENALTY: (u32, u32) = (15, 30);
const MISSING_TARGET_PENALTY: (u32, u32) = (10, 30);
const EXCESS_REACH_PENALTY: (u32, u32) = (5, 20);
const SHORT_LIST_PENALTY: (u32, u32) = (5, 30);
const LONG_LIST_PENALTY: (u32, u32) = (3, 20);

/// Acceptable count range for one category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRange {
    pub min: u32,
    pub ideal: u32,
    pub max: u32,
}

impl CategoryRange {
    pub const fn new(min: u32, ideal: u32, max: u32) -> Self {
        CategoryRange { min, ideal, max }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IdealDistribution {
    pub reach: CategoryRange,
    pub target: CategoryRange,
    pub safety: CategoryRange,
}

impl Default for IdealDistribution {
    fn default() -> Self {
        IdealDistribution {
            reach: CategoryRange::new(2, 4, 6),
            target: CategoryRange::new(3, 4, 5),
            safety: CategoryRange::new(2, 2, 3),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub ideal: IdealDistribution,

    /// Counts above which a category is flagged as redundant
    pub far_reach_ceiling: u32,
    pub safety_ceiling: u32,

    /// Acceptable total list size
    pub min_total: u32,
    pub max_total: u32,

    /// Simulated P(all rejected) above which another safety is advised (percent)
    pub all_rejected_alert_pct: f64,

    /// Simulated P(top choice accepted) below which reach effort is questioned (percent)
    pub top_accepted_alert_pct: f64,

    pub max_recommendations: usize,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        AdvisorConfig {
            ideal: IdealDistribution::default(),
            far_reach_ceiling: 4,
            safety_ceiling: 3,
            min_total: 6,
            max_total: 15,
            all_rejected_alert_pct: ALL_REJECTED_ALERT_PCT,
            top_accepted_alert_pct: TOP_ACCEPTED_ALERT_PCT,
            max_recommendations: MAX_RECOMMENDATIONS,
        }
    }
}

/// Number of portfolio colleges in each category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDistribution {
    pub far_reach: u32,
    pub reach: u32,
    pub target: u32,
    pub safety: u32,
}

impl CategoryDistribution {
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut dist = CategoryDistribution::default();
        for category in categories {
            match category {
                Category::FarReach => dist.far_reach += 1,
                Category::Reach => dist.reach += 1,
                Category::Target => dist.target += 1,
                Category::Safety => dist.safety += 1,
            }
        }
        dist
    }

    pub fn count(&self, category: Category) -> u32 {
        match category {
            Category::FarReach => self.far_reach,
            Category::Reach => self.reach,
            Category::Target => self.target,
            Category::Safety => self.safety,
        }
    }

    pub fn total(&self) -> u32 {
        self.far_reach + self.reach + self.target + self.safety
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    Shortage,
    Surplus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A category count outside its ideal range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub category: Category,
    pub kind: GapKind,
    pub severity: Severity,
    pub count: u32,
    pub range: CategoryRange,
    pub message: String,
}

/// A category over its ceiling, with the members suggested for removal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Redundancy {
    pub category: Category,
    pub count: u32,
    pub ceiling: u32,
    pub removal_candidates: Vec<String>,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "category")]
pub enum RecommendationAction {
    Add(Category),
    Trim(Category),
    ExpandList,
    TrimList,
    ReconsiderReachEffort,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// 1 is the most urgent
    pub priority: u8,
    pub action: RecommendationAction,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub distribution: CategoryDistribution,
    pub balance_score: u8,
    pub gaps: Vec<Gap>,
    pub redundancies: Vec<Redundancy>,
    pub recommendations: Vec<Recommendation>,
}

fn penalty(units: u32, (per_unit, cap): (u32, u32)) -> u32 {
    (units * per_unit).min(cap)
}

/// Portfolio balance from 0 to 100. Missing safeties and targets cost the most.
pub fn balance_score(dist: &CategoryDistribution, config: &AdvisorConfig) -> u8 {
    let ideal = &config.ideal;
    let total = dist.total();

    let deductions = penalty(ideal.safety.min.saturating_sub(dist.safety), MISSING_SAFETY_PENALTY)
        + penalty(ideal.target.min.saturating_sub(dist.target), MISSING_TARGET_PENALTY)
        + penalty(dist.reach.saturating_sub(ideal.reach.max), EXCESS_REACH_PENALTY)
        + penalty(config.min_total.saturating_sub(total), SHORT_LIST_PENALTY)
        + penalty(total.saturating_sub(config.max_total), LONG_LIST_PENALTY);

    100u32.saturating_sub(deductions).min(100) as u8
}

fn detect_gaps(dist: &CategoryDistribution, ideal: &IdealDistribution) -> Vec<Gap> {
    let ranges = [
        (Category::Safety, ideal.safety),
        (Category::Target, ideal.target),
        (Category::Reach, ideal.reach),
    ];

    let mut gaps = Vec::new();
    for (category, range) in ranges {
        let count = dist.count(category);
        if count < range.min {
            let missing = range.min - count;
            let severity = if count == 0 || missing >= 2 {
                Severity::High
            } else {
                Severity::Medium
            };
            gaps.push(Gap {
                category,
                kind: GapKind::Shortage,
                severity,
                count,
                range,
                message: format!(
                    "only {} {} school(s); aim for {} to {}",
                    count, category, range.min, range.max
                ),
            });
        } else if count > range.max {
            let excess = count - range.max;
            gaps.push(Gap {
                category,
                kind: GapKind::Surplus,
                severity: if excess >= 3 { Severity::Medium } else { Severity::Low },
                count,
                range,
                message: format!(
                    "{} {} schools is more than the suggested {}",
                    count, category, range.max
                ),
            });
        }
    }
    gaps
}

fn detect_redundancies(entries: &[AdmissionEstimate], dist: &CategoryDistribution, config: &AdvisorConfig) -> Vec<Redundancy> {
    let mut redundancies = Vec::new();

    for (category, ceiling) in [
        (Category::FarReach, config.far_reach_ceiling),
        (Category::Safety, config.safety_ceiling),
    ] {
        let count = dist.count(category);
        if count <= ceiling {
            continue;
        }

        let mut members: Vec<&AdmissionEstimate> =
            entries.iter().filter(|e| e.category == category).collect();
        // Least likely far reaches and most certain safeties add the least
        if category == Category::Safety {
            members.sort_by(|a, b| b.probability.cmp(&a.probability));
        } else {
            members.sort_by(|a, b| a.probability.cmp(&b.probability));
        }
        let removal_candidates: Vec<String> = members
            .iter()
            .take((count - ceiling) as usize)
            .map(|e| e.college.clone())
            .collect();

        redundancies.push(Redundancy {
            category,
            count,
            ceiling,
            message: format!(
                "{} {} schools exceeds {}; consider dropping {}",
                count,
                category,
                ceiling,
                removal_candidates.join(", ")
            ),
            removal_candidates,
        });
    }

    redundancies
}

/// Scores portfolio balance and turns gaps and simulation signals into advice.
#[derive(Clone, Debug, Default)]
pub struct PortfolioAdvisor {
    config: AdvisorConfig,
}

impl PortfolioAdvisor {
    pub fn new(config: AdvisorConfig) -> Self {
        PortfolioAdvisor { config }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    pub fn advise(&self, portfolio: &Portfolio, outcome: Option<&PortfolioOutcome>) -> Advice {
        let config = &self.config;
        let dist = CategoryDistribution::from_categories(portfolio.categories());
        let gaps = detect_gaps(&dist, &config.ideal);
        let redundancies = detect_redundancies(portfolio.entries(), &dist, config);

        let mut candidates: Vec<Recommendation> = Vec::new();
        let mut push = |priority: u8, action: RecommendationAction, message: String| {
            candidates.push(Recommendation {
                priority,
                action,
                message,
            })
        };

        for gap in gaps.iter().filter(|g| g.kind == GapKind::Shortage) {
            let priority = match gap.category {
                Category::Safety => 1,
                Category::Target => 2,
                _ => 3,
            };
            push(
                priority,
                RecommendationAction::Add(gap.category),
                format!("add {} {} school(s): {}", gap.range.min - gap.count, gap.category, gap.message),
            );
        }

        let total = dist.total();
        if total < config.min_total {
            push(
                2,
                RecommendationAction::ExpandList,
                format!("list has {} colleges; consider at least {}", total, config.min_total),
            );
        }

        if let Some(outcome) = outcome {
            let all_rejected = outcome.simulation.all_rejected_pct;
            if all_rejected > config.all_rejected_alert_pct {
                push(
                    1,
                    RecommendationAction::Add(Category::Safety),
                    format!("{:.1}% chance of no acceptances; add a safety school", all_rejected),
                );
            }
            if let Some(top) = outcome.simulation.top_choice_accepted_pct {
                if top < config.top_accepted_alert_pct {
                    push(
                        3,
                        RecommendationAction::ReconsiderReachEffort,
                        format!(
                            "only {:.1}% chance of any reach acceptance; weigh application effort on reach schools",
                            top
                        ),
                    );
                }
            }
        }

        for redundancy in &redundancies {
            push(4, RecommendationAction::Trim(redundancy.category), redundancy.message.clone());
        }
        for gap in gaps.iter().filter(|g| g.kind == GapKind::Surplus) {
            push(4, RecommendationAction::Trim(gap.category), gap.message.clone());
        }
        if total > config.max_total {
            push(
                4,
                RecommendationAction::TrimList,
                format!("list has {} colleges; applications past {} add little", total, config.max_total),
            );
        }

        // Keep the first (most specific) message per action, then order by urgency
        let mut seen = HashSet::new();
        let mut recommendations: Vec<Recommendation> = Vec::new();
        for rec in candidates {
            if seen.insert(rec.action) {
                recommendations.push(rec);
            } else if let Some(existing) = recommendations.iter_mut().find(|r| r.action == rec.action) {
                existing.priority = existing.priority.min(rec.priority);
            }
        }
        recommendations.sort_by_key(|r| r.priority);
        recommendations.truncate(config.max_recommendations);

        let balance = balance_score(&dist, config);
        debug!(
            total,
            balance,
            gaps = gaps.len(),
            redundancies = redundancies.len(),
            "portfolio advice"
        );

        Advice {
            distribution: dist,
            balance_score: balance,
            gaps,
            redundancies,
            recommendations,
        }
    }
}
