use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{REACH_THRESHOLD, SAFETY_THRESHOLD, TARGET_THRESHOLD};

/// Admission chance bucket, ordered from least to most likely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FarReach,
    Reach,
    Target,
    Safety,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::FarReach,
        Category::Reach,
        Category::Target,
        Category::Safety,
    ];

    /// Reach and far reach schools: the "top choice" subset of a portfolio.
    pub fn is_reach(self) -> bool {
        matches!(self, Category::FarReach | Category::Reach)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::FarReach => "far reach",
            Category::Reach => "reach",
            Category::Target => "target",
            Category::Safety => "safety",
        };
        f.write_str(name)
    }
}

/// Lower probability bounds (percent) of the reach, target and safety buckets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryThresholds {
    pub reach: f64,
    pub target: f64,
    pub safety: f64,
}

impl Default for CategoryThresholds {
    fn default() -> Self {
        CategoryThresholds {
            reach: REACH_THRESHOLD,
            target: TARGET_THRESHOLD,
            safety: SAFETY_THRESHOLD,
        }
    }
}

impl CategoryThresholds {
    pub fn classify(&self, probability: f64) -> Category {
        if probability >= self.safety {
            Category::Safety
        } else if probability >= self.target {
            Category::Target
        } else if probability >= self.reach {
            Category::Reach
        } else {
            Category::FarReach
        }
    }
}

/// Classify a probability (percent) with the default thresholds.
pub fn classify(probability: f64) -> Category {
    CategoryThresholds::default().classify(probability)
}
