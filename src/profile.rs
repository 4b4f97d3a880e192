use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{ACT_RANGE, GPA_RANGE, SAT_RANGE};

/// Extracurricular impact level, 1 = national/international through 4 = participation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ActivityTier {
    National = 1,
    State = 2,
    School = 3,
    Participation = 4,
}

const TIER_KEYWORDS: [(ActivityTier, &[&str]); 4] = [
    (
        ActivityTier::National,
        &[
            "national", "international", "olympic", "presidential", "intel", "regeneron",
            "siemens", "imf", "model un", "published", "patent",
        ],
    ),
    (
        ActivityTier::State,
        &[
            "state", "regional", "varsity captain", "president", "founder", "startup",
            "research", "first place", "winner", "awardee",
        ],
    ),
    (
        ActivityTier::School,
        &[
            "school", "club president", "team leader", "editor", "varsity", "volunteer",
            "community", "internship",
        ],
    ),
    (
        ActivityTier::Participation,
        &["member", "participant", "attendee", "helper", "assistant"],
    ),
];

impl ActivityTier {
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Guess a tier from free text. Falls back to `Participation` when nothing matches.
    pub fn classify(name: &str, description: &str) -> Self {
        let text = format!("{} {}", name, description).to_lowercase();
        TIER_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
            .map(|(tier, _)| *tier)
            .unwrap_or(ActivityTier::Participation)
    }
}

impl TryFrom<u8> for ActivityTier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ActivityTier::National),
            2 => Ok(ActivityTier::State),
            3 => Ok(ActivityTier::School),
            4 => Ok(ActivityTier::Participation),
            other => Err(format!("activity tier must be 1-4, got {}", other)),
        }
    }
}

impl From<ActivityTier> for u8 {
    fn from(tier: ActivityTier) -> Self {
        tier.level()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub tier: ActivityTier,
}

impl Activity {
    pub fn new(name: impl Into<String>, tier: ActivityTier) -> Self {
        Activity {
            name: name.into(),
            tier,
        }
    }

    /// Build an activity whose tier is inferred from its name and description.
    pub fn classified(name: impl Into<String>, description: &str) -> Self {
        let name = name.into();
        let tier = ActivityTier::classify(&name, description);
        Activity { name, tier }
    }
}

/// Common GPA scales, used to hint at a missing `gpa_scale`
const GPA_SCALES: [f64; 4] = [4.0, 5.0, 10.0, 100.0];

/// Applicant data. Every field may be missing; absence lowers confidence, never errors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentProfile {
    pub gpa: Option<f64>,

    /// Scale the GPA is reported on (4.0, 5.0, 10, 100, ...)
    pub gpa_scale: f64,

    pub sat_total: Option<u32>,
    pub act_composite: Option<u32>,

    /// Number of AP and IB courses taken
    pub ap_ib_count: Option<u32>,

    /// `None` means the student did not report activities; `Some(vec![])` means none exist.
    pub activities: Option<Vec<Activity>>,

    pub first_generation: bool,
    pub legacy: bool,
    pub urm: bool,

    /// Self-assessed essay quality, 0-100
    pub essay_quality: Option<f64>,

    /// Self-assessed recommendation strength, 0-100
    pub recommendation_quality: Option<f64>,
}

impl Default for StudentProfile {
    fn default() -> Self {
        StudentProfile {
            gpa: None,
            gpa_scale: GPA_RANGE.1,
            sat_total: None,
            act_composite: None,
            ap_ib_count: None,
            activities: None,
            first_generation: false,
            legacy: false,
            urm: false,
            essay_quality: None,
            recommendation_quality: None,
        }
    }
}

impl StudentProfile {
    /// GPA converted to the 4.0 scale used by admitted-class statistics.
    pub fn normalized_gpa(&self) -> Option<f64> {
        let scale = if self.gpa_scale > 0.0 { self.gpa_scale } else { GPA_RANGE.1 };
        self.gpa
            .map(|gpa| (gpa / scale * GPA_RANGE.1).clamp(GPA_RANGE.0, GPA_RANGE.1))
    }

    /// Activity counts indexed by tier level - 1.
    pub fn tier_counts(&self) -> Option<[u32; 4]> {
        self.activities.as_ref().map(|activities| {
            let mut counts = [0u32; 4];
            for activity in activities {
                counts[(activity.tier.level() - 1) as usize] += 1;
            }
            counts
        })
    }

    /// Flag values that look like data entry mistakes. Nothing here is fatal.
    pub fn sanity_check(&self) -> Vec<ProfileWarning> {
        let mut warnings = Vec::new();

        if let Some(gpa) = self.gpa {
            if gpa < 0.0 {
                warnings.push(ProfileWarning::NegativeGpa(gpa));
            } else if gpa > self.gpa_scale {
                warnings.push(ProfileWarning::GpaAboveScale {
                    gpa,
                    scale: self.gpa_scale,
                    likely_scale: GPA_SCALES.iter().copied().find(|s| gpa <= *s),
                });
            }
        }

        if let Some(sat) = self.sat_total {
            if (sat as f64) < SAT_RANGE.0 || (sat as f64) > SAT_RANGE.1 {
                warnings.push(ProfileWarning::SatOutOfRange(sat));
            }
        }

        if let Some(act) = self.act_composite {
            if (act as f64) < ACT_RANGE.0 || (act as f64) > ACT_RANGE.1 {
                warnings.push(ProfileWarning::ActOutOfRange(act));
            }
        }

        for (label, value) in [
            ("essay", self.essay_quality),
            ("recommendation", self.recommendation_quality),
        ] {
            if let Some(q) = value {
                if !(0.0..=100.0).contains(&q) {
                    warnings.push(ProfileWarning::QualityOutOfRange { field: label, value: q });
                }
            }
        }

        if let (Some(sat), Some(gpa)) = (self.sat_total, self.normalized_gpa()) {
            if sat >= 1500 && gpa < 2.0 {
                warnings.push(ProfileWarning::InconsistentScores { sat, gpa });
            }
        }

        warnings
    }
}

/// Suspicious profile values, reported through logging.
#[derive(Clone, Debug, PartialEq)]
pub enum ProfileWarning {
    NegativeGpa(f64),
    /// The GPA is clamped to the top of its scale; the scale is never guessed
    GpaAboveScale {
        gpa: f64,
        scale: f64,
        likely_scale: Option<f64>,
    },
    SatOutOfRange(u32),
    ActOutOfRange(u32),
    QualityOutOfRange { field: &'static str, value: f64 },
    InconsistentScores { sat: u32, gpa: f64 },
}

impl fmt::Display for ProfileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileWarning::NegativeGpa(gpa) => write!(f, "negative GPA {}", gpa),
            ProfileWarning::GpaAboveScale {
                gpa,
                scale,
                likely_scale,
            } => {
                write!(f, "GPA {} exceeds its scale {} and is scored as a perfect GPA", gpa, scale)?;
                match likely_scale {
                    Some(likely) => write!(f, "; set gpa_scale if it was reported on a {} scale", likely),
                    None => Ok(()),
                }
            }
            ProfileWarning::SatOutOfRange(sat) => write!(f, "SAT score out of range: {}", sat),
            ProfileWarning::ActOutOfRange(act) => write!(f, "ACT score out of range: {}", act),
            ProfileWarning::QualityOutOfRange { field, value } => {
                write!(f, "{} quality {} outside 0-100", field, value)
            }
            ProfileWarning::InconsistentScores { sat, gpa } => {
                write!(f, "SAT {} with GPA {:.2} is inconsistent", sat, gpa)
            }
        }
    }
}

/// Admitted-class 25th/75th percentile band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PercentileBand {
    pub p25: f64,
    pub p75: f64,
}

impl PercentileBand {
    pub fn new(p25: f64, p75: f64) -> Self {
        PercentileBand { p25, p75 }
    }

    pub fn median(&self) -> f64 {
        (self.p25 + self.p75) / 2.0
    }
}

/// Importance a college assigns to a factor in its published statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportanceLevel {
    VeryImportant,
    Important,
    Considered,
    NotConsidered,
}

impl ImportanceLevel {
    pub fn weight(self) -> f64 {
        match self {
            ImportanceLevel::VeryImportant => 1.0,
            ImportanceLevel::Important => 0.75,
            ImportanceLevel::Considered => 0.5,
            ImportanceLevel::NotConsidered => 0.0,
        }
    }
}

impl Default for ImportanceLevel {
    fn default() -> Self {
        ImportanceLevel::Important
    }
}

/// Per-factor importance classes. Unlisted factors take the estimator's default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorImportance {
    pub gpa: Option<ImportanceLevel>,
    pub test_scores: Option<ImportanceLevel>,
    pub course_rigor: Option<ImportanceLevel>,
    pub extracurricular: Option<ImportanceLevel>,
    pub essay: Option<ImportanceLevel>,
    pub recommendation: Option<ImportanceLevel>,
    pub first_generation: Option<ImportanceLevel>,
    pub legacy: Option<ImportanceLevel>,
    pub urm: Option<ImportanceLevel>,
}

/// Explicit category weights that replace the importance-derived ones.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub academic: Option<f64>,
    pub extracurricular: Option<f64>,
    pub essay: Option<f64>,
    pub demographic: Option<f64>,
}

/// Published admissions statistics for one institution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollegeProfile {
    pub name: String,

    /// Overall acceptance rate as a fraction; `None` when the college publishes nothing usable
    pub acceptance_rate: Option<f64>,

    pub sat_band: Option<PercentileBand>,
    pub act_band: Option<PercentileBand>,
    pub gpa_band: Option<PercentileBand>,

    /// Average admitted GPA on a 4.0 scale
    pub gpa_average: Option<f64>,

    pub importance: FactorImportance,
    pub weights: CategoryWeights,
}

impl CollegeProfile {
    pub fn new(name: impl Into<String>, acceptance_rate: f64) -> Self {
        CollegeProfile {
            name: name.into(),
            acceptance_rate: Some(acceptance_rate),
            ..Default::default()
        }
    }

    pub fn with_sat_band(mut self, p25: f64, p75: f64) -> Self {
        self.sat_band = Some(PercentileBand::new(p25, p75));
        self
    }

    pub fn with_act_band(mut self, p25: f64, p75: f64) -> Self {
        self.act_band = Some(PercentileBand::new(p25, p75));
        self
    }

    pub fn with_gpa_band(mut self, p25: f64, p75: f64) -> Self {
        self.gpa_band = Some(PercentileBand::new(p25, p75));
        self
    }

    pub fn with_gpa_average(mut self, gpa: f64) -> Self {
        self.gpa_average = Some(gpa);
        self
    }

    pub fn with_importance(mut self, importance: FactorImportance) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_weights(mut self, weights: CategoryWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Admitted GPA reference point: the published average, else the band median.
    pub fn gpa_reference(&self) -> Option<f64> {
        self.gpa_average.or_else(|| self.gpa_band.map(|band| band.median()))
    }

    pub fn has_test_band(&self) -> bool {
        self.sat_band.is_some() || self.act_band.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_gpa_scales() {
        let student = StudentProfile {
            gpa: Some(4.5),
            gpa_scale: 5.0,
            ..Default::default()
        };
        assert!((student.normalized_gpa().unwrap() - 3.6).abs() < 1e-10);

        let student = StudentProfile {
            gpa: Some(92.0),
            gpa_scale: 100.0,
            ..Default::default()
        };
        assert!((student.normalized_gpa().unwrap() - 3.68).abs() < 1e-10);
    }

    #[test]
    fn test_normalized_gpa_clamped() {
        let student = StudentProfile {
            gpa: Some(4.3),
            ..Default::default()
        };
        assert_eq!(student.normalized_gpa(), Some(4.0));
        assert_eq!(StudentProfile::default().normalized_gpa(), None);
    }

    #[test]
    fn test_classify_activity() {
        assert_eq!(
            ActivityTier::classify("Intel Science Fair", "national finalist"),
            ActivityTier::National
        );
        assert_eq!(
            ActivityTier::classify("Debate", "State champion"),
            ActivityTier::State
        );
        assert_eq!(
            ActivityTier::classify("Newspaper", "section editor"),
            ActivityTier::School
        );
        assert_eq!(ActivityTier::classify("Chess", ""), ActivityTier::Participation);
    }

    #[test]
    fn test_gpa_above_scale_warns_with_likely_scale() {
        let student = StudentProfile {
            gpa: Some(92.0),
            ..Default::default()
        };
        assert_eq!(student.normalized_gpa(), Some(4.0));

        let warnings = student.sanity_check();
        assert_eq!(
            warnings,
            vec![ProfileWarning::GpaAboveScale {
                gpa: 92.0,
                scale: 4.0,
                likely_scale: Some(100.0),
            }]
        );
        let text = warnings[0].to_string();
        assert!(text.contains("perfect GPA"), "{}", text);
        assert!(text.contains("100 scale"), "{}", text);

        let five = StudentProfile {
            gpa: Some(4.7),
            ..Default::default()
        };
        assert!(matches!(
            five.sanity_check()[0],
            ProfileWarning::GpaAboveScale { likely_scale: Some(s), .. } if s == 5.0
        ));
    }

    #[test]
    fn test_tier_counts() {
        let student = StudentProfile {
            activities: Some(vec![
                Activity::new("Olympiad", ActivityTier::National),
                Activity::new("Orchestra", ActivityTier::School),
                Activity::new("Robotics", ActivityTier::National),
            ]),
            ..Default::default()
        };
        assert_eq!(student.tier_counts(), Some([2, 0, 1, 0]));
        assert_eq!(StudentProfile::default().tier_counts(), None);
    }

    #[test]
    fn test_tier_rejects_out_of_range() {
        assert!(ActivityTier::try_from(0).is_err());
        assert!(ActivityTier::try_from(5).is_err());
        assert_eq!(ActivityTier::try_from(2), Ok(ActivityTier::State));
    }

    #[test]
    fn test_sanity_check_flags() {
        let student = StudentProfile {
            gpa: Some(1.5),
            sat_total: Some(1550),
            act_composite: Some(40),
            ..Default::default()
        };
        let warnings = student.sanity_check();
        assert!(warnings.contains(&ProfileWarning::ActOutOfRange(40)));
        assert!(warnings
            .iter()
            .any(|w| matches!(w, ProfileWarning::InconsistentScores { sat: 1550, .. })));

        let clean = StudentProfile {
            gpa: Some(3.7),
            sat_total: Some(1400),
            ..Default::default()
        };
        assert!(clean.sanity_check().is_empty());
    }

    #[test]
    fn test_gpa_reference_falls_back_to_band() {
        let college = CollegeProfile::new("X", 0.3).with_gpa_band(3.6, 4.0);
        assert!((college.gpa_reference().unwrap() - 3.8).abs() < 1e-10);

        let college = college.with_gpa_average(3.7);
        assert_eq!(college.gpa_reference(), Some(3.7));
    }

    #[test]
    fn test_college_profile_from_json() {
        let json = r#"{
            "name": "Example College",
            "acceptance_rate": 0.2,
            "sat_band": { "p25": 1300, "p75": 1480 },
            "importance": { "essay": "very_important", "legacy": "not_considered" }
        }"#;
        let college: CollegeProfile = serde_json::from_str(json).unwrap();
        assert_eq!(college.acceptance_rate, Some(0.2));
        assert_eq!(college.importance.essay, Some(ImportanceLevel::VeryImportant));
        assert_eq!(college.importance.legacy, Some(ImportanceLevel::NotConsidered));
        assert!(college.act_band.is_none());
    }
}
