use crate::constants::NEUTRAL_SCORE;
use crate::error::InvalidInput;
use crate::factors::FactorScore;

/// Combine factor sub-scores into the applicant's quality score.
///
/// The result is the weight-normalised mean of the sub-scores. When every
/// weight is zero the college has disclaimed every signal we have, so the
/// applicant is scored neutral instead of being penalised.
pub fn aggregate(factors: &[FactorScore]) -> Result<f64, InvalidInput> {
    let total_weight: f64 = factors.iter().map(|f| f.weight).sum();
    if total_weight <= 0.0 {
        return Ok(NEUTRAL_SCORE);
    }

    let weighted: f64 = factors.iter().map(|f| f.score * f.weight).sum();
    let quality = weighted / total_weight;

    if !(0.0..=100.0).contains(&quality) {
        return Err(InvalidInput::QualityScore(quality));
    }
    Ok(quality)
}
