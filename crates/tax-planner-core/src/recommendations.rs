use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::engine::validate_records;
use crate::types::{
    with_metadata, ComputationOutput, DeductionRecord, IncomeRecord, Money, Rate, TaxRegime,
    HRA_CEILING, NPS_CEILING, SECTION_80C_CEILING, SECTION_80D_CEILING,
};
use crate::TaxPlannerResult;

/// Fixed marginal rate assumed when estimating savings. An advisory
/// approximation of a typical bracket, not the taxpayer's actual rate.
pub const ASSUMED_MARGINAL_RATE: Rate = dec!(0.30);

/// Deduction field a recommendation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendationKind {
    #[serde(rename = "section80C")]
    Section80C,
    #[serde(rename = "section80D")]
    Section80D,
    #[serde(rename = "nps")]
    Nps,
    #[serde(rename = "hra")]
    Hra,
}

/// An advisory savings suggestion, reproducible from the deduction record
/// alone. The caller owns any "apply" step-increment behaviour; the kind
/// tells it which field to raise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub description: String,
    pub potential_saving: Money,
    /// Regimes under which the underlying deduction actually counts.
    pub applicable_regimes: Vec<TaxRegime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationInput {
    pub income: IncomeRecord,
    #[serde(default)]
    pub deductions: DeductionRecord,
}

/// Inspect unused deduction headroom and emit one suggestion per
/// under-utilized ceiling-bearing field, with the saving estimated at the
/// assumed marginal rate.
pub fn generate_recommendations(
    input: &RecommendationInput,
) -> TaxPlannerResult<ComputationOutput<Vec<Recommendation>>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    validate_records(&input.income, &input.deductions)?;

    let deductions = &input.deductions;
    let mut recommendations: Vec<Recommendation> = Vec::new();

    if let Some(headroom) = headroom(deductions.section_80c, SECTION_80C_CEILING) {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Section80C,
            description: format!(
                "Invest ₹{headroom} more under Section 80C (PPF, ELSS, EPF, life insurance premium) to use the full limit"
            ),
            potential_saving: headroom * ASSUMED_MARGINAL_RATE,
            applicable_regimes: vec![TaxRegime::Old],
        });
    }

    if let Some(headroom) = headroom(deductions.section_80d, SECTION_80D_CEILING) {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Section80D,
            description: format!(
                "Health insurance premium under Section 80D has ₹{headroom} of unused deduction headroom"
            ),
            potential_saving: headroom * ASSUMED_MARGINAL_RATE,
            applicable_regimes: vec![TaxRegime::Old],
        });
    }

    if let Some(headroom) = headroom(deductions.nps_contribution, NPS_CEILING) {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Nps,
            description: format!(
                "An additional NPS contribution of up to ₹{headroom} under Section 80CCD(1B) can save tax"
            ),
            potential_saving: headroom * ASSUMED_MARGINAL_RATE,
            applicable_regimes: vec![TaxRegime::Old],
        });
    }

    if let Some(headroom) = headroom(deductions.hra_exemption, HRA_CEILING) {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Hra,
            description:
                "Claim the HRA exemption by submitting rent receipts if you live in rented accommodation"
                    .to_string(),
            potential_saving: headroom * ASSUMED_MARGINAL_RATE,
            applicable_regimes: vec![TaxRegime::Old],
        });
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Deduction headroom scan at an assumed 30% marginal rate",
        &serde_json::json!({
            "gross_income": input.income.gross_total().to_string(),
            "assumed_marginal_rate": ASSUMED_MARGINAL_RATE.to_string(),
        }),
        warnings,
        elapsed,
        recommendations,
    ))
}

/// Remaining room below a statutory ceiling; None when the field is at or
/// above it.
fn headroom(current: Money, ceiling: Money) -> Option<Money> {
    let room = ceiling - current;
    (room > Decimal::ZERO).then_some(room)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_with(deductions: DeductionRecord) -> RecommendationInput {
        RecommendationInput {
            income: IncomeRecord {
                basic_salary: dec!(1_200_000),
                ..IncomeRecord::default()
            },
            deductions,
        }
    }

    fn kinds(recommendations: &[Recommendation]) -> Vec<RecommendationKind> {
        recommendations.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn empty_record_yields_all_four_suggestions() {
        let result = generate_recommendations(&input_with(DeductionRecord::default())).unwrap();
        assert_eq!(
            kinds(&result.result),
            vec![
                RecommendationKind::Section80C,
                RecommendationKind::Section80D,
                RecommendationKind::Nps,
                RecommendationKind::Hra,
            ]
        );
    }

    #[test]
    fn savings_are_headroom_times_the_assumed_rate() {
        let deductions = DeductionRecord {
            section_80c: dec!(100_000),
            ..DeductionRecord::default()
        };
        let result = generate_recommendations(&input_with(deductions)).unwrap();
        let section_80c = result
            .result
            .iter()
            .find(|r| r.kind == RecommendationKind::Section80C)
            .unwrap();
        // 50,000 of headroom at 30%
        assert_eq!(section_80c.potential_saving, dec!(15_000));
        assert_eq!(section_80c.applicable_regimes, vec![TaxRegime::Old]);
    }

    #[test]
    fn fully_utilized_fields_generate_nothing() {
        let deductions = DeductionRecord {
            section_80c: SECTION_80C_CEILING,
            section_80d: SECTION_80D_CEILING,
            nps_contribution: NPS_CEILING,
            hra_exemption: HRA_CEILING,
            ..DeductionRecord::default()
        };
        let result = generate_recommendations(&input_with(deductions)).unwrap();
        assert!(result.result.is_empty());
    }

    #[test]
    fn suggestions_are_reproducible_from_the_record_alone() {
        let deductions = DeductionRecord {
            section_80d: dec!(10_000),
            nps_contribution: dec!(20_000),
            ..DeductionRecord::default()
        };
        let first = generate_recommendations(&input_with(deductions.clone())).unwrap();
        let second = generate_recommendations(&input_with(deductions)).unwrap();
        assert_eq!(first.result, second.result);
    }

    #[test]
    fn negative_deduction_is_rejected() {
        let deductions = DeductionRecord {
            nps_contribution: dec!(-5),
            ..DeductionRecord::default()
        };
        assert!(generate_recommendations(&input_with(deductions)).is_err());
    }

    #[test]
    fn zero_hra_matches_the_flat_estimate() {
        // 50,000 ceiling at 30% = the historical flat ₹15,000 estimate.
        let result = generate_recommendations(&input_with(DeductionRecord::default())).unwrap();
        let hra = result
            .result
            .iter()
            .find(|r| r.kind == RecommendationKind::Hra)
            .unwrap();
        assert_eq!(hra.potential_saving, dec!(15_000));
    }
}
