use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TaxPlannerError;
use crate::regimes::{RegimeDefinition, RegimeTable, Slab};
use crate::types::{
    with_metadata, ComputationOutput, DeductionRecord, IncomeRecord, Money, Rate, TaxRegime,
};
use crate::TaxPlannerResult;

/// Flat health-and-education cess applied to computed tax.
const CESS_MULTIPLIER: Decimal = dec!(1.04);

/// Input to a single-regime tax computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxComputationInput {
    /// Assessment year to pull regime configuration for. Defaults to
    /// current law.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_year: Option<String>,
    pub income: IncomeRecord,
    #[serde(default)]
    pub deductions: DeductionRecord,
    pub regime: TaxRegime,
}

/// Per-regime tax outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxDetail {
    pub regime: TaxRegime,
    /// Gross income minus applicable deductions, floored at zero.
    pub taxable_income: Money,
    /// Cess-inclusive tax payable, rounded to the whole rupee.
    pub total_tax: Money,
    /// Total tax as a percentage of gross income, two decimals. Exactly 0
    /// when gross income is zero.
    pub effective_tax_rate: Rate,
    /// Sum of deductions actually subtracted. Present only for regimes
    /// that permit itemized deductions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_deductions: Option<Money>,
    /// Rounded (gross − tax) / 12.
    pub monthly_take_home: Money,
}

/// Compute the tax liability under one regime.
///
/// Taxable income is gross income minus the itemized deduction total (old
/// regime) or minus the standard deduction alone (new-style regimes),
/// floored at zero. The slab ladder is traversed in ascending order, the
/// rebate applied for taxable incomes at or below the rebate ceiling, and
/// the 4% cess added with round-half-away-from-zero to whole rupees.
pub fn compute_tax(input: &TaxComputationInput) -> TaxPlannerResult<ComputationOutput<TaxDetail>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_records(&input.income, &input.deductions)?;

    let table = RegimeTable::resolve(input.assessment_year.as_deref())?;
    table.validate()?;
    let definition = table.definition(input.regime)?;

    let gross = input.income.gross_total();
    if gross <= Decimal::ZERO {
        warnings.push(
            "Gross income is zero or negative; tax and effective rate are reported as zero"
                .to_string(),
        );
    }

    let detail = detail_for_regime(&input.income, &input.deductions, definition, &mut warnings);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Progressive slab traversal with rebate and 4% health-and-education cess",
        &serde_json::json!({
            "assessment_year": table.assessment_year(),
            "regime": input.regime,
            "gross_income": gross.to_string(),
            "standard_deduction": definition.standard_deduction.to_string(),
            "itemized_deductions": definition.itemized_deductions,
        }),
        warnings,
        elapsed,
        detail,
    ))
}

/// Shared core used by both `compute_tax` and the regime comparator.
pub(crate) fn detail_for_regime(
    income: &IncomeRecord,
    deductions: &DeductionRecord,
    definition: &RegimeDefinition,
    warnings: &mut Vec<String>,
) -> TaxDetail {
    let gross = income.gross_total();

    let (applied_deductions, itemized_total) = if definition.itemized_deductions {
        let total = deductions.itemized_total();
        (total, Some(total))
    } else {
        (definition.standard_deduction, None)
    };

    let raw_taxable = gross - applied_deductions;
    if raw_taxable < Decimal::ZERO && gross > Decimal::ZERO {
        warnings.push(format!(
            "{}: deductions exceed gross income; taxable income floored at zero",
            definition.regime
        ));
    }
    let taxable_income = raw_taxable.max(Decimal::ZERO);

    let mut tax = slab_tax(taxable_income, &definition.slabs);

    if let Some(rebate) = &definition.rebate {
        if taxable_income <= rebate.income_ceiling {
            tax = (tax - tax.min(rebate.max_rebate)).max(Decimal::ZERO);
        }
    }

    let total_tax = round_rupees(tax * CESS_MULTIPLIER);

    let effective_tax_rate = if gross > Decimal::ZERO {
        (total_tax / gross * dec!(100))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    };

    let monthly_take_home = round_rupees((gross - total_tax) / dec!(12));

    TaxDetail {
        regime: definition.regime,
        taxable_income,
        total_tax,
        effective_tax_rate,
        total_deductions: itemized_total,
        monthly_take_home,
    }
}

/// Marginal tax over an ascending slab ladder. Slabs entirely above the
/// taxable income contribute zero.
fn slab_tax(taxable_income: Money, slabs: &[Slab]) -> Money {
    let mut tax = Decimal::ZERO;
    for slab in slabs {
        if taxable_income > slab.min {
            let upper = slab.max.map_or(taxable_income, |max| taxable_income.min(max));
            tax += (upper - slab.min) * slab.rate;
        }
    }
    tax
}

fn round_rupees(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Reject inputs the calling layer must never let through: negative
/// deduction fields, or negative income components other than the
/// capital-gains fields (which may carry losses).
pub(crate) fn validate_records(
    income: &IncomeRecord,
    deductions: &DeductionRecord,
) -> TaxPlannerResult<()> {
    let income_fields = [
        ("basic_salary", income.basic_salary),
        ("variable_pay", income.variable_pay),
        ("other_income", income.other_income),
        ("house_property_income", income.house_property_income),
    ];
    for (field, value) in income_fields {
        if value < Decimal::ZERO {
            return Err(TaxPlannerError::InvalidInput {
                field: field.into(),
                reason: "Income component cannot be negative".into(),
            });
        }
    }

    let deduction_fields = [
        ("section_80c", deductions.section_80c),
        ("section_80d", deductions.section_80d),
        ("hra_exemption", deductions.hra_exemption),
        ("lta_exemption", deductions.lta_exemption),
        ("nps_contribution", deductions.nps_contribution),
        ("standard_deduction", deductions.standard_deduction),
        ("other_deductions", deductions.other_deductions),
    ];
    for (field, value) in deduction_fields {
        if value < Decimal::ZERO {
            return Err(TaxPlannerError::InvalidInput {
                field: field.into(),
                reason: "Deduction cannot be negative".into(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salary_only(amount: Money) -> IncomeRecord {
        IncomeRecord {
            basic_salary: amount,
            ..IncomeRecord::default()
        }
    }

    fn input_for(regime: TaxRegime, gross: Money) -> TaxComputationInput {
        TaxComputationInput {
            assessment_year: None,
            income: salary_only(gross),
            deductions: DeductionRecord::default(),
            regime,
        }
    }

    #[test]
    fn old_regime_800k_standard_deduction_only() {
        // Taxable = 800,000 - 50,000 = 750,000
        // Tax = 0 + 12,500 (5% of 250k) + 50,000 (20% of 250k) = 62,500
        // With cess: 62,500 * 1.04 = 65,000
        let result = compute_tax(&input_for(TaxRegime::Old, dec!(800_000))).unwrap();
        let detail = &result.result;
        assert_eq!(detail.taxable_income, dec!(750_000));
        assert_eq!(detail.total_tax, dec!(65_000));
        assert_eq!(detail.total_deductions, Some(dec!(50_000)));
        assert_eq!(detail.effective_tax_rate, dec!(8.13));
    }

    #[test]
    fn new_regime_800k_standard_deduction_only() {
        // Taxable = 750,000
        // Tax = 15,000 (5% of 300k) + 15,000 (10% of 150k) = 30,000
        // With cess: 31,200
        let result = compute_tax(&input_for(TaxRegime::New, dec!(800_000))).unwrap();
        let detail = &result.result;
        assert_eq!(detail.taxable_income, dec!(750_000));
        assert_eq!(detail.total_tax, dec!(31_200));
        assert_eq!(detail.total_deductions, None);
        assert_eq!(detail.effective_tax_rate, dec!(3.90));
        assert_eq!(detail.monthly_take_home, dec!(64_067));
    }

    #[test]
    fn new_regime_rebate_zeroes_tax_at_700k_gross() {
        // Taxable = 650,000; tax before rebate = 15,000 + 5,000 = 20,000
        // Rebate (ceiling 700,000, cap 25,000) clears it entirely.
        let result = compute_tax(&input_for(TaxRegime::New, dec!(700_000))).unwrap();
        assert_eq!(result.result.total_tax, Decimal::ZERO);
        assert_eq!(result.result.effective_tax_rate, Decimal::ZERO);
    }

    #[test]
    fn rebate_boundary_is_inclusive_at_the_ceiling() {
        // Gross 750,000 → taxable exactly 700,000; pre-rebate tax 25,000
        // equals the rebate cap, so tax is zero.
        let at_ceiling = compute_tax(&input_for(TaxRegime::New, dec!(750_000))).unwrap();
        assert_eq!(at_ceiling.result.total_tax, Decimal::ZERO);

        // One rupee above the ceiling the rebate no longer applies.
        let above = compute_tax(&input_for(TaxRegime::New, dec!(750_001))).unwrap();
        assert!(above.result.total_tax > dec!(25_000));
    }

    #[test]
    fn old_regime_itemized_deductions_reduce_taxable_income() {
        let input = TaxComputationInput {
            assessment_year: None,
            income: salary_only(dec!(1_200_000)),
            deductions: DeductionRecord {
                section_80c: dec!(150_000),
                section_80d: dec!(25_000),
                nps_contribution: dec!(50_000),
                ..DeductionRecord::default()
            },
            regime: TaxRegime::Old,
        };
        // Itemized total = 150,000 + 25,000 + 50,000 + 50,000 standard = 275,000
        // Taxable = 925,000; tax = 12,500 + 85,000 (20% of 425k) = 97,500
        // With cess: 101,400
        let result = compute_tax(&input).unwrap();
        assert_eq!(result.result.total_deductions, Some(dec!(275_000)));
        assert_eq!(result.result.taxable_income, dec!(925_000));
        assert_eq!(result.result.total_tax, dec!(101_400));
    }

    #[test]
    fn new_regime_ignores_itemized_deductions() {
        let mut input = input_for(TaxRegime::New, dec!(800_000));
        input.deductions.section_80c = dec!(150_000);
        let result = compute_tax(&input).unwrap();
        // Only the standard deduction applies.
        assert_eq!(result.result.taxable_income, dec!(750_000));
    }

    #[test]
    fn deductions_exceeding_income_floor_taxable_at_zero() {
        let input = TaxComputationInput {
            assessment_year: None,
            income: salary_only(dec!(100_000)),
            deductions: DeductionRecord {
                section_80c: dec!(150_000),
                ..DeductionRecord::default()
            },
            regime: TaxRegime::Old,
        };
        let result = compute_tax(&input).unwrap();
        assert_eq!(result.result.taxable_income, Decimal::ZERO);
        assert_eq!(result.result.total_tax, Decimal::ZERO);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("floored at zero")));
    }

    #[test]
    fn zero_income_reports_zero_rate_with_warning() {
        let result = compute_tax(&input_for(TaxRegime::New, Decimal::ZERO)).unwrap();
        assert_eq!(result.result.total_tax, Decimal::ZERO);
        assert_eq!(result.result.effective_tax_rate, Decimal::ZERO);
        assert!(result.warnings.iter().any(|w| w.contains("zero")));
    }

    #[test]
    fn capital_losses_reduce_slab_income() {
        let input = TaxComputationInput {
            assessment_year: None,
            income: IncomeRecord {
                basic_salary: dec!(900_000),
                long_term_capital_gains: dec!(-100_000),
                ..IncomeRecord::default()
            },
            deductions: DeductionRecord::default(),
            regime: TaxRegime::New,
        };
        // Gross folds the loss in: 800,000, taxable 750,000.
        let result = compute_tax(&input).unwrap();
        assert_eq!(result.result.taxable_income, dec!(750_000));
        assert_eq!(result.result.total_tax, dec!(31_200));
    }

    #[test]
    fn negative_deduction_is_rejected() {
        let mut input = input_for(TaxRegime::Old, dec!(500_000));
        input.deductions.section_80d = dec!(-1);
        let err = compute_tax(&input).unwrap_err();
        match err {
            TaxPlannerError::InvalidInput { field, .. } => assert_eq!(field, "section_80d"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn negative_salary_is_rejected() {
        let input = input_for(TaxRegime::New, dec!(-1));
        assert!(compute_tax(&input).is_err());
    }

    #[test]
    fn unknown_assessment_year_is_rejected() {
        let mut input = input_for(TaxRegime::New, dec!(500_000));
        input.assessment_year = Some("1999-00".into());
        assert!(matches!(
            compute_tax(&input).unwrap_err(),
            TaxPlannerError::UnknownAssessmentYear(_)
        ));
    }

    #[test]
    fn cess_rounding_is_half_away_from_zero() {
        // round_rupees is the single rounding point for the final tax.
        assert_eq!(round_rupees(dec!(100.5)), dec!(101));
        assert_eq!(round_rupees(dec!(100.4)), dec!(100));
        assert_eq!(round_rupees(dec!(-100.5)), dec!(-101));
    }

    #[test]
    fn top_slab_is_unbounded() {
        // 5,000,000 gross under old: taxable 4,950,000
        // Tax = 12,500 + 100,000 + 30% of 3,950,000 = 1,297,500; cess → 1,349,400
        let result = compute_tax(&input_for(TaxRegime::Old, dec!(5_000_000))).unwrap();
        assert_eq!(result.result.total_tax, dec!(1_349_400));
    }
}
