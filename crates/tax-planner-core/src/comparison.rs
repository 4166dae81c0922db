use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::engine::{detail_for_regime, validate_records, TaxDetail};
use crate::regimes::RegimeTable;
use crate::types::{
    with_metadata, ComputationOutput, DeductionRecord, IncomeRecord, Money, TaxRegime,
};
use crate::TaxPlannerResult;

/// Input to a full cross-regime comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeComparisonInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_year: Option<String>,
    pub income: IncomeRecord,
    #[serde(default)]
    pub deductions: DeductionRecord,
}

/// The minimum-tax selection. A tie between regimes is surfaced
/// explicitly so callers can disclose "these regimes are equivalent"
/// instead of silently favouring one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegimeChoice {
    Single(TaxRegime),
    /// Two or more regimes share the minimum tax, listed in table order.
    Tie(Vec<TaxRegime>),
}

impl RegimeChoice {
    /// Default selection for callers that must pick one regime: the single
    /// winner, or the first tied regime in table order. The tie itself
    /// stays visible on the breakdown.
    pub fn primary(&self) -> TaxRegime {
        match self {
            RegimeChoice::Single(regime) => *regime,
            RegimeChoice::Tie(regimes) => regimes[0],
        }
    }

    pub fn is_tie(&self) -> bool {
        matches!(self, RegimeChoice::Tie(_))
    }
}

/// One Tax Detail per supported regime plus the recommended selection.
/// Built fresh on every call; never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// Per-regime outcomes, in regime-table order.
    pub details: Vec<TaxDetail>,
    /// Regimes ranked by ascending total tax (stable within equal tax).
    pub ranking: Vec<TaxRegime>,
    pub recommendation: RegimeChoice,
    /// Costliest minus cheapest total tax: the annual saving available by
    /// choosing the recommended regime over the worst one.
    pub potential_savings: Money,
}

/// Run the engine once per supported regime and select the minimum-tax
/// regime, surfacing ties explicitly.
pub fn compare_regimes(
    input: &RegimeComparisonInput,
) -> TaxPlannerResult<ComputationOutput<TaxBreakdown>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_records(&input.income, &input.deductions)?;

    let table = RegimeTable::resolve(input.assessment_year.as_deref())?;
    table.validate()?;

    let gross = input.income.gross_total();
    if gross <= Decimal::ZERO {
        warnings.push(
            "Gross income is zero or negative; tax and effective rate are reported as zero"
                .to_string(),
        );
    }

    let details: Vec<TaxDetail> = table
        .regimes()
        .map(|definition| detail_for_regime(&input.income, &input.deductions, definition, &mut warnings))
        .collect();

    let min_tax = details
        .iter()
        .map(|d| d.total_tax)
        .min()
        .unwrap_or(Decimal::ZERO);
    let max_tax = details
        .iter()
        .map(|d| d.total_tax)
        .max()
        .unwrap_or(Decimal::ZERO);

    let minima: Vec<TaxRegime> = details
        .iter()
        .filter(|d| d.total_tax == min_tax)
        .map(|d| d.regime)
        .collect();
    let recommendation = if minima.len() == 1 {
        RegimeChoice::Single(minima[0])
    } else {
        RegimeChoice::Tie(minima)
    };

    let mut ranking: Vec<TaxRegime> = details.iter().map(|d| d.regime).collect();
    ranking.sort_by_key(|regime| {
        details
            .iter()
            .find(|d| d.regime == *regime)
            .map(|d| d.total_tax)
            .unwrap_or(Decimal::ZERO)
    });

    let breakdown = TaxBreakdown {
        details,
        ranking,
        recommendation,
        potential_savings: max_tax - min_tax,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Per-regime slab computation with minimum-tax selection and explicit tie surfacing",
        &serde_json::json!({
            "assessment_year": table.assessment_year(),
            "gross_income": gross.to_string(),
            "regimes_compared": table.regimes().count(),
        }),
        warnings,
        elapsed,
        breakdown,
    ))
}
