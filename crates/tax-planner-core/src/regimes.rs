use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::TaxPlannerError;
use crate::types::{Money, Rate, TaxRegime, STANDARD_DEDUCTION};
use crate::TaxPlannerResult;

/// Assessment year covered by the built-in table.
pub const CURRENT_ASSESSMENT_YEAR: &str = "2025-26";

/// A contiguous income bracket taxed at one marginal rate.
///
/// Brackets are half-open `[min, max)`; `max` of `None` marks the unbounded
/// top slab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slab {
    pub min: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Money>,
    pub rate: Rate,
}

/// Forgiveness of computed tax, up to `max_rebate`, for taxable incomes at
/// or below `income_ceiling`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebateRule {
    pub income_ceiling: Money,
    pub max_rebate: Money,
}

/// One statutory ruleset: slab ladder, standard deduction, rebate
/// eligibility, and whether itemized deductions are permitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeDefinition {
    pub regime: TaxRegime,
    pub slabs: Vec<Slab>,
    pub standard_deduction: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rebate: Option<RebateRule>,
    pub itemized_deductions: bool,
}

/// Immutable regime configuration for one assessment year. Changes only
/// when tax law changes; the engine never hard-codes slab data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeTable {
    assessment_year: String,
    regimes: Vec<RegimeDefinition>,
}

impl RegimeTable {
    /// The table for the current assessment year.
    pub fn current_law() -> RegimeTable {
        RegimeTable {
            assessment_year: CURRENT_ASSESSMENT_YEAR.to_string(),
            regimes: vec![old_regime(), new_regime(), revised_regime()],
        }
    }

    /// Look up the table for a given assessment year. Future years slot in
    /// here without touching the engine.
    pub fn for_year(year: &str) -> TaxPlannerResult<RegimeTable> {
        match year {
            CURRENT_ASSESSMENT_YEAR => Ok(RegimeTable::current_law()),
            other => Err(TaxPlannerError::UnknownAssessmentYear(other.to_string())),
        }
    }

    /// Resolve an optional assessment year, defaulting to current law.
    pub fn resolve(year: Option<&str>) -> TaxPlannerResult<RegimeTable> {
        match year {
            Some(y) => RegimeTable::for_year(y),
            None => Ok(RegimeTable::current_law()),
        }
    }

    pub fn assessment_year(&self) -> &str {
        &self.assessment_year
    }

    /// Supported regimes, in table order.
    pub fn regimes(&self) -> impl Iterator<Item = &RegimeDefinition> {
        self.regimes.iter()
    }

    pub fn definition(&self, regime: TaxRegime) -> TaxPlannerResult<&RegimeDefinition> {
        self.regimes
            .iter()
            .find(|d| d.regime == regime)
            .ok_or_else(|| TaxPlannerError::MalformedRegime {
                regime: regime.to_string(),
                reason: format!(
                    "regime missing from the {} table",
                    self.assessment_year
                ),
            })
    }

    /// Check the partition invariant on every regime: slabs must cover
    /// `[0, ∞)` contiguously in strictly ascending order with rates in
    /// `[0, 1]`. A failure is a configuration defect, not a user error.
    pub fn validate(&self) -> TaxPlannerResult<()> {
        for definition in &self.regimes {
            validate_definition(definition)?;
        }
        for (i, definition) in self.regimes.iter().enumerate() {
            if self.regimes[i + 1..]
                .iter()
                .any(|d| d.regime == definition.regime)
            {
                return Err(TaxPlannerError::MalformedRegime {
                    regime: definition.regime.to_string(),
                    reason: "regime appears more than once in the table".into(),
                });
            }
        }
        Ok(())
    }
}

fn validate_definition(definition: &RegimeDefinition) -> TaxPlannerResult<()> {
    let fail = |reason: String| {
        Err(TaxPlannerError::MalformedRegime {
            regime: definition.regime.to_string(),
            reason,
        })
    };

    let first = match definition.slabs.first() {
        Some(slab) => slab,
        None => return fail("slab ladder is empty".into()),
    };
    if !first.min.is_zero() {
        return fail(format!("first slab starts at {}, not 0", first.min));
    }

    for slab in &definition.slabs {
        if slab.rate < Decimal::ZERO || slab.rate > Decimal::ONE {
            return fail(format!("slab rate {} outside [0, 1]", slab.rate));
        }
        if let Some(max) = slab.max {
            if max <= slab.min {
                return fail(format!("slab [{}, {}) is empty or inverted", slab.min, max));
            }
        }
    }

    for pair in definition.slabs.windows(2) {
        match pair[0].max {
            Some(max) if max == pair[1].min => {}
            Some(max) => {
                return fail(format!(
                    "gap or overlap between slabs: [{}, {}) then min {}",
                    pair[0].min, max, pair[1].min
                ));
            }
            None => return fail("unbounded slab is not the last slab".into()),
        }
    }

    if definition
        .slabs
        .last()
        .is_some_and(|slab| slab.max.is_some())
    {
        return fail("last slab must be unbounded".into());
    }

    if definition.standard_deduction < Decimal::ZERO {
        return fail("standard deduction cannot be negative".into());
    }
    if let Some(rebate) = &definition.rebate {
        if rebate.income_ceiling < Decimal::ZERO || rebate.max_rebate < Decimal::ZERO {
            return fail("rebate rule cannot carry negative amounts".into());
        }
    }

    Ok(())
}

fn slab(min: Money, max: Option<Money>, rate: Rate) -> Slab {
    Slab { min, max, rate }
}

fn old_regime() -> RegimeDefinition {
    RegimeDefinition {
        regime: TaxRegime::Old,
        slabs: vec![
            slab(dec!(0), Some(dec!(250_000)), dec!(0)),
            slab(dec!(250_000), Some(dec!(500_000)), dec!(0.05)),
            slab(dec!(500_000), Some(dec!(1_000_000)), dec!(0.20)),
            slab(dec!(1_000_000), None, dec!(0.30)),
        ],
        standard_deduction: STANDARD_DEDUCTION,
        rebate: Some(RebateRule {
            income_ceiling: dec!(500_000),
            max_rebate: dec!(12_500),
        }),
        itemized_deductions: true,
    }
}

fn new_regime_slabs() -> Vec<Slab> {
    vec![
        slab(dec!(0), Some(dec!(300_000)), dec!(0)),
        slab(dec!(300_000), Some(dec!(600_000)), dec!(0.05)),
        slab(dec!(600_000), Some(dec!(900_000)), dec!(0.10)),
        slab(dec!(900_000), Some(dec!(1_200_000)), dec!(0.15)),
        slab(dec!(1_200_000), Some(dec!(1_500_000)), dec!(0.20)),
        slab(dec!(1_500_000), None, dec!(0.30)),
    ]
}

fn new_regime() -> RegimeDefinition {
    RegimeDefinition {
        regime: TaxRegime::New,
        slabs: new_regime_slabs(),
        standard_deduction: STANDARD_DEDUCTION,
        rebate: Some(RebateRule {
            income_ceiling: dec!(700_000),
            max_rebate: dec!(25_000),
        }),
        itemized_deductions: false,
    }
}

fn revised_regime() -> RegimeDefinition {
    RegimeDefinition {
        regime: TaxRegime::Revised,
        ..new_regime()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_law_table_is_well_formed() {
        let table = RegimeTable::current_law();
        table.validate().unwrap();
        assert_eq!(table.assessment_year(), CURRENT_ASSESSMENT_YEAR);
        assert_eq!(table.regimes().count(), 3);
    }

    #[test]
    fn only_the_old_regime_permits_itemized_deductions() {
        let table = RegimeTable::current_law();
        assert!(table.definition(TaxRegime::Old).unwrap().itemized_deductions);
        assert!(!table.definition(TaxRegime::New).unwrap().itemized_deductions);
        assert!(
            !table
                .definition(TaxRegime::Revised)
                .unwrap()
                .itemized_deductions
        );
    }

    #[test]
    fn rebate_rules_match_current_law() {
        let table = RegimeTable::current_law();
        let old = table.definition(TaxRegime::Old).unwrap();
        let new = table.definition(TaxRegime::New).unwrap();
        let old_rebate = old.rebate.as_ref().unwrap();
        let new_rebate = new.rebate.as_ref().unwrap();
        assert_eq!(old_rebate.income_ceiling, dec!(500_000));
        assert_eq!(old_rebate.max_rebate, dec!(12_500));
        assert_eq!(new_rebate.income_ceiling, dec!(700_000));
        assert_eq!(new_rebate.max_rebate, dec!(25_000));
    }

    #[test]
    fn unknown_assessment_year_is_rejected() {
        let err = RegimeTable::for_year("2031-32").unwrap_err();
        assert!(matches!(err, TaxPlannerError::UnknownAssessmentYear(_)));
    }

    #[test]
    fn validate_rejects_a_gap_between_slabs() {
        let mut table = RegimeTable::current_law();
        table.regimes[0].slabs[1].min = dec!(260_000);
        let err = table.validate().unwrap_err();
        assert!(matches!(err, TaxPlannerError::MalformedRegime { .. }));
    }

    #[test]
    fn validate_rejects_an_overlap() {
        let mut table = RegimeTable::current_law();
        table.regimes[1].slabs[2].min = dec!(550_000);
        assert!(table.validate().is_err());
    }

    #[test]
    fn validate_rejects_a_bounded_top_slab() {
        let mut table = RegimeTable::current_law();
        let last = table.regimes[0].slabs.last_mut().unwrap();
        last.max = Some(dec!(99_000_000));
        assert!(table.validate().is_err());
    }

    #[test]
    fn validate_rejects_a_rate_above_one() {
        let mut table = RegimeTable::current_law();
        table.regimes[2].slabs[0].rate = dec!(1.5);
        assert!(table.validate().is_err());
    }

    #[test]
    fn validate_rejects_a_ladder_not_anchored_at_zero() {
        let mut table = RegimeTable::current_law();
        table.regimes[0].slabs[0].min = dec!(1);
        assert!(table.validate().is_err());
    }
}
