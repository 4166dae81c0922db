use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
/// Amounts are whole-rupee denominated.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages,
/// except where a field is explicitly documented as a percentage.
pub type Rate = Decimal;

/// Statutory ceiling on Section 80C investments (PPF, ELSS, EPF, ...).
pub const SECTION_80C_CEILING: Money = dec!(150_000);

/// Statutory ceiling on Section 80D health insurance premium (base limit).
pub const SECTION_80D_CEILING: Money = dec!(25_000);

/// Advisory ceiling on HRA exemption used for clamping and headroom checks.
pub const HRA_CEILING: Money = dec!(50_000);

/// Statutory ceiling on additional NPS contribution under Section 80CCD(1B).
pub const NPS_CEILING: Money = dec!(50_000);

/// Standard deduction granted to all salaried taxpayers.
pub const STANDARD_DEDUCTION: Money = dec!(50_000);

/// Statutory regime identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxRegime {
    Old,
    New,
    Revised,
}

impl TaxRegime {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxRegime::Old => "old",
            TaxRegime::New => "new",
            TaxRegime::Revised => "revised",
        }
    }
}

impl std::fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Annual income, decomposed into its additive components.
///
/// The capital-gains components may be negative (carried losses). Note that
/// capital gains fold into ordinary slab income here, matching the behaviour
/// of the surrounding application; statutory special rates for capital gains
/// are an acknowledged approximation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub basic_salary: Money,
    pub variable_pay: Money,
    pub other_income: Money,
    #[serde(default)]
    pub house_property_income: Money,
    #[serde(default)]
    pub long_term_capital_gains: Money,
    #[serde(default)]
    pub short_term_capital_gains: Money,
}

impl IncomeRecord {
    /// Signed sum of all components. The engine floors the aggregate at
    /// zero before slab traversal; individual components are not floored.
    pub fn gross_total(&self) -> Money {
        self.basic_salary
            + self.variable_pay
            + self.other_income
            + self.house_property_income
            + self.long_term_capital_gains
            + self.short_term_capital_gains
    }
}

/// Itemized deductions and exemptions. All fields are non-negative amounts
/// the caller has already clamped to their statutory ceilings; the engine
/// does not re-clamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionRecord {
    #[serde(default)]
    pub section_80c: Money,
    #[serde(default)]
    pub section_80d: Money,
    #[serde(default)]
    pub hra_exemption: Money,
    #[serde(default)]
    pub lta_exemption: Money,
    #[serde(default)]
    pub nps_contribution: Money,
    #[serde(default = "default_standard_deduction")]
    pub standard_deduction: Money,
    #[serde(default)]
    pub other_deductions: Money,
}

fn default_standard_deduction() -> Money {
    STANDARD_DEDUCTION
}

impl Default for DeductionRecord {
    fn default() -> Self {
        DeductionRecord {
            section_80c: Decimal::ZERO,
            section_80d: Decimal::ZERO,
            hra_exemption: Decimal::ZERO,
            lta_exemption: Decimal::ZERO,
            nps_contribution: Decimal::ZERO,
            standard_deduction: STANDARD_DEDUCTION,
            other_deductions: Decimal::ZERO,
        }
    }
}

impl DeductionRecord {
    /// Sum of every field, standard deduction included. Only itemized
    /// regimes subtract this total.
    pub fn itemized_total(&self) -> Money {
        self.section_80c
            + self.section_80d
            + self.hra_exemption
            + self.lta_exemption
            + self.nps_contribution
            + self.standard_deduction
            + self.other_deductions
    }

    /// Caller-side clamp to statutory ceilings. The adapters apply this at
    /// the input boundary; LTA and other deductions carry no ceiling.
    pub fn clamp_to_ceilings(&self) -> DeductionRecord {
        DeductionRecord {
            section_80c: self.section_80c.min(SECTION_80C_CEILING),
            section_80d: self.section_80d.min(SECTION_80D_CEILING),
            hra_exemption: self.hra_exemption.min(HRA_CEILING),
            lta_exemption: self.lta_exemption,
            nps_contribution: self.nps_contribution.min(NPS_CEILING),
            standard_deduction: self.standard_deduction.min(STANDARD_DEDUCTION),
            other_deductions: self.other_deductions,
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
