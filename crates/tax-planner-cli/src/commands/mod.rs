pub mod compare;
pub mod compute;
pub mod recommend;

use clap::{Args, ValueEnum};
use rust_decimal::Decimal;

use tax_planner_core::types::{DeductionRecord, IncomeRecord, TaxRegime, STANDARD_DEDUCTION};

/// Regime selector for the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RegimeArg {
    Old,
    New,
    Revised,
}

impl From<RegimeArg> for TaxRegime {
    fn from(arg: RegimeArg) -> Self {
        match arg {
            RegimeArg::Old => TaxRegime::Old,
            RegimeArg::New => TaxRegime::New,
            RegimeArg::Revised => TaxRegime::Revised,
        }
    }
}

/// Income component flags shared by every subcommand.
#[derive(Args)]
pub struct IncomeArgs {
    /// Annual basic salary
    #[arg(long)]
    pub basic_salary: Option<Decimal>,

    /// Variable pay, bonuses, and other performance-linked compensation
    #[arg(long)]
    pub variable_pay: Option<Decimal>,

    /// Other taxable income (interest, rental, dividends, ...)
    #[arg(long)]
    pub other_income: Option<Decimal>,

    /// Income from house property
    #[arg(long)]
    pub house_property: Option<Decimal>,

    /// Long-term capital gains; negative values are carried losses
    #[arg(long, allow_hyphen_values = true)]
    pub ltcg: Option<Decimal>,

    /// Short-term capital gains; negative values are carried losses
    #[arg(long, allow_hyphen_values = true)]
    pub stcg: Option<Decimal>,
}

impl IncomeArgs {
    pub fn to_record(&self) -> Result<IncomeRecord, Box<dyn std::error::Error>> {
        Ok(IncomeRecord {
            basic_salary: self
                .basic_salary
                .ok_or("--basic-salary is required (or provide --input)")?,
            variable_pay: self.variable_pay.unwrap_or_default(),
            other_income: self.other_income.unwrap_or_default(),
            house_property_income: self.house_property.unwrap_or_default(),
            long_term_capital_gains: self.ltcg.unwrap_or_default(),
            short_term_capital_gains: self.stcg.unwrap_or_default(),
        })
    }
}

/// Deduction flags shared by every subcommand. Values are clamped to their
/// statutory ceilings before they reach the core.
#[derive(Args)]
pub struct DeductionArgs {
    /// Section 80C investments (PPF, ELSS, EPF, life insurance premium)
    #[arg(long)]
    pub section_80c: Option<Decimal>,

    /// Section 80D health insurance premium
    #[arg(long)]
    pub section_80d: Option<Decimal>,

    /// HRA exemption
    #[arg(long)]
    pub hra: Option<Decimal>,

    /// Leave-travel allowance exemption
    #[arg(long)]
    pub lta: Option<Decimal>,

    /// Additional NPS contribution under Section 80CCD(1B)
    #[arg(long)]
    pub nps: Option<Decimal>,

    /// Standard deduction
    #[arg(long)]
    pub standard_deduction: Option<Decimal>,

    /// Other eligible deductions (80E, 80G, ...)
    #[arg(long)]
    pub other_deductions: Option<Decimal>,
}

impl DeductionArgs {
    pub fn to_record(&self) -> DeductionRecord {
        DeductionRecord {
            section_80c: self.section_80c.unwrap_or_default(),
            section_80d: self.section_80d.unwrap_or_default(),
            hra_exemption: self.hra.unwrap_or_default(),
            lta_exemption: self.lta.unwrap_or_default(),
            nps_contribution: self.nps.unwrap_or_default(),
            standard_deduction: self.standard_deduction.unwrap_or(STANDARD_DEDUCTION),
            other_deductions: self.other_deductions.unwrap_or_default(),
        }
    }
}
