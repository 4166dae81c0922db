use clap::Args;
use serde_json::Value;

use tax_planner_core::engine::{self, TaxComputationInput};

use super::{DeductionArgs, IncomeArgs, RegimeArg};
use crate::input;

/// Arguments for a single-regime tax computation
#[derive(Args)]
pub struct ComputeArgs {
    /// Regime to compute under
    #[arg(long, value_enum)]
    pub regime: Option<RegimeArg>,

    /// Assessment year (defaults to current law)
    #[arg(long)]
    pub year: Option<String>,

    #[command(flatten)]
    pub income: IncomeArgs,

    #[command(flatten)]
    pub deductions: DeductionArgs,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compute(args: ComputeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut computation: TaxComputationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        TaxComputationInput {
            assessment_year: args.year.clone(),
            income: args.income.to_record()?,
            deductions: args.deductions.to_record(),
            regime: args
                .regime
                .ok_or("--regime is required (or provide --input)")?
                .into(),
        }
    };

    // Ceilings are enforced at this boundary; the engine assumes clamped
    // values and never re-clamps.
    computation.deductions = computation.deductions.clamp_to_ceilings();

    let result = engine::compute_tax(&computation)?;
    Ok(serde_json::to_value(result)?)
}
