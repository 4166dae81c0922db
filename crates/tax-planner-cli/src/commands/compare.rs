use clap::Args;
use serde_json::Value;

use tax_planner_core::comparison::{self, RegimeComparisonInput};

use super::{DeductionArgs, IncomeArgs};
use crate::input;

/// Arguments for a full regime comparison
#[derive(Args)]
pub struct CompareArgs {
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

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut comparison_input: RegimeComparisonInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        RegimeComparisonInput {
            assessment_year: args.year.clone(),
            income: args.income.to_record()?,
            deductions: args.deductions.to_record(),
        }
    };

    comparison_input.deductions = comparison_input.deductions.clamp_to_ceilings();

    let result = comparison::compare_regimes(&comparison_input)?;
    Ok(serde_json::to_value(result)?)
}
