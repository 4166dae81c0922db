use clap::Args;
use serde_json::Value;

use tax_planner_core::recommendations::{self, RecommendationInput};

use super::{DeductionArgs, IncomeArgs};
use crate::input;

/// Arguments for deduction-headroom recommendations
#[derive(Args)]
pub struct RecommendArgs {
    #[command(flatten)]
    pub income: IncomeArgs,

    #[command(flatten)]
    pub deductions: DeductionArgs,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_recommend(args: RecommendArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut recommendation_input: RecommendationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        RecommendationInput {
            income: args.income.to_record()?,
            deductions: args.deductions.to_record(),
        }
    };

    recommendation_input.deductions = recommendation_input.deductions.clamp_to_ceilings();

    let result = recommendations::generate_recommendations(&recommendation_input)?;
    Ok(serde_json::to_value(result)?)
}
