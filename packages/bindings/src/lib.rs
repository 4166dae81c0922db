use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Tax computation
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_tax(input_json: String) -> NapiResult<String> {
    let mut input: tax_planner_core::engine::TaxComputationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    // The UI owns form parsing; statutory ceilings are enforced here so the
    // engine only ever sees clamped values.
    input.deductions = input.deductions.clamp_to_ceilings();
    let output = tax_planner_core::engine::compute_tax(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_regimes(input_json: String) -> NapiResult<String> {
    let mut input: tax_planner_core::comparison::RegimeComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    input.deductions = input.deductions.clamp_to_ceilings();
    let output = tax_planner_core::comparison::compare_regimes(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

#[napi]
pub fn generate_recommendations(input_json: String) -> NapiResult<String> {
    let mut input: tax_planner_core::recommendations::RecommendationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    input.deductions = input.deductions.clamp_to_ceilings();
    let output = tax_planner_core::recommendations::generate_recommendations(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
