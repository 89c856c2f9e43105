use napi::Result as NapiResult;
use napi_derive::napi;

use mortgage_eligibility_core::application::intake::{self, MortgageApplication};
use mortgage_eligibility_core::eligibility::evaluator::{self, MortgageInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[napi]
pub fn evaluate_mortgage(input_json: String) -> NapiResult<String> {
    let input: MortgageInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = evaluator::evaluate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn evaluate_application(application_json: String) -> NapiResult<String> {
    let application: MortgageApplication =
        serde_json::from_str(&application_json).map_err(to_napi_error)?;
    let output = intake::evaluate_application(&application).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Parse raw form strings (as collected by the page) into an application.
#[napi]
pub fn parse_application_form(fields_json: String) -> NapiResult<String> {
    let fields: std::collections::HashMap<String, String> =
        serde_json::from_str(&fields_json).map_err(to_napi_error)?;
    let application = MortgageApplication::from_form(&fields).map_err(to_napi_error)?;
    serde_json::to_string(&application).map_err(to_napi_error)
}
