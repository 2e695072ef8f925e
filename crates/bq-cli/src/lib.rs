//! bq-cli: Terminal front end for the biquad designer
//!
//! Parses text input, runs derivation and evaluation, and renders the
//! coefficients and response curve.

pub mod display;
pub mod input;
pub mod plot;
pub mod session;

use bq_core::{CalcResult, FilterParameters};
use bq_dsp::{BiquadCoefficients, FrequencyResponse, ResponseConfig, derive, evaluate_with};

/// One complete calculation
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub params: FilterParameters,
    pub coefficients: BiquadCoefficients,
    pub response: FrequencyResponse,
}

/// Derive coefficients, then evaluate them on `config`'s grid
pub fn calculate(params: &FilterParameters, config: &ResponseConfig) -> CalcResult<Calculation> {
    config.validate()?;
    let coefficients = derive(params)?;
    let response = evaluate_with(&coefficients.normalized, config);

    Ok(Calculation {
        params: *params,
        coefficients,
        response,
    })
}

/// Plot heading, as in "Biquad Filter Frequency Response - Low Shelf"
pub fn plot_title(params: &FilterParameters) -> String {
    format!("Biquad Filter Frequency Response - {}", params.filter_type.title())
}
