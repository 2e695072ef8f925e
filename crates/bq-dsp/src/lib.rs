//! bq-dsp: Biquad design for the filter calculator
//!
//! ## Modules
//! - `biquad` - coefficient derivation (peaking, low shelf, high shelf)
//! - `response` - magnitude response on a log-spaced frequency grid
//!
//! Both are stateless: parameters in, coefficients or a curve out.

pub mod biquad;
pub mod response;

pub use biquad::{BiquadCoefficients, NormalizedBiquadCoeffs, RawBiquadCoeffs, derive};
pub use response::{FrequencyResponse, ResponseConfig, evaluate, evaluate_with};
