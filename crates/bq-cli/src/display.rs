//! Text, CSV and JSON output of a calculation

use std::fmt::Write as _;

use bq_dsp::NormalizedBiquadCoeffs;
use clap::ValueEnum;
use serde::Serialize;

use crate::Calculation;

/// Output format for one-shot calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

/// Coefficient labels, six decimals, in display order
pub fn coefficient_rows(coeffs: &NormalizedBiquadCoeffs) -> [(&'static str, String); 5] {
    [
        ("b0", format!("{:.6}", coeffs.b0)),
        ("b1", format!("{:.6}", coeffs.b1)),
        ("b2", format!("{:.6}", coeffs.b2)),
        ("a1", format!("{:.6}", coeffs.a1)),
        ("a2", format!("{:.6}", coeffs.a2)),
    ]
}

/// "Filter Coefficients" block
pub fn format_coefficients(coeffs: &NormalizedBiquadCoeffs) -> String {
    let mut out = String::from("Filter Coefficients\n");
    for (name, value) in coefficient_rows(coeffs) {
        let _ = writeln!(out, "  {name}: {value:>12}");
    }
    out
}

/// Summary lines: parameters, peak and trough of the curve
pub fn format_summary(calc: &Calculation) -> String {
    let p = &calc.params;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  {} Hz  {:+} dB  Q {}  output {:+} dB  @ {} Hz",
        p.filter_type.title(),
        p.frequency_hz,
        p.boost_cut_db,
        p.q,
        p.output_gain_db,
        p.sample_rate_hz
    );
    if let Some((freq, db)) = calc.response.peak() {
        let _ = writeln!(out, "  max {db:+.2} dB at {freq:.1} Hz");
    }
    if let Some((freq, db)) = calc.response.trough() {
        let _ = writeln!(out, "  min {db:+.2} dB at {freq:.1} Hz");
    }
    out
}

/// Response as `frequency_hz,magnitude_db` lines with a header
pub fn format_csv(calc: &Calculation) -> String {
    let mut out = String::from("frequency_hz,magnitude_db\n");
    for (freq, db) in calc.response.iter() {
        let _ = writeln!(out, "{freq:.6},{db:.6}");
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    parameters: &'a bq_core::FilterParameters,
    coefficients: &'a bq_dsp::BiquadCoefficients,
    response: &'a bq_dsp::FrequencyResponse,
}

/// Pretty JSON of parameters, both coefficient forms and the curve
pub fn format_json(calc: &Calculation) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        parameters: &calc.params,
        coefficients: &calc.coefficients,
        response: &calc.response,
    })
}
