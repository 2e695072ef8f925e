//! Text input parsing
//!
//! Fields arrive as raw strings (command-line values or `key=value` edits in
//! the interactive session) and are parsed into [`FilterParameters`]. Parse
//! failures are reported as [`InputError`], separate from calculation errors.

use bq_core::{FilterParameters, FilterType, UnknownFilterType};
use thiserror::Error;

/// Text input error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("{field}: '{value}' is not a number")]
    InvalidNumber { field: &'static str, value: String },

    #[error(transparent)]
    UnknownFilterType(#[from] UnknownFilterType),

    #[error("unknown field '{0}' (expected type, freq, gain, q, output or rate)")]
    UnknownField(String),

    #[error("malformed edit '{0}' (expected key=value)")]
    MalformedEdit(String),
}

/// Unparsed form fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParameters {
    pub filter_type: String,
    pub frequency: String,
    pub boost_cut: String,
    pub q: String,
    pub output_gain: String,
    pub sample_rate: String,
}

impl Default for RawParameters {
    fn default() -> Self {
        Self::from(&FilterParameters::default())
    }
}

impl From<&FilterParameters> for RawParameters {
    fn from(params: &FilterParameters) -> Self {
        Self {
            filter_type: params.filter_type.id().to_string(),
            frequency: params.frequency_hz.to_string(),
            boost_cut: params.boost_cut_db.to_string(),
            q: params.q.to_string(),
            output_gain: params.output_gain_db.to_string(),
            sample_rate: params.sample_rate_hz.to_string(),
        }
    }
}

impl RawParameters {
    /// Parse every field
    pub fn parse(&self) -> Result<FilterParameters, InputError> {
        Ok(FilterParameters {
            filter_type: self.filter_type.parse::<FilterType>()?,
            frequency_hz: parse_number("freq", &self.frequency)?,
            boost_cut_db: parse_number("gain", &self.boost_cut)?,
            q: parse_number("q", &self.q)?,
            output_gain_db: parse_number("output", &self.output_gain)?,
            sample_rate_hz: parse_number("rate", &self.sample_rate)?,
        })
    }

    /// Set a single field by key. The value is stored unparsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), InputError> {
        let slot = match key.trim().to_ascii_lowercase().as_str() {
            "type" | "filter" | "filter_type" => &mut self.filter_type,
            "freq" | "frequency" | "f" => &mut self.frequency,
            "gain" | "boost" | "boost_cut" | "db" => &mut self.boost_cut,
            "q" => &mut self.q,
            "output" | "output_gain" | "out" => &mut self.output_gain,
            "rate" | "sample_rate" | "fs" => &mut self.sample_rate,
            _ => return Err(InputError::UnknownField(key.to_string())),
        };
        *slot = value.trim().to_string();
        Ok(())
    }

    /// Apply whitespace-separated `key=value` edits.
    ///
    /// Either every edit applies or none does.
    pub fn apply_edits(&mut self, line: &str) -> Result<(), InputError> {
        let mut next = self.clone();
        for token in line.split_whitespace() {
            let (key, value) = token
                .split_once('=')
                .ok_or_else(|| InputError::MalformedEdit(token.to_string()))?;
            if key.is_empty() || value.is_empty() {
                return Err(InputError::MalformedEdit(token.to_string()));
            }
            next.set(key, value)?;
        }
        *self = next;
        Ok(())
    }
}

/// Parse a numeric field; surrounding whitespace is ignored
pub fn parse_number(field: &'static str, value: &str) -> Result<f64, InputError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| InputError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}
