//! Filter parameter types

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::{CalcError, CalcResult, DEFAULT_SAMPLE_RATE};

/// Filter shapes supported by the designer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    #[default]
    Parametric,
    LowShelf,
    HighShelf,
}

impl FilterType {
    pub const ALL: [FilterType; 3] = [Self::Parametric, Self::LowShelf, Self::HighShelf];

    /// Identifier as accepted by `from_str`
    pub fn id(self) -> &'static str {
        match self {
            Self::Parametric => "parametric",
            Self::LowShelf => "low_shelf",
            Self::HighShelf => "high_shelf",
        }
    }

    /// Human-readable title ("Low Shelf")
    pub fn title(self) -> &'static str {
        match self {
            Self::Parametric => "Parametric",
            Self::LowShelf => "Low Shelf",
            Self::HighShelf => "High Shelf",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when a filter type identifier is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter type '{0}' (expected parametric, low_shelf or high_shelf)")]
pub struct UnknownFilterType(pub String);

impl FromStr for FilterType {
    type Err = UnknownFilterType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "parametric" | "peaking" | "peak" | "bell" => Ok(Self::Parametric),
            "low_shelf" | "lowshelf" => Ok(Self::LowShelf),
            "high_shelf" | "highshelf" => Ok(Self::HighShelf),
            _ => Err(UnknownFilterType(s.to_string())),
        }
    }
}

/// Parameters for a single coefficient calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterParameters {
    pub filter_type: FilterType,
    /// Center (peaking) or corner (shelf) frequency
    pub frequency_hz: f64,
    /// Gain inside the peak/shelf, may be negative
    pub boost_cut_db: f64,
    /// Resonance for peaking, slope for shelves
    pub q: f64,
    /// Post-derivation gain applied to the feed-forward coefficients only
    pub output_gain_db: f64,
    pub sample_rate_hz: f64,
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self {
            filter_type: FilterType::Parametric,
            frequency_hz: 1000.0,
            boost_cut_db: 6.0,
            q: 0.707,
            output_gain_db: 0.0,
            sample_rate_hz: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl FilterParameters {
    pub fn new(filter_type: FilterType, frequency_hz: f64, boost_cut_db: f64, q: f64) -> Self {
        Self {
            filter_type,
            frequency_hz,
            boost_cut_db,
            q,
            ..Default::default()
        }
    }

    pub fn with_frequency(mut self, frequency_hz: f64) -> Self {
        self.frequency_hz = frequency_hz;
        self
    }

    pub fn with_boost_cut(mut self, boost_cut_db: f64) -> Self {
        self.boost_cut_db = boost_cut_db;
        self
    }

    pub fn with_q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    pub fn with_output_gain(mut self, output_gain_db: f64) -> Self {
        self.output_gain_db = output_gain_db;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate_hz: f64) -> Self {
        self.sample_rate_hz = sample_rate_hz;
        self
    }

    #[inline]
    pub fn nyquist(&self) -> f64 {
        self.sample_rate_hz / 2.0
    }

    /// Normalized angular frequency w0 = 2π·f/fs
    #[inline]
    pub fn omega(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.frequency_hz / self.sample_rate_hz
    }

    /// Check every precondition of coefficient derivation
    pub fn validate(&self) -> CalcResult<()> {
        if !self.sample_rate_hz.is_finite() || self.sample_rate_hz <= 0.0 {
            return Err(CalcError::invalid(format!(
                "sample rate must be positive and finite, got {}",
                self.sample_rate_hz
            )));
        }
        if !self.frequency_hz.is_finite() || self.frequency_hz <= 0.0 {
            return Err(CalcError::invalid(format!(
                "frequency must be positive and finite, got {}",
                self.frequency_hz
            )));
        }
        if self.frequency_hz >= self.nyquist() {
            return Err(CalcError::invalid(format!(
                "frequency {} Hz must be below Nyquist ({} Hz)",
                self.frequency_hz,
                self.nyquist()
            )));
        }
        if !self.q.is_finite() || self.q <= 0.0 {
            return Err(CalcError::invalid(format!(
                "Q must be positive and finite, got {}",
                self.q
            )));
        }
        if !self.boost_cut_db.is_finite() {
            return Err(CalcError::invalid(format!(
                "boost/cut must be finite, got {}",
                self.boost_cut_db
            )));
        }
        if !self.output_gain_db.is_finite() {
            return Err(CalcError::invalid(format!(
                "output gain must be finite, got {}",
                self.output_gain_db
            )));
        }
        Ok(())
    }
}
