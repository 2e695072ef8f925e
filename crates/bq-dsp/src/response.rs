//! Magnitude response of a biquad on a log-spaced frequency grid

use std::f64::consts::PI;

use bq_core::{
    CalcError, CalcResult, DEFAULT_CEILING_DB, DEFAULT_FLOOR_DB, DEFAULT_SAMPLE_RATE, Decibels,
};
use num_complex::Complex64;
use serde::Serialize;

use crate::biquad::NormalizedBiquadCoeffs;

/// Lowest frequency of the default grid
pub const DEFAULT_MIN_FREQ_HZ: f64 = 20.0;

/// Default grid resolution
pub const DEFAULT_POINT_COUNT: usize = 1000;

/// Grid and clamp settings for response evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseConfig {
    pub sample_rate_hz: f64,
    pub point_count: usize,
    pub min_freq_hz: f64,
    /// `None` means Nyquist
    pub max_freq_hz: Option<f64>,
    /// Magnitudes below this are clamped
    pub floor_db: f64,
    /// Magnitudes above this are clamped
    pub ceiling_db: f64,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: DEFAULT_SAMPLE_RATE,
            point_count: DEFAULT_POINT_COUNT,
            min_freq_hz: DEFAULT_MIN_FREQ_HZ,
            max_freq_hz: None,
            floor_db: DEFAULT_FLOOR_DB,
            ceiling_db: DEFAULT_CEILING_DB,
        }
    }
}

impl ResponseConfig {
    pub fn new(sample_rate_hz: f64) -> Self {
        Self {
            sample_rate_hz,
            ..Default::default()
        }
    }

    /// Coarse grid for terminal plots
    pub fn preview(sample_rate_hz: f64) -> Self {
        Self {
            sample_rate_hz,
            point_count: 200,
            ..Default::default()
        }
    }

    pub fn with_point_count(mut self, point_count: usize) -> Self {
        self.point_count = point_count;
        self
    }

    pub fn with_range(mut self, min_freq_hz: f64, max_freq_hz: f64) -> Self {
        self.min_freq_hz = min_freq_hz;
        self.max_freq_hz = Some(max_freq_hz);
        self
    }

    pub fn with_floor(mut self, floor_db: f64) -> Self {
        self.floor_db = floor_db;
        self
    }

    pub fn with_ceiling(mut self, ceiling_db: f64) -> Self {
        self.ceiling_db = ceiling_db;
        self
    }

    /// Upper grid bound, Nyquist unless overridden
    pub fn max_freq(&self) -> f64 {
        self.max_freq_hz.unwrap_or(self.sample_rate_hz / 2.0)
    }

    pub fn validate(&self) -> CalcResult<()> {
        if !self.sample_rate_hz.is_finite() || self.sample_rate_hz <= 0.0 {
            return Err(CalcError::invalid(format!(
                "sample rate must be positive and finite, got {}",
                self.sample_rate_hz
            )));
        }
        let max = self.max_freq();
        if !self.min_freq_hz.is_finite() || self.min_freq_hz <= 0.0 {
            return Err(CalcError::invalid(format!(
                "minimum frequency must be positive, got {}",
                self.min_freq_hz
            )));
        }
        if !max.is_finite() || max <= self.min_freq_hz {
            return Err(CalcError::invalid(format!(
                "maximum frequency {} must exceed minimum {}",
                max, self.min_freq_hz
            )));
        }
        if max > self.sample_rate_hz / 2.0 {
            return Err(CalcError::invalid(format!(
                "maximum frequency {} is above Nyquist ({})",
                max,
                self.sample_rate_hz / 2.0
            )));
        }
        if self.floor_db.is_nan() || self.ceiling_db.is_nan() {
            return Err(CalcError::invalid("floor and ceiling must be numbers"));
        }
        if self.ceiling_db < self.floor_db {
            return Err(CalcError::invalid(format!(
                "ceiling {} dB is below floor {} dB",
                self.ceiling_db, self.floor_db
            )));
        }
        Ok(())
    }
}

/// Sampled magnitude response
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FrequencyResponse {
    pub frequencies_hz: Vec<f64>,
    pub magnitude_db: Vec<f64>,
}

/// Evaluate `coeffs` on `point_count` log-spaced frequencies from
/// `min_freq_hz` to `max_freq_hz` inclusive.
///
/// Magnitudes are clamped to [`DEFAULT_FLOOR_DB`]..=[`DEFAULT_CEILING_DB`],
/// so a zero on the unit circle reads as the floor and a pole as the ceiling.
pub fn evaluate(
    coeffs: &NormalizedBiquadCoeffs,
    sample_rate_hz: f64,
    point_count: usize,
    min_freq_hz: f64,
    max_freq_hz: f64,
) -> FrequencyResponse {
    let frequencies_hz = log_grid(min_freq_hz, max_freq_hz, point_count);
    let magnitude_db = frequencies_hz
        .iter()
        .map(|&freq| {
            magnitude_db(
                coeffs,
                freq,
                sample_rate_hz,
                DEFAULT_FLOOR_DB,
                DEFAULT_CEILING_DB,
            )
        })
        .collect();

    FrequencyResponse {
        frequencies_hz,
        magnitude_db,
    }
}

/// Evaluate with a [`ResponseConfig`]
pub fn evaluate_with(coeffs: &NormalizedBiquadCoeffs, config: &ResponseConfig) -> FrequencyResponse {
    let frequencies_hz = log_grid(config.min_freq_hz, config.max_freq(), config.point_count);
    let magnitude_db = frequencies_hz
        .iter()
        .map(|&freq| {
            magnitude_db(
                coeffs,
                freq,
                config.sample_rate_hz,
                config.floor_db,
                config.ceiling_db,
            )
        })
        .collect();

    FrequencyResponse {
        frequencies_hz,
        magnitude_db,
    }
}

/// Log10-spaced grid, endpoints exact
pub fn log_grid(min_freq_hz: f64, max_freq_hz: f64, point_count: usize) -> Vec<f64> {
    match point_count {
        0 => Vec::new(),
        1 => vec![min_freq_hz],
        n => {
            let log_min = min_freq_hz.log10();
            let log_max = max_freq_hz.log10();
            let last = n - 1;

            (0..n)
                .map(|i| {
                    if i == 0 {
                        min_freq_hz
                    } else if i == last {
                        max_freq_hz
                    } else {
                        let t = i as f64 / last as f64;
                        10.0_f64.powf(log_min + t * (log_max - log_min))
                    }
                })
                .collect()
        }
    }
}

/// Numerator and denominator polynomials at z = e^(jω)
fn polynomials(coeffs: &NormalizedBiquadCoeffs, omega: f64) -> (Complex64, Complex64) {
    let z_inv = Complex64::from_polar(1.0, -omega);
    let z_inv2 = Complex64::from_polar(1.0, -2.0 * omega);

    let num = coeffs.b0 + coeffs.b1 * z_inv + coeffs.b2 * z_inv2;
    let den = 1.0 + coeffs.a1 * z_inv + coeffs.a2 * z_inv2;
    (num, den)
}

/// H(z) = (b0 + b1·z⁻¹ + b2·z⁻²) / (1 + a1·z⁻¹ + a2·z⁻²) at z = e^(jω)
pub fn transfer_function(coeffs: &NormalizedBiquadCoeffs, omega: f64) -> Complex64 {
    let (num, den) = polynomials(coeffs, omega);
    num / den
}

/// |H(e^(jω))| as |num| / |den|. A pole on the unit circle gives +inf
/// rather than the NaN of a complex 0/0.
pub fn transfer_magnitude(coeffs: &NormalizedBiquadCoeffs, omega: f64) -> f64 {
    let (num, den) = polynomials(coeffs, omega);
    num.norm() / den.norm()
}

/// Magnitude in dB at `freq`, clamped to `floor_db..=ceiling_db`
pub fn magnitude_db(
    coeffs: &NormalizedBiquadCoeffs,
    freq: f64,
    sample_rate_hz: f64,
    floor_db: f64,
    ceiling_db: f64,
) -> f64 {
    let omega = 2.0 * PI * freq / sample_rate_hz;
    Decibels::from_gain(transfer_magnitude(coeffs, omega), floor_db, ceiling_db).0
}

impl NormalizedBiquadCoeffs {
    /// Single-point magnitude, clamped to the default floor and ceiling
    pub fn magnitude_db_at(&self, freq: f64, sample_rate_hz: f64) -> f64 {
        magnitude_db(self, freq, sample_rate_hz, DEFAULT_FLOOR_DB, DEFAULT_CEILING_DB)
    }
}

impl FrequencyResponse {
    #[inline]
    pub fn len(&self) -> usize {
        self.frequencies_hz.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frequencies_hz.is_empty()
    }

    /// (frequency, dB) pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies_hz
            .iter()
            .copied()
            .zip(self.magnitude_db.iter().copied())
    }

    /// Index of the sample closest to `freq` on a log scale
    pub fn nearest_index(&self, freq: f64) -> Option<usize> {
        if freq <= 0.0 || !freq.is_finite() {
            return None;
        }
        let target = freq.ln();
        self.frequencies_hz
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (a.ln() - target).abs().total_cmp(&(b.ln() - target).abs())
            })
            .map(|(i, _)| i)
    }

    /// Magnitude of the sample closest to `freq`
    pub fn magnitude_at(&self, freq: f64) -> Option<f64> {
        self.nearest_index(freq).map(|i| self.magnitude_db[i])
    }

    /// (frequency, dB) of the maximum
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.iter().max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// (frequency, dB) of the minimum
    pub fn trough(&self) -> Option<(f64, f64)> {
        self.iter().min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Edges of the contiguous region around the extremum that stays beyond
    /// `level_db`: at or above it for a positive level (around the peak), at
    /// or below it for a negative level (around the trough).
    ///
    /// Edges are interpolated linearly in log frequency between grid samples.
    /// Returns `None` if the region touches either end of the grid.
    pub fn band_edges(&self, level_db: f64) -> Option<(f64, f64)> {
        let boost = level_db >= 0.0;
        let (center_freq, _) = if boost { self.peak()? } else { self.trough()? };
        let center = self.nearest_index(center_freq)?;
        let inside = |db: f64| if boost { db >= level_db } else { db <= level_db };

        if !inside(self.magnitude_db[center]) {
            return None;
        }

        let mut lo = center;
        while lo > 0 && inside(self.magnitude_db[lo - 1]) {
            lo -= 1;
        }
        let mut hi = center;
        while hi + 1 < self.len() && inside(self.magnitude_db[hi + 1]) {
            hi += 1;
        }
        if lo == 0 || hi + 1 == self.len() {
            return None;
        }

        Some((
            self.crossing(lo - 1, lo, level_db),
            self.crossing(hi, hi + 1, level_db),
        ))
    }

    /// Width in Hz of [`band_edges`](Self::band_edges)
    pub fn bandwidth_at(&self, level_db: f64) -> Option<f64> {
        self.band_edges(level_db).map(|(lo, hi)| hi - lo)
    }

    fn crossing(&self, i: usize, j: usize, level_db: f64) -> f64 {
        let (f0, f1) = (self.frequencies_hz[i], self.frequencies_hz[j]);
        let (m0, m1) = (self.magnitude_db[i], self.magnitude_db[j]);
        if m1 == m0 {
            return f0;
        }
        let t = ((level_db - m0) / (m1 - m0)).clamp(0.0, 1.0);
        (f0.ln() + t * (f1.ln() - f0.ln())).exp()
    }
}
