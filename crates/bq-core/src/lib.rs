//! bq-core: Shared types for the biquad designer
//!
//! Parameter structs, filter shapes, errors and decibel helpers used by
//! `bq-dsp` and the terminal front end.

mod error;
mod params;

pub use error::*;
pub use params::*;

/// Sample rate used when none is given
pub const DEFAULT_SAMPLE_RATE: f64 = 48000.0;

/// Lowest magnitude reported by the response evaluator
pub const DEFAULT_FLOOR_DB: f64 = -300.0;

/// Highest magnitude reported by the response evaluator
pub const DEFAULT_CEILING_DB: f64 = 300.0;

/// Decibel value wrapper
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Decibels(pub f64);

impl Decibels {
    pub const ZERO: Self = Self(0.0);

    /// Convert a linear amplitude, clamping to `floor_db..=ceiling_db`.
    /// Zero, negative and NaN gains land on the floor, infinite gain on the
    /// ceiling.
    #[inline]
    pub fn from_gain(gain: f64, floor_db: f64, ceiling_db: f64) -> Self {
        let db = 20.0 * gain.log10();
        if db.is_nan() || db < floor_db {
            Self(floor_db)
        } else if db > ceiling_db {
            Self(ceiling_db)
        } else {
            Self(db)
        }
    }

    /// Linear amplitude, 10^(dB/20)
    #[inline]
    pub fn to_gain(self) -> f64 {
        10.0_f64.powf(self.0 / 20.0)
    }

    /// Shelf/peak amplitude A, 10^(dB/40)
    #[inline]
    pub fn to_shelf_amplitude(self) -> f64 {
        10.0_f64.powf(self.0 / 40.0)
    }
}

impl Default for Decibels {
    fn default() -> Self {
        Self::ZERO
    }
}
