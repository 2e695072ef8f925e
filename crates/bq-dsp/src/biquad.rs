//! Biquad coefficient derivation
//!
//! RBJ cookbook formulas for peaking and shelving filters, with a separate
//! linear output gain folded into the feed-forward coefficients.

use bq_core::{CalcError, CalcResult, Decibels, FilterParameters, FilterType};
use serde::Serialize;

/// Raw (unnormalized) biquad coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawBiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a0: f64,
    pub a1: f64,
    pub a2: f64,
}

/// Biquad coefficients divided through by a0
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedBiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

/// Result of a derivation: both coefficient forms
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BiquadCoefficients {
    pub raw: RawBiquadCoeffs,
    pub normalized: NormalizedBiquadCoeffs,
}

/// Derive coefficients for `params`.
///
/// Validates the parameters, computes the raw coefficients for the selected
/// shape and normalizes them by a0.
pub fn derive(params: &FilterParameters) -> CalcResult<BiquadCoefficients> {
    params.validate()?;

    let w0 = params.omega();
    let gain_linear = Decibels(params.output_gain_db).to_gain();
    if !gain_linear.is_finite() {
        return Err(CalcError::invalid(format!(
            "output gain {} dB overflows",
            params.output_gain_db
        )));
    }

    let a = Decibels(params.boost_cut_db).to_shelf_amplitude();
    if !a.is_finite() || a <= 0.0 {
        return Err(CalcError::invalid(format!(
            "boost/cut {} dB is out of range",
            params.boost_cut_db
        )));
    }

    let raw = match params.filter_type {
        FilterType::Parametric => RawBiquadCoeffs::peaking(w0, a, params.q, gain_linear),
        FilterType::LowShelf => RawBiquadCoeffs::low_shelf(w0, a, params.q, gain_linear)?,
        FilterType::HighShelf => RawBiquadCoeffs::high_shelf(w0, a, params.q, gain_linear)?,
    };

    let normalized = raw.normalize()?;
    Ok(BiquadCoefficients { raw, normalized })
}

/// Shelf alpha: sin(w0)/2 · sqrt((A + 1/A)(1/q - 1) + 2)
///
/// Fails with `DomainError` when the radicand is negative, which happens for
/// q above 1 once |boost| is large enough.
pub fn shelf_alpha(w0: f64, a: f64, q: f64) -> CalcResult<f64> {
    let radicand = (a + 1.0 / a) * (1.0 / q - 1.0) + 2.0;
    if radicand < 0.0 {
        return Err(CalcError::DomainError {
            radicand,
            q,
            boost_db: 40.0 * a.log10(),
        });
    }
    if !radicand.is_finite() {
        return Err(CalcError::invalid(format!("shelf slope radicand is {radicand}")));
    }
    Ok(w0.sin() / 2.0 * radicand.sqrt())
}

impl RawBiquadCoeffs {
    /// Peaking EQ. `a` is the shelf/peak amplitude 10^(dB/40).
    pub fn peaking(w0: f64, a: f64, q: f64, gain_linear: f64) -> Self {
        let alpha = w0.sin() / (2.0 * q);
        let a1 = -2.0 * w0.cos();

        Self {
            b0: (1.0 + alpha * a) * gain_linear,
            b1: a1 * gain_linear,
            b2: (1.0 - alpha * a) * gain_linear,
            a0: 1.0 + alpha / a,
            a1,
            a2: 1.0 - alpha / a,
        }
    }

    /// Low shelf, q acting as shelf slope
    pub fn low_shelf(w0: f64, a: f64, q: f64, gain_linear: f64) -> CalcResult<Self> {
        let alpha = shelf_alpha(w0, a, q)?;
        let cos_w0 = w0.cos();
        let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;

        Ok(Self {
            b0: a * ((a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha) * gain_linear,
            b1: 2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w0) * gain_linear,
            b2: a * ((a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha) * gain_linear,
            a0: (a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha,
            a1: -2.0 * ((a - 1.0) + (a + 1.0) * cos_w0),
            a2: (a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha,
        })
    }

    /// High shelf, q acting as shelf slope
    ///
    /// The denominator is the standard high-shelf form
    /// `(A+1) - (A-1)cos ± 2√A·alpha`. Reusing the low-shelf `a0`/`a2` here
    /// gives different coefficients and drops the response far below 0 dB
    /// at DC (about -31 dB for +6 dB at 1 kHz).
    pub fn high_shelf(w0: f64, a: f64, q: f64, gain_linear: f64) -> CalcResult<Self> {
        let alpha = shelf_alpha(w0, a, q)?;
        let cos_w0 = w0.cos();
        let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;

        Ok(Self {
            b0: a * ((a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha) * gain_linear,
            b1: -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0) * gain_linear,
            b2: a * ((a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha) * gain_linear,
            a0: (a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha,
            a1: 2.0 * ((a - 1.0) - (a + 1.0) * cos_w0),
            a2: (a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha,
        })
    }

    /// Divide through by a0
    pub fn normalize(&self) -> CalcResult<NormalizedBiquadCoeffs> {
        if self.a0 == 0.0 || !self.a0.is_finite() {
            return Err(CalcError::DegenerateFilter { a0: self.a0 });
        }

        let normalized = NormalizedBiquadCoeffs {
            b0: self.b0 / self.a0,
            b1: self.b1 / self.a0,
            b2: self.b2 / self.a0,
            a1: self.a1 / self.a0,
            a2: self.a2 / self.a0,
        };

        if !normalized.is_finite() {
            return Err(CalcError::invalid("normalized coefficients are not finite"));
        }
        Ok(normalized)
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.b0, self.b1, self.b2, self.a0, self.a1, self.a2]
    }
}

impl NormalizedBiquadCoeffs {
    /// Unity gain, no filtering
    pub fn bypass() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }

    /// Always 1.0 after normalization
    #[inline]
    pub const fn a0(&self) -> f64 {
        1.0
    }

    /// (b0, b1, b2, a0, a1, a2) with a0 = 1
    pub fn to_array(&self) -> [f64; 6] {
        [self.b0, self.b1, self.b2, self.a0(), self.a1, self.a2]
    }

    pub fn is_finite(&self) -> bool {
        [self.b0, self.b1, self.b2, self.a1, self.a2]
            .iter()
            .all(|c| c.is_finite())
    }
}

impl Default for NormalizedBiquadCoeffs {
    fn default() -> Self {
        Self::bypass()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(filter_type: FilterType, freq: f64, gain_db: f64, q: f64) -> FilterParameters {
        FilterParameters::new(filter_type, freq, gain_db, q)
    }

    #[test]
    fn test_peaking_reference_values() {
        let coeffs = derive(&params(FilterType::Parametric, 1000.0, 6.0, 0.707)).unwrap();
        let n = coeffs.normalized;

        assert_relative_eq!(n.b0, 1.061_051_079_218_484_4, epsilon = 1e-12);
        assert_relative_eq!(n.b1, -1.861_255_902_473_044_2, epsilon = 1e-12);
        assert_relative_eq!(n.b2, 0.816_265_527_066_576_4, epsilon = 1e-12);
        assert_relative_eq!(n.a1, -1.861_255_902_473_044_2, epsilon = 1e-12);
        assert_relative_eq!(n.a2, 0.877_316_606_285_060_8, epsilon = 1e-12);
    }

    #[test]
    fn test_shelf_reference_values() {
        let low = derive(&params(FilterType::LowShelf, 1000.0, 6.0, 0.707)).unwrap();
        assert_relative_eq!(low.normalized.b0, 1.037_960_414_022_699, epsilon = 1e-12);
        assert_relative_eq!(low.normalized.b1, -1.812_734_046_722_839_7, epsilon = 1e-12);
        assert_relative_eq!(low.normalized.b2, 0.796_907_956_543_806, epsilon = 1e-12);
        assert_relative_eq!(low.normalized.a1, -1.818_254_488_376_964, epsilon = 1e-12);
        assert_relative_eq!(low.normalized.a2, 0.829_347_928_912_381_1, epsilon = 1e-12);

        let high = derive(&params(FilterType::HighShelf, 1000.0, 6.0, 0.707)).unwrap();
        assert_relative_eq!(high.normalized.b0, 1.922_291_339_836_439_8, epsilon = 1e-12);
        assert_relative_eq!(high.normalized.b1, -3.495_214_856_625_774, epsilon = 1e-12);
        assert_relative_eq!(high.normalized.b2, 1.594_248_341_459_557_4, epsilon = 1e-12);
        assert_relative_eq!(high.normalized.a1, -1.746_438_517_532_131, epsilon = 1e-12);
        assert_relative_eq!(high.normalized.a2, 0.767_763_342_202_353_4, epsilon = 1e-12);
    }

    #[test]
    fn test_normalized_a0_is_one() {
        for ty in FilterType::ALL {
            let coeffs = derive(&params(ty, 440.0, -4.5, 0.5)).unwrap();
            assert_eq!(coeffs.normalized.a0(), 1.0);
            assert_eq!(coeffs.normalized.to_array()[3], 1.0);
        }
    }

    #[test]
    fn test_zero_boost_peaking_is_identity() {
        let coeffs = derive(&params(FilterType::Parametric, 2500.0, 0.0, 1.3)).unwrap();
        let n = coeffs.normalized;

        assert_relative_eq!(n.b0, 1.0, epsilon = 1e-15);
        assert_eq!(n.b1, n.a1);
        assert_eq!(n.b2, n.a2);
    }

    #[test]
    fn test_output_gain_scales_numerator_only() {
        let base = params(FilterType::HighShelf, 3000.0, 3.0, 0.9);
        let plain = derive(&base).unwrap();
        let boosted = derive(&base.with_output_gain(6.0)).unwrap();
        let g = Decibels(6.0).to_gain();

        assert_relative_eq!(boosted.raw.b0, plain.raw.b0 * g, max_relative = 1e-12);
        assert_relative_eq!(boosted.raw.b1, plain.raw.b1 * g, max_relative = 1e-12);
        assert_relative_eq!(boosted.raw.b2, plain.raw.b2 * g, max_relative = 1e-12);
        assert_eq!(boosted.raw.a0, plain.raw.a0);
        assert_eq!(boosted.raw.a1, plain.raw.a1);
        assert_eq!(boosted.raw.a2, plain.raw.a2);
    }

    #[test]
    fn test_zero_output_gain_is_exactly_unity() {
        let base = params(FilterType::Parametric, 1000.0, 6.0, 0.707);
        let coeffs = derive(&base).unwrap();
        let w0 = base.omega();
        let a = Decibels(6.0).to_shelf_amplitude();
        let alpha = w0.sin() / (2.0 * 0.707);

        assert_eq!(coeffs.raw.b0, 1.0 + alpha * a);
        assert_eq!(coeffs.raw.b1, -2.0 * w0.cos());
    }

    #[test]
    fn test_shelf_domain_error() {
        for boost in [18.0, -18.0, 12.5] {
            let result = derive(&params(FilterType::LowShelf, 1000.0, boost, 5.0));
            assert!(
                matches!(&result, Err(CalcError::DomainError { radicand, .. }) if *radicand < 0.0),
                "boost {boost}: {result:?}"
            );
        }

        let result = derive(&params(FilterType::HighShelf, 1000.0, 18.0, 5.0));
        assert!(matches!(result, Err(CalcError::DomainError { .. })));
    }

    #[test]
    fn test_shelf_high_q_with_mild_boost_is_valid() {
        let coeffs = derive(&params(FilterType::LowShelf, 1000.0, 6.0, 5.0)).unwrap();
        assert!(coeffs.normalized.is_finite());
    }

    #[test]
    fn test_domain_error_is_not_raised_for_peaking() {
        let coeffs = derive(&params(FilterType::Parametric, 1000.0, 18.0, 5.0)).unwrap();
        assert!(coeffs.normalized.is_finite());
    }

    #[test]
    fn test_invalid_inputs() {
        let cases = [
            params(FilterType::Parametric, 0.0, 6.0, 1.0),
            params(FilterType::Parametric, 24000.0, 6.0, 1.0),
            params(FilterType::LowShelf, 1000.0, 6.0, 0.0),
            params(FilterType::HighShelf, 1000.0, 6.0, -1.0),
            params(FilterType::Parametric, f64::NAN, 6.0, 1.0),
            params(FilterType::Parametric, 1000.0, f64::INFINITY, 1.0),
            params(FilterType::Parametric, 1000.0, 6.0, 1.0).with_sample_rate(-48000.0),
            params(FilterType::Parametric, 1000.0, 1e6, 1.0),
            params(FilterType::Parametric, 1000.0, 6.0, 1.0).with_output_gain(1e6),
        ];

        for case in cases {
            assert!(
                matches!(derive(&case), Err(CalcError::InvalidInput(_))),
                "expected InvalidInput for {case:?}"
            );
        }
    }

    #[test]
    fn test_degenerate_filter() {
        let raw = RawBiquadCoeffs {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a0: 0.0,
            a1: 0.5,
            a2: 0.25,
        };
        assert_eq!(raw.normalize(), Err(CalcError::DegenerateFilter { a0: 0.0 }));

        let raw = RawBiquadCoeffs { a0: f64::NAN, ..raw };
        assert!(matches!(raw.normalize(), Err(CalcError::DegenerateFilter { .. })));
    }

    #[test]
    fn test_non_finite_after_normalize() {
        let raw = RawBiquadCoeffs {
            b0: f64::MAX,
            b1: 0.0,
            b2: 0.0,
            a0: 1e-300,
            a1: 0.0,
            a2: 0.0,
        };
        assert!(matches!(raw.normalize(), Err(CalcError::InvalidInput(_))));
    }

    #[test]
    fn test_configurable_sample_rate() {
        let at_48k = derive(&params(FilterType::Parametric, 1000.0, 6.0, 1.0)).unwrap();
        let at_96k =
            derive(&params(FilterType::Parametric, 2000.0, 6.0, 1.0).with_sample_rate(96000.0))
                .unwrap();

        // Same normalized frequency, same filter
        assert_relative_eq!(at_48k.normalized.b0, at_96k.normalized.b0, epsilon = 1e-12);
        assert_relative_eq!(at_48k.normalized.a2, at_96k.normalized.a2, epsilon = 1e-12);
    }
}
