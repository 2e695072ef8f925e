//! Interactive calculator session
//!
//! Holds the edited form fields and the last successful calculation. A
//! failed recalculation leaves both untouched, so the previous output stays
//! on screen.

use bq_core::CalcError;
use bq_dsp::ResponseConfig;
use thiserror::Error;

use crate::input::{InputError, RawParameters};
use crate::{Calculation, calculate};

/// Why a recalculation was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("calculation error: {0}")]
    Calc(#[from] CalcError),
}

pub struct Session {
    fields: RawParameters,
    last: Option<Calculation>,
    point_count: usize,
}

impl Session {
    pub fn new(fields: RawParameters, point_count: usize) -> Self {
        Self {
            fields,
            last: None,
            point_count,
        }
    }

    pub fn fields(&self) -> &RawParameters {
        &self.fields
    }

    /// Last successful calculation
    pub fn last(&self) -> Option<&Calculation> {
        self.last.as_ref()
    }

    /// Recalculate from the current fields
    pub fn recalculate(&mut self) -> Result<&Calculation, SessionError> {
        let fields = self.fields.clone();
        self.commit(fields)
    }

    /// Apply `key=value` edits and recalculate. Fields are only updated if
    /// the calculation succeeds.
    pub fn edit(&mut self, line: &str) -> Result<&Calculation, SessionError> {
        let mut fields = self.fields.clone();
        fields.apply_edits(line)?;
        self.commit(fields)
    }

    fn commit(&mut self, fields: RawParameters) -> Result<&Calculation, SessionError> {
        let params = fields.parse()?;
        let config = ResponseConfig::new(params.sample_rate_hz).with_point_count(self.point_count);

        match calculate(&params, &config) {
            Ok(calc) => {
                log::debug!(
                    "recalculated {} at {} Hz",
                    params.filter_type.title(),
                    params.frequency_hz
                );
                self.fields = fields;
                Ok(self.last.insert(calc))
            }
            Err(e) => {
                log::warn!("keeping previous result: {e}");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bq_core::FilterType;

    #[test]
    fn test_initial_calculation() {
        let mut session = Session::new(RawParameters::default(), 64);
        assert!(session.last().is_none());

        let calc = session.recalculate().unwrap();
        assert_eq!(calc.response.len(), 64);
        assert!(session.last().is_some());
    }

    #[test]
    fn test_failed_edit_keeps_previous_result() {
        let mut session = Session::new(RawParameters::default(), 32);
        let before = session.recalculate().unwrap().clone();

        let err = session.edit("q=zero").unwrap_err();
        assert!(matches!(err, SessionError::Input(InputError::InvalidNumber { .. })));
        assert_eq!(session.last(), Some(&before));
        assert_eq!(session.fields().q, "0.707");

        let err = session.edit("freq=30000").unwrap_err();
        assert!(matches!(err, SessionError::Calc(CalcError::InvalidInput(_))));
        assert_eq!(session.last(), Some(&before));
        assert_eq!(session.fields().frequency, "1000");

        let err = session.edit("type=low_shelf q=5 gain=18").unwrap_err();
        assert!(matches!(err, SessionError::Calc(CalcError::DomainError { .. })));
        assert_eq!(session.last(), Some(&before));
    }

    #[test]
    fn test_successful_edit_updates_fields() {
        let mut session = Session::new(RawParameters::default(), 32);
        let calc = session.edit("type=high_shelf freq=8000").unwrap();
        assert_eq!(calc.params.filter_type, FilterType::HighShelf);
        assert_eq!(session.fields().filter_type, "high_shelf");
    }

    #[test]
    fn test_sample_rate_edit_moves_grid() {
        let mut session = Session::new(RawParameters::default(), 16);
        let calc = session.edit("rate=96000").unwrap();
        assert_eq!(*calc.response.frequencies_hz.last().unwrap(), 48000.0);
    }
}
