use crate::error::{Result, ViewerError};

use super::model::CellValue;

/// A fixed raw-value range mapped onto the 0–100 comparison axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    min: f64,
    max: f64,
}

impl Domain {
    /// Fails with [`ViewerError::Domain`] when the range is empty.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if min == max || !min.is_finite() || !max.is_finite() {
            return Err(ViewerError::Domain { min, max });
        }
        Ok(Domain { min, max })
    }

    /// Map a raw cell onto `[0, 100]`.
    ///
    /// Empty or non-numeric cells score 0 (no data = baseline); values
    /// outside the domain are clamped.
    pub fn normalize(&self, value: &CellValue) -> f64 {
        match value.as_f64() {
            Some(v) => (((v - self.min) / (self.max - self.min)) * 100.0).clamp(0.0, 100.0),
            None => 0.0,
        }
    }
}

/// Normalise `value` against `[min, max]` in one call.
pub fn normalize(value: &CellValue, min: f64, max: f64) -> Result<f64> {
    Ok(Domain::new(min, max)?.normalize(value))
}

/// The coerced numeric value shown next to the score (0 when not numeric).
pub fn raw_display(value: &CellValue) -> f64 {
    value.as_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inside_domain_is_linear() {
        let d = Domain::new(12.0, 15.0).unwrap();
        assert_eq!(d.normalize(&CellValue::Float(13.5)), 50.0);
        assert_eq!(d.normalize(&CellValue::Float(12.0)), 0.0);
        assert_eq!(d.normalize(&CellValue::Float(15.0)), 100.0);

        let d = Domain::new(50.0, 100.0).unwrap();
        assert_eq!(d.normalize(&CellValue::Integer(85)), (85.0 - 50.0) / 50.0 * 100.0);
    }

    #[test]
    fn outside_domain_clamps() {
        let d = Domain::new(-1.0, 6.0).unwrap();
        assert_eq!(d.normalize(&CellValue::Float(-3.0)), 0.0);
        assert_eq!(d.normalize(&CellValue::Float(9.0)), 100.0);
    }

    #[test]
    fn empty_or_text_scores_zero() {
        let d = Domain::new(60.0, 120.0).unwrap();
        assert_eq!(d.normalize(&CellValue::Null), 0.0);
        assert_eq!(d.normalize(&CellValue::Float(f64::NAN)), 0.0);
        assert_eq!(d.normalize(&CellValue::String("缺考".into())), 0.0);
        assert_eq!(d.normalize(&CellValue::String("90".into())), 50.0);
    }

    #[test]
    fn empty_range_is_a_domain_error() {
        assert_eq!(
            normalize(&CellValue::Float(1.0), 5.0, 5.0),
            Err(ViewerError::Domain { min: 5.0, max: 5.0 })
        );
    }

    #[test]
    fn raw_display_coerces() {
        assert_eq!(raw_display(&CellValue::String("13.5".into())), 13.5);
        assert_eq!(raw_display(&CellValue::String("良".into())), 0.0);
        assert_eq!(raw_display(&CellValue::Null), 0.0);
    }
}
