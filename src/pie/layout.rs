//! Slice angle layout.

use super::{ColorToken, PieData};

pub(crate) const FULL_CIRCLE: f64 = 360.0;

/// A slice with its computed position on the ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaidOutSlice {
    pub color: ColorToken,
    pub value: f64,
    /// Degrees clockwise from 3 o'clock.
    pub start_angle: f64,
    /// Angular width in degrees.
    pub sweep_angle: f64,
}

/// Output of [`lay_out`]: positioned slices plus the reveal target.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceLayout {
    pub slices: Vec<LaidOutSlice>,
    /// End angle of the last slice including its gap. The entrance animation
    /// sweeps the reveal front from 0 to here.
    pub final_angle: f64,
}

/// Converts slice values into proportional start/sweep angles.
///
/// Slices are placed clockwise from 0° in insertion order, each followed by
/// `gap_degrees` of unfilled ring, so that sweeps plus gaps cover the full
/// circle. Two special cases:
///
/// - a lone slice takes the whole circle with no gap, whatever its value;
/// - a zero total across several slices lays every sweep out as 0° (a blank
///   ring) instead of dividing by zero.
///
/// This runs once when data is committed, never per frame.
pub fn lay_out(data: &PieData, gap_degrees: f64) -> SliceLayout {
    let single = data.slices.len() == 1;
    let mut cursor = 0.0;
    let mut slices = Vec::with_capacity(data.slices.len());

    for slice in &data.slices {
        let (sweep, gap) = if single {
            (FULL_CIRCLE, 0.0)
        } else if data.total_sum == 0.0 {
            (0.0, gap_degrees)
        } else {
            (
                slice.value / data.total_sum * FULL_CIRCLE - gap_degrees,
                gap_degrees,
            )
        };
        slices.push(LaidOutSlice {
            color: slice.color,
            value: slice.value,
            start_angle: cursor,
            sweep_angle: sweep,
        });
        cursor += sweep + gap;
    }

    SliceLayout {
        slices,
        final_angle: cursor,
    }
}
