use super::{ColorToken, PieData, PieSlice};

/// Accumulates weighted values into a [`PieData`].
///
/// Calls chain in insertion order, which is also the order slices are laid
/// out around the ring:
///
/// ```
/// use piechart::{ColorToken, PieBuilder};
///
/// let data = PieBuilder::new()
///     .add(65.0, ColorToken(0))
///     .add(105.0, ColorToken(1))
///     .build();
/// assert_eq!(data.total_sum, 170.0);
/// ```
#[derive(Debug, Default)]
pub struct PieBuilder {
    slices: Vec<PieSlice>,
    total_sum: f64,
}

impl PieBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a slice and accumulates its value into the total.
    ///
    /// Negative values are accepted and lay out as a negative sweep;
    /// validating input is the caller's job.
    pub fn add(mut self, value: f64, color: ColorToken) -> Self {
        self.slices.push(PieSlice { value, color });
        self.total_sum += value;
        self
    }

    /// Produces the chart data.
    ///
    /// An empty builder yields a single zero-valued slice in the default
    /// color, which lays out as a full solid circle. The builder is left
    /// untouched, so repeated calls return equivalent data.
    pub fn build(&self) -> PieData {
        let mut slices = self.slices.clone();
        if slices.is_empty() {
            slices.push(PieSlice {
                value: 0.0,
                color: ColorToken::DEFAULT,
            });
        }
        PieData {
            slices,
            total_sum: self.total_sum,
        }
    }
}
