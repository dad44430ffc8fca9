use std::time::{Duration, Instant};
use std::{fmt, fs, io, path::Path};

use kurbo::Size;
use once_cell::sync::Lazy;
use piet::{Color, RenderContext};
use thiserror::Error;

use crate::anim::{Easing, Generation, Tween, TweenRun};

mod builder;
mod layout;
mod render;

pub use builder::PieBuilder;
pub use layout::{lay_out, LaidOutSlice, SliceLayout};

/// The default style used by [`PieChart::new`].
pub static DEFAULT_STYLE: Lazy<PieStyle> = Lazy::new(PieStyle::default);
pub static DARK_STYLE: Lazy<PieStyle> = Lazy::new(PieStyle::default_dark);

const DEFAULT_DURATION: Duration = Duration::from_millis(1000);
const DEFAULT_GAP_DEGREES: f64 = 2.0;
const DEFAULT_HOLE_INSET: f64 = 64.0;

/// One wedge's input: a weight and an opaque color handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlice {
    pub value: f64,
    pub color: ColorToken,
}

/// Immutable chart data produced by [`PieBuilder::build`].
///
/// `slices` keeps insertion order and is never empty; `total_sum` is the
/// arithmetic sum of the slice values.
#[derive(Debug, Clone, PartialEq)]
pub struct PieData {
    pub slices: Vec<PieSlice>,
    pub total_sum: f64,
}

/// Opaque per-slice color handle, resolved by a [`ColorPalette`] at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorToken(pub u32);

impl ColorToken {
    /// Handle for the synthetic slice a chart shows when it has no data.
    pub const DEFAULT: ColorToken = ColorToken(u32::MAX);
}

/// Where a chart is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No data committed yet.
    Idle,
    /// The entrance animation is in flight.
    Running,
    /// The animation has finished; frames show the full chart.
    Settled,
}

/// Outcome of one frame callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// The animation moved; keep scheduling frames.
    Running { reveal: f64 },
    /// The animation is done; no further frames are needed.
    Settled { reveal: f64 },
    /// The token belongs to a replaced animation; nothing changed.
    Superseded,
}

/// Animation and geometry knobs the host may override.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartConfig {
    /// Entrance animation length.
    pub duration: Duration,
    /// Unfilled ring between adjacent slices, in degrees.
    pub gap_degrees: f64,
    /// Distance from the chart's outer edge to the donut hole.
    pub hole_inset: f64,
    pub easing: Easing,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            gap_degrees: DEFAULT_GAP_DEGREES,
            hole_inset: DEFAULT_HOLE_INSET,
            easing: Easing::Decelerate,
        }
    }
}

impl ChartConfig {
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_gap_degrees(mut self, gap_degrees: f64) -> Self {
        self.gap_degrees = gap_degrees;
        self
    }

    pub fn with_hole_inset(mut self, hole_inset: f64) -> Self {
        self.hole_inset = hole_inset;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// An animated donut chart bound to one dataset at a time.
///
/// The host owns the frame loop: [`commit`](Self::commit) lays out the data,
/// starts the entrance animation, and hands back a [`Generation`]. Each
/// display-refresh callback then calls [`advance`](Self::advance) with that
/// token and redraws via [`render`](Self::render), until the advance reports
/// [`Advance::Settled`].
#[derive(Debug)]
pub struct PieChart {
    label: String,
    style: PieStyle,
    config: ChartConfig,
    data: Option<PieData>,
    slices: Vec<LaidOutSlice>,
    final_angle: f64,
    reveal: f64,
    run: Option<TweenRun>,
    generation: u64,
}

impl PieChart {
    /// Creates a chart with the default style and config.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_style(label, DEFAULT_STYLE.clone(), ChartConfig::default())
    }

    pub fn with_style(label: impl Into<String>, style: PieStyle, config: ChartConfig) -> Self {
        Self {
            label: label.into(),
            style,
            config,
            data: None,
            slices: Vec::new(),
            final_angle: 0.0,
            reveal: 0.0,
            run: None,
            generation: 0,
        }
    }

    /// (Re)starts the entrance animation with a new dataset.
    ///
    /// Angle layout happens here, once per commit. An animation still in
    /// flight is replaced outright; callbacks holding the previous token get
    /// [`Advance::Superseded`] from then on.
    pub fn commit(&mut self, data: PieData, now: Instant) -> Generation {
        let layout = lay_out(&data, self.config.gap_degrees);
        tracing::debug!(
            slices = layout.slices.len(),
            final_angle = layout.final_angle,
            "committing chart data"
        );
        self.slices = layout.slices;
        self.final_angle = layout.final_angle;
        self.data = Some(data);
        self.reveal = 0.0;
        self.run = Some(
            Tween::new(0.0, self.final_angle, self.config.duration, self.config.easing).start(now),
        );
        self.generation += 1;
        Generation(self.generation)
    }

    /// Advances the animation to `now`.
    ///
    /// The reveal angle never decreases across calls and freezes at the
    /// layout's final angle once the duration has elapsed.
    pub fn advance(&mut self, generation: Generation, now: Instant) -> Advance {
        if generation != Generation(self.generation) {
            return Advance::Superseded;
        }
        let Some(run) = &mut self.run else {
            return Advance::Settled { reveal: self.reveal };
        };
        self.reveal = run.sample(now);
        if run.is_finished(now) {
            self.run = None;
            tracing::debug!(reveal = self.reveal, "entrance animation settled");
            Advance::Settled { reveal: self.reveal }
        } else {
            Advance::Running { reveal: self.reveal }
        }
    }

    pub fn phase(&self) -> Phase {
        match (&self.data, &self.run) {
            (None, _) => Phase::Idle,
            (Some(_), Some(_)) => Phase::Running,
            (Some(_), None) => Phase::Settled,
        }
    }

    /// Degrees of the ring currently swept into view.
    pub fn reveal_angle(&self) -> f64 {
        self.reveal
    }

    /// Token of the most recent commit.
    pub fn generation(&self) -> Generation {
        Generation(self.generation)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn data(&self) -> Option<&PieData> {
        self.data.as_ref()
    }

    /// The laid-out slices of the committed dataset.
    pub fn slices(&self) -> &[LaidOutSlice] {
        &self.slices
    }

    fn total_sum(&self) -> f64 {
        self.data.as_ref().map_or(0.0, |data| data.total_sum)
    }

    /// Draws the current frame.
    ///
    /// Degenerate geometry never fails: a zero-size surface skips the pass
    /// silently. Errors only surface from text layout construction.
    pub fn render<RC: RenderContext>(&self, size: Size, ctx: &mut RC) -> Result<(), piet::Error> {
        render::render_frame(self, size, ctx)
    }

    /// Writes the current frame as an SVG document.
    pub fn to_svg(&self, writer: impl io::Write, size: Size) -> Result<(), ExportError> {
        let mut rc = piet_svg::RenderContext::new(size);
        self.render(size, &mut rc)?;
        rc.write(writer)?;
        Ok(())
    }

    pub fn to_svg_file(&self, filename: impl AsRef<Path>, size: Size) -> Result<(), ExportError> {
        let file = io::BufWriter::new(fs::File::create(filename)?);
        self.to_svg(file, size)
    }
}

/// Failures from the snapshot export surface.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write svg output")]
    Io(#[from] io::Error),
    #[error("failed to render chart")]
    Render(#[from] piet::Error),
}

/// Visual styling for a [`PieChart`].
#[derive(Clone)]
pub struct PieStyle {
    pub background_color: Color,
    /// Fill of the donut hole the label sits in.
    pub hole_color: Color,
    pub label: TextStyle,
    pub sum: TextStyle,
    pub palette: Box<dyn ColorPalette + Send + Sync>,
}

impl fmt::Debug for PieStyle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PieStyle")
            .field("background_color", &self.background_color)
            .field("hole_color", &self.hole_color)
            .field("label", &self.label)
            .field("sum", &self.sum)
            .field("palette", &"dyn ColorPalette")
            .finish()
    }
}

impl PieStyle {
    pub fn default() -> Self {
        Self {
            background_color: Color::TRANSPARENT,
            hole_color: Color::WHITE,
            label: TextStyle::default().with_font_size(14.),
            sum: TextStyle::default().with_font_size(20.).with_bold(true),
            palette: Box::new(DefaultPalette),
        }
    }

    pub fn default_dark() -> Self {
        let mut this = Self::default();
        this.hole_color = Color::rgb8(0x30, 0x30, 0x30);
        this.label = TextStyle::default_dark().with_font_size(14.);
        this.sum = TextStyle::default_dark().with_font_size(20.).with_bold(true);
        this
    }
}

#[derive(Debug, Clone)]
pub struct TextStyle {
    pub color: Color,
    pub font_size: f64,
    pub bold: bool,
}

impl TextStyle {
    pub fn default() -> Self {
        Self {
            color: Color::BLACK,
            font_size: 16.,
            bold: false,
        }
    }

    pub fn default_dark() -> Self {
        Self {
            color: Color::WHITE,
            font_size: 16.,
            bold: false,
        }
    }

    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }
}

/// Resolves opaque color tokens to drawable colors.
pub trait ColorPalette: dyn_clone::DynClone {
    /// This function is expected to give the same answer for the same input (i.e. be a pure fn).
    fn resolve(&self, token: ColorToken) -> Color;
}

dyn_clone::clone_trait_object!(ColorPalette);

/// Hue-rotating palette used when the host supplies no colors of its own.
#[derive(Copy, Clone)]
pub struct DefaultPalette;

impl ColorPalette for DefaultPalette {
    fn resolve(&self, token: ColorToken) -> Color {
        if token == ColorToken::DEFAULT {
            // neutral fill for the "no data" circle
            return Color::rgb8(0xbf, 0xbf, 0xbf);
        }
        let hue = (token.0 as f64 * 140.).rem_euclid(360.);
        Color::hlc(hue, 40., 40.)
    }
}

/// Palette backed by an explicit color list; tokens index into it, wrapping
/// around at the end.
#[derive(Clone)]
pub struct FixedPalette(pub Vec<Color>);

impl ColorPalette for FixedPalette {
    fn resolve(&self, token: ColorToken) -> Color {
        if self.0.is_empty() || token == ColorToken::DEFAULT {
            return DefaultPalette.resolve(token);
        }
        self.0[token.0 as usize % self.0.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    fn expenses() -> PieData {
        PieBuilder::new()
            .add(65.0, ColorToken(0))
            .add(105.0, ColorToken(1))
            .add(440.0, ColorToken(2))
            .add(80.0, ColorToken(3))
            .add(150.0, ColorToken(4))
            .build()
    }

    #[test]
    fn commit_runs_the_chart_to_a_settled_full_circle() {
        let mut chart = PieChart::new("expenses");
        assert_eq!(chart.phase(), Phase::Idle);

        let t0 = Instant::now();
        let generation = chart.commit(expenses(), t0);
        assert_eq!(chart.phase(), Phase::Running);
        assert_close(chart.reveal_angle(), 0.0);

        match chart.advance(generation, t0 + Duration::from_millis(1000)) {
            Advance::Settled { reveal } => assert_close(reveal, 360.0),
            other => panic!("expected settled advance, got {:?}", other),
        }
        assert_eq!(chart.phase(), Phase::Settled);

        // every slice sits at its full laid-out sweep
        for (slice, value) in chart.slices().iter().zip([65.0, 105.0, 440.0, 80.0, 150.0]) {
            assert_close(slice.sweep_angle, value / 840.0 * 360.0 - 2.0);
            assert!(chart.reveal_angle() >= slice.start_angle + slice.sweep_angle);
        }
        assert_eq!(super::render::format_total(chart.total_sum()), "840.0");
    }

    #[test]
    fn reveal_is_monotone_across_frames() {
        let mut chart = PieChart::new("expenses");
        let t0 = Instant::now();
        let generation = chart.commit(expenses(), t0);

        let mut previous = 0.0;
        for ms in [0, 16, 160, 400, 640, 990, 1000, 1100] {
            chart.advance(generation, t0 + Duration::from_millis(ms));
            assert!(chart.reveal_angle() >= previous);
            previous = chart.reveal_angle();
        }
        assert_close(previous, 360.0);
    }

    #[test]
    fn stale_generations_are_discarded() {
        let mut chart = PieChart::new("expenses");
        let t0 = Instant::now();
        let first = chart.commit(expenses(), t0);
        chart.advance(first, t0 + Duration::from_millis(300));

        let second = chart.commit(expenses(), t0 + Duration::from_millis(400));
        assert_close(chart.reveal_angle(), 0.0);

        // the replaced animation's pending callbacks must not move the chart
        let outcome = chart.advance(first, t0 + Duration::from_millis(900));
        assert_eq!(outcome, Advance::Superseded);
        assert_close(chart.reveal_angle(), 0.0);
        assert_eq!(chart.phase(), Phase::Running);

        match chart.advance(second, t0 + Duration::from_millis(450)) {
            Advance::Running { reveal } => assert!(reveal > 0.0),
            other => panic!("expected running advance, got {:?}", other),
        }
    }

    #[test]
    fn advance_after_settling_stays_settled() {
        let mut chart = PieChart::new("expenses");
        let t0 = Instant::now();
        let generation = chart.commit(expenses(), t0);
        chart.advance(generation, t0 + Duration::from_millis(1500));
        assert_eq!(chart.phase(), Phase::Settled);

        let outcome = chart.advance(generation, t0 + Duration::from_millis(2000));
        assert_eq!(outcome, Advance::Settled { reveal: chart.reveal_angle() });
        assert_close(chart.reveal_angle(), 360.0);
    }

    #[test]
    fn zero_duration_settles_on_the_first_frame() {
        let config = ChartConfig::default().with_duration(Duration::ZERO);
        let mut chart = PieChart::with_style("expenses", PieStyle::default(), config);
        let t0 = Instant::now();
        let generation = chart.commit(expenses(), t0);

        match chart.advance(generation, t0) {
            Advance::Settled { reveal } => assert_close(reveal, 360.0),
            other => panic!("expected settled advance, got {:?}", other),
        }
    }

    #[test]
    fn empty_data_settles_as_a_full_default_circle() {
        let mut chart = PieChart::new("");
        let t0 = Instant::now();
        let generation = chart.commit(PieBuilder::new().build(), t0);
        chart.advance(generation, t0 + Duration::from_millis(1000));

        assert_eq!(chart.slices().len(), 1);
        assert_eq!(chart.slices()[0].color, ColorToken::DEFAULT);
        assert_close(chart.slices()[0].sweep_angle, 360.0);
        assert_close(chart.reveal_angle(), 360.0);
    }

    #[test]
    fn config_overrides_apply() {
        let config = ChartConfig::default()
            .with_duration(Duration::from_millis(250))
            .with_gap_degrees(4.0)
            .with_hole_inset(32.0)
            .with_easing(Easing::Linear);
        let mut chart = PieChart::with_style("x", PieStyle::default(), config);

        let t0 = Instant::now();
        let data = PieBuilder::new()
            .add(1.0, ColorToken(0))
            .add(1.0, ColorToken(1))
            .build();
        let generation = chart.commit(data, t0);
        assert_close(chart.slices()[0].sweep_angle, 176.0);

        match chart.advance(generation, t0 + Duration::from_millis(250)) {
            Advance::Settled { reveal } => assert_close(reveal, 360.0),
            other => panic!("expected settled advance, got {:?}", other),
        }
    }

    #[test]
    fn fixed_palette_cycles_and_keeps_the_fallback() {
        let palette = FixedPalette(vec![Color::rgb8(1, 2, 3), Color::rgb8(4, 5, 6)]);
        assert_eq!(palette.resolve(ColorToken(0)), palette.resolve(ColorToken(2)));
        assert_eq!(
            palette.resolve(ColorToken::DEFAULT),
            DefaultPalette.resolve(ColorToken::DEFAULT)
        );
    }
}
