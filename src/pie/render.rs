use kurbo::{Circle, CircleSegment, Point, Size};
use piet::{
    FontWeight, RenderContext, Text, TextAlignment, TextAttribute, TextLayout, TextLayoutBuilder,
};

use super::{LaidOutSlice, PieChart, TextStyle};

/// Draw one frame of `chart`, clipped to its current reveal angle.
pub(crate) fn render_frame<RC: RenderContext>(
    chart: &PieChart,
    size: Size,
    ctx: &mut RC,
) -> Result<(), piet::Error> {
    if size.width <= 0.0 || size.height <= 0.0 {
        // the surface has no layout yet; the next frame will try again
        tracing::trace!("skipping render pass on zero-size surface");
        return Ok(());
    }

    let style = &chart.style;
    ctx.clear(None, style.background_color);

    let center = Point::new(size.width / 2.0, size.height / 2.0);
    let radius = size.width.min(size.height) / 2.0;

    // build brushes
    let brushes = chart
        .slices
        .iter()
        .map(|slice| ctx.solid_brush(style.palette.resolve(slice.color)))
        .collect::<Vec<_>>();

    for (slice, brush) in chart.slices.iter().zip(&brushes) {
        let visible = visible_sweep(chart.reveal, slice);
        if visible == 0.0 {
            continue;
        }
        let wedge = CircleSegment {
            center,
            outer_radius: radius,
            inner_radius: 0.0,
            start_angle: slice.start_angle.to_radians(),
            sweep_angle: visible.to_radians(),
        };
        ctx.fill(&wedge, brush);
    }

    draw_center_space(chart, size, center, ctx)
}

/// Sweep of `slice` visible with the reveal front at `reveal` degrees: zero
/// before the front reaches the slice, the full sweep once it has passed it,
/// the partial difference in between.
pub(crate) fn visible_sweep(reveal: f64, slice: &LaidOutSlice) -> f64 {
    if reveal < slice.start_angle {
        0.0
    } else {
        (reveal - slice.start_angle).min(slice.sweep_angle)
    }
}

/// The donut hole and the two-line center label.
fn draw_center_space<RC: RenderContext>(
    chart: &PieChart,
    size: Size,
    center: Point,
    ctx: &mut RC,
) -> Result<(), piet::Error> {
    let hole_radius = (size.height / 2.0 - chart.config.hole_inset).max(0.0);
    let hole_brush = ctx.solid_brush(chart.style.hole_color);
    ctx.fill(Circle::new(center, hole_radius), &hole_brush);

    // label line, wrapped to half the surface width, ending at the vertical center
    let label = ctx
        .text()
        .new_text_layout(chart.label.clone())
        .max_width(size.width / 2.0)
        .alignment(TextAlignment::Center)
        .apply_style(&chart.style.label)
        .build()?;
    let label_height = label.size().height;
    ctx.draw_text(&label, Point::new(size.width / 4.0, center.y - label_height));

    // total sum directly below the label block
    let sum = ctx
        .text()
        .new_text_layout(format_total(chart.total_sum()))
        .apply_style(&chart.style.sum)
        .build()?;
    let sum_width = sum.size().width;
    ctx.draw_text(&sum, Point::new(center.x - sum_width / 2.0, center.y));

    Ok(())
}

/// Whole totals keep one decimal ("840.0"); anything else prints exactly.
pub(crate) fn format_total(total: f64) -> String {
    if total.is_finite() && total.fract() == 0.0 {
        format!("{:.1}", total)
    } else {
        format!("{}", total)
    }
}

trait ApplyStyle {
    fn apply_style(self, style: &TextStyle) -> Self;
}

impl<T: TextLayoutBuilder> ApplyStyle for T {
    fn apply_style(self, style: &TextStyle) -> Self {
        let mut this = self.default_attribute(TextAttribute::FontSize(px_to_pt(style.font_size)));
        if style.bold {
            this = this.default_attribute(TextAttribute::Weight(FontWeight::BOLD));
        }
        this.text_color(style.color)
    }
}

fn px_to_pt(px: f64) -> f64 {
    0.75 * px
}
