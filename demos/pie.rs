use std::time::{Duration, Instant};

use kurbo::Size;
use piechart::{ChartConfig, ColorToken, FixedPalette, PieBuilder, PieChart, PieStyle};
use piet::Color;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let data = PieBuilder::new()
        .add(65.0, ColorToken(0))
        .add(105.0, ColorToken(1))
        .add(440.0, ColorToken(2))
        .add(80.0, ColorToken(3))
        .add(150.0, ColorToken(4))
        .build();

    let mut style = PieStyle::default();
    style.background_color = Color::WHITE;
    style.palette = Box::new(FixedPalette(vec![
        Color::rgb8(0x4d, 0xd0, 0xe1),
        Color::rgb8(0x7e, 0x57, 0xc2),
        Color::rgb8(0xff, 0x70, 0x43),
        Color::rgb8(0x9c, 0xcc, 0x65),
        Color::rgb8(0xff, 0xca, 0x28),
    ]));

    let mut chart = PieChart::with_style("Monthly expenses", style, ChartConfig::default());
    let start = Instant::now();
    let generation = chart.commit(data, start);

    // snapshot the entrance animation at a few timestamps
    let size = Size::new(800., 800.);
    for ms in [0u64, 250, 500, 1000] {
        chart.advance(generation, start + Duration::from_millis(ms));
        let filename = format!("pie_{:04}ms.svg", ms);
        chart.to_svg_file(&filename, size)?;
        println!("{} (reveal {:.1}°)", filename, chart.reveal_angle());
    }
    println!("{:?}", chart.phase());
    Ok(())
}
