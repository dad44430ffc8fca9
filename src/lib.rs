//! An animated pie/donut chart renderer.
//!
//! Weighted values go in through [`PieBuilder`], come out as immutable
//! [`PieData`], and a [`PieChart`] sweeps them into view over a fixed
//! duration, drawing each frame through any [`piet::RenderContext`].
//!
//! ```
//! use std::time::{Duration, Instant};
//! use piechart::{ColorToken, PieBuilder, PieChart};
//!
//! let data = PieBuilder::new()
//!     .add(65.0, ColorToken(0))
//!     .add(105.0, ColorToken(1))
//!     .build();
//!
//! let mut chart = PieChart::new("Monthly expenses");
//! let start = Instant::now();
//! let generation = chart.commit(data, start);
//!
//! chart.advance(generation, start + Duration::from_millis(500));
//! assert!(chart.reveal_angle() > 0.0);
//! ```

mod anim;
mod pie;

pub use anim::{Easing, Generation, Tween, TweenRun};
pub use pie::*;
