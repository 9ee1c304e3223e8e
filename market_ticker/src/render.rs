//! Render layer: text ticker bar and SVG sparklines.
//!
//! Everything here is pure: functions take quotes or price values and return strings,
//! so the caller decides whether to log them, print them or write them to disk.

use broker_common::history::PriceHistory;
use broker_common::market_hours::MarketStatus;
use broker_common::quote::Quote;
use rand::Rng;
use std::fmt::Write;

/// Sparkline viewport width.
pub const SPARK_WIDTH: f64 = 100.0;
/// Sparkline viewport height.
pub const SPARK_HEIGHT: f64 = 40.0;
/// Hero chart viewport width.
pub const HERO_WIDTH: f64 = 120.0;
/// Hero chart viewport height.
pub const HERO_HEIGHT: f64 = 60.0;

const UP_STROKE: &str = "#16a34a";
const DOWN_STROKE: &str = "#dc2626";
const UP_FILL: &str = "#bbf7d0";
const DOWN_FILL: &str = "#fecaca";

/// Project `values` onto a `width` x `height` viewport, oldest at x = 0.
///
/// Values are normalised with `(v - min) / (max - min)`. A flat series (`max == min`)
/// is drawn on the vertical midpoint. A single value sits at x = 0.
pub fn sparkline_points(values: &[f64], width: f64, height: f64) -> Vec<(f64, f64)> {
    let Some(min) = values.iter().copied().reduce(f64::min) else {
        return Vec::new();
    };
    let max = values.iter().copied().fold(min, f64::max);
    let range = max - min;
    let x_step = if values.len() > 1 {
        width / (values.len() - 1) as f64
    } else {
        0.0
    };

    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let y = if range > 0.0 {
                height - (v - min) / range * height
            } else {
                height / 2.0
            };
            (i as f64 * x_step, y)
        })
        .collect()
}

/// SVG path data (`M x y L x y ...`) through `points`.
pub fn path_data(points: &[(f64, f64)]) -> String {
    let mut path = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        if i > 0 {
            path.push(' ');
        }
        let _ = write!(path, "{} {:.2} {:.2}", if i == 0 { "M" } else { "L" }, x, y);
    }
    path
}

/// SVG sparkline path for `values`.
pub fn sparkline_path(values: &[f64], width: f64, height: f64) -> String {
    path_data(&sparkline_points(values, width, height))
}

/// Close a line path down to the bottom edge so it can be filled as an area.
pub fn area_path(line: &str, width: f64, height: f64) -> String {
    if line.is_empty() {
        return String::new();
    }
    format!("{} L {:.2} {:.2} L 0 {:.2} Z", line, width, height, height)
}

fn colors(rising: bool) -> (&'static str, &'static str) {
    if rising {
        (UP_STROKE, UP_FILL)
    } else {
        (DOWN_STROKE, DOWN_FILL)
    }
}

fn chart_svg(id: &str, points: &[(f64, f64)], width: f64, height: f64, rising: bool) -> String {
    let (stroke, fill) = colors(rising);
    let gradient_id = format!("{}{}", id, if rising { "Up" } else { "Down" });
    let line = path_data(points);
    let area = area_path(&line, width, height);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" preserveAspectRatio="none">"##,
        w = width,
        h = height
    );
    let _ = writeln!(
        svg,
        r##"  <defs><linearGradient id="{gradient_id}" x1="0" y1="0" x2="0" y2="1"><stop offset="0%" stop-color="{fill}" stop-opacity="0.8"/><stop offset="100%" stop-color="#ffffff" stop-opacity="0"/></linearGradient></defs>"##
    );
    if !area.is_empty() {
        let _ = writeln!(svg, r##"  <path d="{area}" fill="url(#{gradient_id})"/>"##);
        let _ = writeln!(
            svg,
            r##"  <path d="{line}" fill="none" stroke="{stroke}" stroke-width="1.8" stroke-linecap="round"/>"##
        );
    }
    if let Some((x, y)) = points.last() {
        let _ = writeln!(
            svg,
            r##"  <circle cx="{x:.2}" cy="{y:.2}" r="2.3" fill="{stroke}"/>"##
        );
    }
    svg.push_str("</svg>\n");
    svg
}

/// Standalone SVG sparkline for a price history.
///
/// Green when the newest value is at or above the oldest, red otherwise.
pub fn sparkline_svg(history: &PriceHistory, width: f64, height: f64) -> String {
    let points = sparkline_points(&history.values(), width, height);
    chart_svg("spark", &points, width, height, history.is_rising())
}

/// Decorative hero chart values in `[0.15, 0.95]`: a sine swell plus noise,
/// shifted down when the trend is falling.
pub fn hero_values<R: Rng + ?Sized>(rng: &mut R, len: usize, trend_up: bool) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let base = 0.5 + (i as f64 * 0.25).sin() * 0.2;
            let noise = rng.random_range(-0.06..=0.06);
            let mut v = base + noise;
            if !trend_up {
                v -= 0.12;
            }
            v.clamp(0.15, 0.95)
        })
        .collect()
}

/// Hero area chart for normalised `values` (each in `[0, 1]`).
pub fn hero_chart_svg(values: &[f64], trend_up: bool) -> String {
    let x_step = if values.len() > 1 {
        HERO_WIDTH / (values.len() - 1) as f64
    } else {
        0.0
    };
    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64 * x_step, HERO_HEIGHT - v * 45.0 - 5.0))
        .collect();
    chart_svg("hero", &points, HERO_WIDTH, HERO_HEIGHT, trend_up)
}

/// One ticker bar row: `SYMBOL  price  ↗ 0.44%  2.5M`.
pub fn ticker_line(quote: &Quote) -> String {
    let arrow = if quote.is_up() { "↗" } else { "↘" };
    format!(
        "{:<10} {:>10.2} {} {:>5.2}% {:>6}",
        quote.symbol,
        quote.price,
        arrow,
        quote.percent.abs(),
        quote.volume.as_deref().unwrap_or("—")
    )
}

/// Full ticker bar: a market status header followed by one row per quote.
pub fn ticker_bar(quotes: &[Quote], status: MarketStatus) -> String {
    let mut bar = format!("Market {}", status);
    for quote in quotes {
        bar.push('\n');
        bar.push_str(&ticker_line(quote));
    }
    bar
}

/// File-name friendly form of a symbol (`NIFTY 50` -> `nifty_50`).
pub fn file_stem(symbol: &str) -> String {
    symbol
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
