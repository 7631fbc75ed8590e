//! Terminal rendering for curves and running animations

use std::collections::BTreeMap;
use std::fmt::Write;

use cadence_animation::Easing;

const FILLED: char = '█';
const EMPTY: char = '·';

/// Plot an easing curve as a `width` x `height` character grid
///
/// Overshooting curves are clipped to the plot area.
pub fn plot_curve(easing: Easing, width: usize, height: usize) -> String {
    let width = width.max(2);
    let height = height.max(2);
    let mut grid = vec![vec![' '; width]; height];

    for col in 0..width {
        let t = col as f64 / (width - 1) as f64;
        let value = easing.apply(t, 0.0, 1.0, 1.0);
        let row = ((1.0 - value) * (height - 1) as f64).round();
        if (0.0..=(height - 1) as f64).contains(&row) {
            grid[row as usize][col] = '*';
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", easing);
    for (i, row) in grid.iter().enumerate() {
        let label = if i == 0 {
            "1.0"
        } else if i == height - 1 {
            "0.0"
        } else {
            ""
        };
        let line: String = row.iter().collect();
        let _ = writeln!(out, "{:>4} |{}", label, line);
    }
    let _ = writeln!(out, "     +{}", "-".repeat(width));
    out
}

/// A horizontal bar showing where `value` sits between `min` and `max`
pub fn bar(value: f64, min: f64, max: f64, width: usize) -> String {
    let span = max - min;
    let fraction = if span.abs() < f64::EPSILON {
        1.0
    } else {
        ((value - min) / span).clamp(0.0, 1.0)
    };
    let filled = (fraction * width as f64).round() as usize;

    let mut out = String::with_capacity(width * 3);
    out.extend(std::iter::repeat(FILLED).take(filled));
    out.extend(std::iter::repeat(EMPTY).take(width - filled));
    out
}

/// One output line for a frame: the time offset and a bar per property
pub fn frame_line(
    elapsed_ms: f64,
    values: &BTreeMap<String, f64>,
    ranges: &BTreeMap<String, (f64, f64)>,
    bar_width: usize,
) -> String {
    let mut line = format!("{:>8.1}ms", elapsed_ms);
    for (property, value) in values {
        let (min, max) = ranges.get(property).copied().unwrap_or((0.0, 1.0));
        let _ = write!(
            line,
            "  {} {:>9.3} {}",
            property,
            value,
            bar(*value, min.min(max), min.max(max), bar_width)
        );
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_fill() {
        assert_eq!(bar(0.0, 0.0, 10.0, 4), "····");
        assert_eq!(bar(5.0, 0.0, 10.0, 4), "██··");
        assert_eq!(bar(10.0, 0.0, 10.0, 4), "████");
        // Out-of-range values are clamped
        assert_eq!(bar(20.0, 0.0, 10.0, 4), "████");
        assert_eq!(bar(3.0, 3.0, 3.0, 2), "██");
    }

    #[test]
    fn test_plot_linear_hits_corners() {
        let plot = plot_curve(Easing::Linear, 5, 5);
        let lines: Vec<&str> = plot.lines().collect();

        assert_eq!(lines[0], "linear");
        assert_eq!(lines[1], " 1.0 |    *");
        assert_eq!(lines[5], " 0.0 |*    ");
        assert_eq!(lines[6], "     +-----");
    }

    #[test]
    fn test_frame_line() {
        let values = BTreeMap::from([("x".to_string(), 50.0)]);
        let ranges = BTreeMap::from([("x".to_string(), (100.0, 0.0))]);

        let line = frame_line(16.0, &values, &ranges, 4);
        assert_eq!(line, "    16.0ms  x    50.000 ██··");
    }
}
