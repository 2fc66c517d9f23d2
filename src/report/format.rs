//! Display formatting for statistics.

/// Format a 0-100 rate as a percentage string.
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}

/// Whole points print without decimals, half points with one.
pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{:.0}", points)
    } else {
        format!("{:.1}", points)
    }
}

/// Ordinal finishing position (`1st`, `22nd`, `13th`); `-` when there is none.
pub fn format_position(position: u32) -> String {
    if position == 0 {
        return "-".to_string();
    }

    let suffix = match (position % 10, position % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", position, suffix)
}

/// Average position with two decimals; `-` when nothing was averaged.
pub fn format_average(value: f64) -> String {
    if value == 0.0 {
        "-".to_string()
    } else {
        format!("{:.2}", value)
    }
}

/// Signed delta with two decimals (`+1.50`, `-0.25`).
pub fn format_delta(value: f64) -> String {
    format!("{:+.2}", value)
}
