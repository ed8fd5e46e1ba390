// Display formatting shared by the backend envelopes and the dashboard views
//
// - BRL currency (pt-BR): "R$ 12.345,60" with a non-breaking space
// - Processing time labels: "850ns", "1.5µs", "12.3ms", "1m30s"
// - HTML escaping for every value interpolated into markup

use std::time::Duration;

/// Non-breaking space used by pt-BR currency formatting
pub const NBSP: char = '\u{a0}';

/// Format a revenue amount as Brazilian Real
///
/// Rounds to cents, groups thousands with '.', uses ',' as decimal separator.
pub fn format_brl(value: f64) -> String {
    if !value.is_finite() {
        return format!("R${}{}", NBSP, value);
    }

    let cents = (value.abs() * 100.0).round() as u128;
    let whole = cents / 100;
    let fraction = cents % 100;

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };

    format!("{}R${}{},{:02}", sign, NBSP, group_thousands(whole), fraction)
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    grouped
}

/// Format an elapsed duration the way the API labels processing time
///
/// Picks the largest unit below one second (ns, µs, ms) and trims trailing
/// zeros; durations of a second or more use h/m/s components.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return format!("{}µs", with_fraction(nanos / 1_000, nanos % 1_000, 3));
    }
    if nanos < 1_000_000_000 {
        return format!(
            "{}ms",
            with_fraction(nanos / 1_000_000, nanos % 1_000_000, 6)
        );
    }

    let total_secs = nanos / 1_000_000_000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h{}m", hours, minutes));
    } else if minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    out.push_str(&with_fraction(seconds, nanos % 1_000_000_000, 9));
    out.push('s');
    out
}

fn with_fraction(whole: u128, fraction: u128, digits: usize) -> String {
    if fraction == 0 {
        return whole.to_string();
    }
    let padded = format!("{:0width$}", fraction, width = digits);
    format!("{}.{}", whole, padded.trim_end_matches('0'))
}

/// Escape text for safe interpolation into HTML content and attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
