//! Number formatting for tooltips and text output.

/// Formats a count with comma thousands separators (`1234567` →
/// `"1,234,567"`). Fractions are rounded away; `NaN` is shown as `"NaN"`.
#[must_use]
pub fn format_count(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value.is_sign_negative() && digits != "0" {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1000.0), "1,000");
        assert_eq!(format_count(1_234_567.0), "1,234,567");
    }

    #[test]
    fn keeps_sign_and_nan() {
        assert_eq!(format_count(-12_345.0), "-12,345");
        assert_eq!(format_count(-0.0), "0");
        assert_eq!(format_count(f64::NAN), "NaN");
    }
}
