/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use health_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let magnitude = round_to(value.abs(), decimals);
    let text = format!("{:.*}", decimals as usize, magnitude);
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + whole.len() / 3 + 1);
    if value < 0.0 && magnitude != 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Round `value` to `decimals` places, as stored in exported files.
///
/// ```
/// use health_core::formatting::round_to;
///
/// assert_eq!(round_to(4.499_999, 2), 4.5);
/// assert_eq!(round_to(333.333_3, 2), 333.33);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Format an optional statistic, using `placeholder` when there is no data.
pub fn format_optional(value: Option<f64>, decimals: u32, placeholder: &str) -> String {
    match value {
        Some(v) => format_number(v, decimals),
        None => placeholder.to_string(),
    }
}

/// Insert commas every three digits from the right of an ASCII digit string.
fn group_thousands(digits: &str) -> String {
    let mut groups = Vec::with_capacity(digits.len() / 3 + 1);
    let mut end = digits.len();
    while end > 3 {
        groups.push(&digits[end - 3..end]);
        end -= 3;
    }
    groups.push(&digits[..end]);
    groups.reverse();
    groups.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_zero() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(0.0, 2), "0.00");
    }

    #[test]
    fn test_format_number_with_thousands() {
        assert_eq!(format_number(1_234.5, 2), "1,234.50");
        assert_eq!(format_number(1_000.0, 0), "1,000");
    }

    #[test]
    fn test_format_number_rounds_hours() {
        assert_eq!(format_number(7.999_999, 2), "8.00");
        assert_eq!(format_number(4.5, 2), "4.50");
    }

    #[test]
    fn test_format_number_negative_zero_has_no_sign() {
        assert_eq!(format_number(-0.001, 2), "0.00");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("7"), "7");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("12345678"), "12,345,678");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(8.0, 2), 8.0);
        assert_eq!(round_to(1.236, 2), 1.24);
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some(300.0), 2, "n/a"), "300.00");
        assert_eq!(format_optional(None, 2, "n/a"), "n/a");
    }
}
