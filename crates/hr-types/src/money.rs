//! Amount parsing and display helpers shared by the payroll and employee pages.

/// Parse the leading decimal number of a form field.
///
/// Mirrors how the browser forms read numbers: leading whitespace is skipped,
/// the longest numeric prefix is taken (`"5000 USD"` reads as `5000`), and
/// input without any digits yields `None`.
pub fn parse_amount(input: &str) -> Option<f64> {
    let text = input.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// [`parse_amount`], treating blank or non-numeric input as zero.
pub fn amount_or_zero(input: &str) -> f64 {
    parse_amount(input).unwrap_or(0.0)
}

/// Plain amount with at most two decimals and no trailing zeros: `5050`, `12.5`.
pub fn format_amount(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let mut text = format!("{:.2}", rounded);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

/// Dollar amount with thousands separators: `$5,050`, `-$1,200.5`.
pub fn format_currency(value: f64) -> String {
    let plain = format_amount(value.abs());
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (plain.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && plain != "0" { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{sign}${grouped}.{frac}"),
        None => format!("{sign}${grouped}"),
    }
}
