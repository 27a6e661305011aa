// Formatting helpers shared by the LaTeX renderer and the console preview.
//
// Numbers are formatted the way the report expects them: thousands
// separators everywhere, no decimals for counts, one decimal for areas and
// densities.
use num_format::{Locale, ToFormattedString};

/// Placeholder for a city with no row for a destination category.
pub const MISSING_CELL: &str = "--";

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.8`).
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let neg = n.is_sign_negative();
    // Round first so a carry (999.96 -> 1000.0) lands in the integer part.
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Integer parts beyond i64 are left without separators.
    let mut res = match int_part.parse::<i64>() {
        Ok(v) => v.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

pub fn format_count(n: Option<i64>) -> String {
    match n {
        Some(v) => format_int(v),
        None => MISSING_CELL.to_string(),
    }
}

/// Escape characters that carry meaning in LaTeX text.
pub fn escape_latex(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash "),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde "),
            '^' => out.push_str("\\textasciicircum "),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_get_thousands_separators() {
        assert_eq!(format_int(1_234_567i64), "1,234,567");
        assert_eq!(format_int(50_000i64), "50,000");
        assert_eq!(format_int(7i64), "7");
    }

    #[test]
    fn floats_round_to_requested_decimals() {
        assert_eq!(format_number(1234.5678, 1), "1,234.6");
        assert_eq!(format_number(120.4, 1), "120.4");
        assert_eq!(format_number(999.96, 1), "1,000.0");
        assert_eq!(format_number(-2500.0, 1), "-2,500.0");
        assert_eq!(format_number(1234567.0, 0), "1,234,567");
    }

    #[test]
    fn non_finite_values_are_spelled_out() {
        assert_eq!(format_number(f64::NAN, 1), "nan");
        assert_eq!(format_number(f64::INFINITY, 1), "inf");
    }

    #[test]
    fn missing_counts_use_placeholder() {
        assert_eq!(format_count(None), MISSING_CELL);
        assert_eq!(format_count(Some(340)), "340");
    }

    #[test]
    fn latex_specials_are_escaped() {
        assert_eq!(escape_latex("Fresh Food / Market"), "Fresh Food / Market");
        assert_eq!(escape_latex("A&B 50% #1_x"), "A\\&B 50\\% \\#1\\_x");
        assert_eq!(escape_latex("a~b"), "a\\textasciitilde b");
    }
}
