/// Formats a count with thousands separators (dots)
///
/// `format_number(1234567)` gives `"1.234.567"`.
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Indian-style short money label used on deal-size buckets: 1L = 100 000
pub fn format_lakh(amount: f64) -> String {
    const LAKH: f64 = 100_000.0;
    let lakhs = amount / LAKH;
    if lakhs.fract() == 0.0 {
        format!("{}L", lakhs as i64)
    } else {
        format!("{:.1}L", lakhs)
    }
}

/// Rounds to one decimal, as percentages are shown
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1.000");
        assert_eq!(format_number(1234567), "1.234.567");
    }

    #[test]
    fn test_format_lakh() {
        assert_eq!(format_lakh(100_000.0), "1L");
        assert_eq!(format_lakh(5_000_000.0), "50L");
        assert_eq!(format_lakh(250_000.0), "2.5L");
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(33.333), 33.3);
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(round1(0.0), 0.0);
    }
}
