/// Invoice numbers are decimal strings, zero-padded to three digits.
/// Past 999 the string simply grows a digit ("999" -> "1000").
pub fn format_invoice_number(n: i64) -> String {
    format!("{:03}", n)
}

/// Parse a stored invoice number back to its integer value.
/// Returns None for anything that is not a plain decimal number.
pub fn parse_invoice_number(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_to_three_digits() {
        assert_eq!(format_invoice_number(1), "001");
        assert_eq!(format_invoice_number(42), "042");
        assert_eq!(format_invoice_number(999), "999");
    }

    #[test]
    fn test_format_grows_past_three_digits() {
        assert_eq!(format_invoice_number(1000), "1000");
        assert_eq!(format_invoice_number(12345), "12345");
    }

    #[test]
    fn test_parse_round_trip() {
        assert_eq!(parse_invoice_number("001"), Some(1));
        assert_eq!(parse_invoice_number("042"), Some(42));
        assert_eq!(parse_invoice_number("1000"), Some(1000));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_invoice_number(""), None);
        assert_eq!(parse_invoice_number("FAC-12"), None);
        assert_eq!(parse_invoice_number("12a"), None);
        assert_eq!(parse_invoice_number("-3"), None);
    }
}
