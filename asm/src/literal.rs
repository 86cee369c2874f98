#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralError {
    Malformed,
    OutOfRange,
}

/// Parse `[-][0x|0b]digits` into a signed 32-bit value.
pub fn parse_with_prefix(text: &str) -> Result<i32, LiteralError> {
    let (neg, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let lower = body.to_ascii_lowercase();
    let (radix, digits) = if let Some(d) = lower.strip_prefix("0x") {
        (16, d)
    } else if let Some(d) = lower.strip_prefix("0b") {
        (2, d)
    } else {
        (10, lower.as_str())
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(LiteralError::Malformed);
    }
    let magnitude = i64::from_str_radix(digits, radix).map_err(|_| LiteralError::OutOfRange)?;
    let value = if neg { -magnitude } else { magnitude };
    i32::try_from(value).map_err(|_| LiteralError::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes() {
        assert_eq!(parse_with_prefix("42"), Ok(42));
        assert_eq!(parse_with_prefix("-7"), Ok(-7));
        assert_eq!(parse_with_prefix("0x1F"), Ok(31));
        assert_eq!(parse_with_prefix("0B101"), Ok(5));
        assert_eq!(parse_with_prefix("-0x10"), Ok(-16));
    }

    #[test]
    fn bounds() {
        assert_eq!(parse_with_prefix("2147483647"), Ok(i32::MAX));
        assert_eq!(parse_with_prefix("-2147483648"), Ok(i32::MIN));
        assert_eq!(parse_with_prefix("2147483648"), Err(LiteralError::OutOfRange));
        assert_eq!(parse_with_prefix("-2147483649"), Err(LiteralError::OutOfRange));
        assert_eq!(parse_with_prefix("0xFFFFFFFF"), Err(LiteralError::OutOfRange));
        assert_eq!(
            parse_with_prefix("99999999999999999999999"),
            Err(LiteralError::OutOfRange)
        );
    }

    #[test]
    fn malformed() {
        for text in ["", "-", "0x", "12a", "0b102", "+5", "--1", "R1", "1b"] {
            assert_eq!(parse_with_prefix(text), Err(LiteralError::Malformed), "{text}");
        }
    }
}
