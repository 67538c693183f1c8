use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::source::SourceRange;

/// Parses the raw source text of a number token into its value.
pub fn parse_number_value(loc: SourceRange, raw: &str) -> SyntaxResult<f64> {
    let malformed = || SyntaxError::from_loc(loc, SyntaxErrorType::MalformedLiteralNumber, None);
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        let mut v = 0.0f64;
        for c in hex.chars() {
            let digit = c.to_digit(16).ok_or_else(malformed)? as f64;
            v = v * 16.0 + digit;
        }
        return Ok(v);
    };
    raw.parse::<f64>().map_err(|_| malformed())
}

/// Parses the raw source text of a string token, including the surrounding
/// quotes, into its value.
pub fn parse_string_value(loc: SourceRange, raw: &str) -> SyntaxResult<String> {
    let bytes = raw.as_bytes();
    debug_assert!(bytes.len() >= 2);
    let body = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        };
        let esc = chars
            .next()
            .ok_or_else(|| SyntaxError::from_loc(loc, SyntaxErrorType::UnexpectedEnd, None))?;
        match esc {
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0b}'),
            '0' => out.push('\0'),
            'x' => {
                let hi = chars.next();
                let lo = chars.next();
                let value = match (hi, lo) {
                    (Some(hi), Some(lo)) => match (hi.to_digit(16), lo.to_digit(16)) {
                        (Some(hi), Some(lo)) => Some(hi * 16 + lo),
                        _ => None,
                    },
                    _ => None,
                };
                match value.and_then(char::from_u32) {
                    Some(c) => out.push(c),
                    None => {
                        return Err(SyntaxError::from_loc(
                            loc,
                            SyntaxErrorType::InvalidCharacterEscape,
                            None,
                        ))
                    }
                };
            }
            'u' => {
                let mut value = 0u32;
                for _ in 0..4 {
                    let digit = chars.next().and_then(|c| c.to_digit(16)).ok_or_else(|| {
                        SyntaxError::from_loc(loc, SyntaxErrorType::InvalidCharacterEscape, None)
                    })?;
                    value = value * 16 + digit;
                }
                match char::from_u32(value) {
                    Some(c) => out.push(c),
                    None => {
                        return Err(SyntaxError::from_loc(
                            loc,
                            SyntaxErrorType::InvalidCharacterEscape,
                            None,
                        ))
                    }
                };
            }
            // Line continuation contributes nothing.
            '\n' => {}
            '\r' => {
                // CRLF counts as one line terminator.
                let mut lookahead = chars.clone();
                if lookahead.next() == Some('\n') {
                    chars = lookahead;
                };
            }
            other => out.push(other),
        };
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceRange {
        SourceRange::anonymous()
    }

    #[test]
    fn test_parse_number_value() {
        assert_eq!(parse_number_value(loc(), "1").unwrap(), 1.0);
        assert_eq!(parse_number_value(loc(), "1.5").unwrap(), 1.5);
        assert_eq!(parse_number_value(loc(), ".5").unwrap(), 0.5);
        assert_eq!(parse_number_value(loc(), "1e3").unwrap(), 1000.0);
        assert_eq!(parse_number_value(loc(), "0xFF").unwrap(), 255.0);
    }

    #[test]
    fn test_parse_string_value() {
        assert_eq!(parse_string_value(loc(), r#""a\nb""#).unwrap(), "a\nb");
        assert_eq!(parse_string_value(loc(), r#"'it\'s'"#).unwrap(), "it's");
        assert_eq!(parse_string_value(loc(), r#""\x41B""#).unwrap(), "AB");
        assert_eq!(parse_string_value(loc(), "\"a\\\nb\"").unwrap(), "ab");
    }
}
