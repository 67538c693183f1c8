use crate::ast::NodeId;
use crate::ast::NodeMap;
use crate::ast::Syntax;
use crate::operator::OperatorName;

// ECMAScript whitespace accepted around a numeric string.
fn is_ws(c: char) -> bool {
    matches!(
        c,
        '\u{09}' | '\u{0a}' | '\u{0b}' | '\u{0c}' | '\u{0d}' | '\u{20}' | '\u{a0}' | '\u{feff}'
    )
}

/// ToNumber for string values. Accepts optional surrounding whitespace, an
/// optional sign, and either a decimal literal (with optional fraction and
/// exponent) or a hex literal. Returns None when the string does not parse as
/// a number; callers must treat None as "unknown" and leave the tree alone.
pub fn to_number(raw: &str) -> Option<f64> {
    let s = raw.trim_matches(is_ws);
    if s.is_empty() {
        return Some(0.0);
    };
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if hex.is_empty() || !hex.bytes().all(|c| c.is_ascii_hexdigit()) {
            return None;
        };
        let mut v = 0.0f64;
        for c in hex.bytes() {
            let digit = (c as char).to_digit(16).unwrap() as f64;
            v = v * 16.0 + digit;
        }
        return Some(v);
    };
    let (negative, mag) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if mag == "Infinity" {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    };
    if !is_decimal_literal(mag) {
        return None;
    };
    match mag.parse::<f64>() {
        Ok(v) => Some(if negative { -v } else { v }),
        Err(_) => None,
    }
}

// StrDecimalLiteral: digits [. digits] [exp] | . digits [exp]
fn is_decimal_literal(s: &str) -> bool {
    let b = s.as_bytes();
    let mut i = 0;
    let mut digits = 0;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < b.len() && b[i] == b'.' {
        i += 1;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
            digits += 1;
        }
    };
    if digits == 0 {
        return false;
    };
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        i += 1;
        if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
            i += 1;
        };
        if i >= b.len() || !b[i].is_ascii_digit() {
            return false;
        };
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
    };
    i == b.len()
}

/// ToString for number values, following the standard number-to-string
/// algorithm: shortest digit sequence that round-trips, rendered as plain
/// decimal when the decimal point position is in (-6, 21], scientific
/// otherwise.
pub fn to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    };
    if value == f64::INFINITY {
        return "Infinity".to_string();
    };
    if value == f64::NEG_INFINITY {
        return "-Infinity".to_string();
    };
    if value == 0.0 {
        // Both zeros render as "0".
        return "0".to_string();
    };
    let negative = value < 0.0;
    let mag = value.abs();
    // {:e} gives the shortest round-tripping digits in d[.ddd]e<exp> form.
    let sci = format!("{:e}", mag);
    let (mantissa, exp) = match sci.split_once('e') {
        Some(parts) => parts,
        // Unreachable: {:e} always includes an exponent.
        None => (sci.as_str(), "0"),
    };
    let exp = exp.parse::<i32>().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|&c| c != '.').collect();
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    let k = digits.len() as i32;
    // Position of the decimal point relative to the digit sequence.
    let n = exp + 1;
    let mut out = String::new();
    if negative {
        out.push('-');
    };
    if k <= n && n <= 21 {
        out.push_str(digits);
        for _ in 0..(n - k) {
            out.push('0');
        }
    } else if 0 < n && n <= 21 {
        out.push_str(&digits[..n as usize]);
        out.push('.');
        out.push_str(&digits[n as usize..]);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        for _ in 0..-n {
            out.push('0');
        }
        out.push_str(digits);
    } else {
        out.push_str(&digits[..1]);
        if k > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        };
        out.push('e');
        let e = n - 1;
        if e >= 0 {
            out.push('+');
        };
        out.push_str(&e.to_string());
    };
    out
}

/// ToBoolean for expressions whose truthiness is syntactically certain.
/// Restricted to side-effect-free literal shapes so a pass can drop the
/// tested expression entirely.
pub fn to_boolean(map: &NodeMap, n: NodeId) -> Option<bool> {
    match map[n].stx() {
        Syntax::LiteralBooleanExpr { value } => Some(*value),
        Syntax::LiteralNull {} => Some(false),
        Syntax::LiteralNumberExpr { value } => Some(value.0 != 0.0 && !value.0.is_nan()),
        Syntax::LiteralStringExpr { value } => Some(!value.is_empty()),
        Syntax::ParenthesisedExpr { expression } => to_boolean(map, *expression),
        _ => None,
    }
}

/// ToNumber for literal expression shapes, used by constant folding.
pub fn literal_to_number(map: &NodeMap, n: NodeId) -> Option<f64> {
    match map[n].stx() {
        Syntax::LiteralNumberExpr { value } => Some(value.0),
        Syntax::LiteralBooleanExpr { value } => Some(if *value { 1.0 } else { 0.0 }),
        Syntax::LiteralNull {} => Some(0.0),
        Syntax::LiteralStringExpr { value } => to_number(value),
        Syntax::ParenthesisedExpr { expression } => literal_to_number(map, *expression),
        _ => None,
    }
}

/// ToString for literal expression shapes, used by string concatenation
/// folding.
pub fn literal_to_string(map: &NodeMap, n: NodeId) -> Option<String> {
    match map[n].stx() {
        Syntax::LiteralStringExpr { value } => Some(value.clone()),
        Syntax::LiteralNumberExpr { value } => Some(to_string(value.0)),
        Syntax::LiteralBooleanExpr { value } => Some(value.to_string()),
        Syntax::LiteralNull {} => Some("null".to_string()),
        Syntax::ParenthesisedExpr { expression } => literal_to_string(map, *expression),
        _ => None,
    }
}

/// Result of `typeof` for expression shapes whose runtime type is
/// syntactically guaranteed. None means the type cannot be proven.
pub fn static_typeof(map: &NodeMap, n: NodeId) -> Option<&'static str> {
    match map[n].stx() {
        Syntax::LiteralNumberExpr { .. } => Some("number"),
        Syntax::LiteralStringExpr { .. } => Some("string"),
        Syntax::LiteralBooleanExpr { .. } => Some("boolean"),
        Syntax::LiteralNull {} => Some("object"),
        Syntax::LiteralArrayExpr { .. } | Syntax::LiteralObjectExpr { .. } => Some("object"),
        Syntax::FunctionExpr { .. } => Some("function"),
        Syntax::ParenthesisedExpr { expression } => static_typeof(map, *expression),
        Syntax::UnaryExpr { operator, .. } => match operator {
            OperatorName::Void => Some("undefined"),
            OperatorName::Typeof => Some("string"),
            OperatorName::LogicalNot | OperatorName::Delete => Some("boolean"),
            OperatorName::BitwiseNot
            | OperatorName::UnaryNegation
            | OperatorName::UnaryPlus
            | OperatorName::PrefixIncrement
            | OperatorName::PrefixDecrement => Some("number"),
            _ => None,
        },
        Syntax::UnaryPostfixExpr { .. } => Some("number"),
        Syntax::BinaryExpr {
            operator,
            left,
            right,
        } => match operator {
            OperatorName::LessThan
            | OperatorName::LessThanOrEqual
            | OperatorName::GreaterThan
            | OperatorName::GreaterThanOrEqual
            | OperatorName::Equality
            | OperatorName::Inequality
            | OperatorName::StrictEquality
            | OperatorName::StrictInequality
            | OperatorName::In
            | OperatorName::Instanceof => Some("boolean"),
            OperatorName::Subtraction
            | OperatorName::Multiplication
            | OperatorName::Division
            | OperatorName::Remainder
            | OperatorName::BitwiseAnd
            | OperatorName::BitwiseOr
            | OperatorName::BitwiseXor
            | OperatorName::BitwiseLeftShift
            | OperatorName::BitwiseRightShift
            | OperatorName::BitwiseUnsignedRightShift => Some("number"),
            OperatorName::Addition => {
                let l = static_typeof(map, *left);
                let r = static_typeof(map, *right);
                if l == Some("string") || r == Some("string") {
                    Some("string")
                } else if l == Some("number") && r == Some("number") {
                    Some("number")
                } else {
                    None
                }
            }
            OperatorName::LogicalAnd | OperatorName::LogicalOr => {
                let l = static_typeof(map, *left);
                if l.is_some() && l == static_typeof(map, *right) {
                    l
                } else {
                    None
                }
            }
            OperatorName::Assignment => static_typeof(map, *right),
            _ => None,
        },
        Syntax::ConditionalExpr {
            consequent,
            alternate,
            ..
        } => {
            let c = static_typeof(map, *consequent);
            if c.is_some() && c == static_typeof(map, *alternate) {
                c
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_number_decimal() {
        assert_eq!(to_number("  3.14"), Some(3.14));
        assert_eq!(to_number(" 0001000 "), Some(1000.0));
        assert_eq!(to_number("+50"), Some(50.0));
        assert_eq!(to_number("-50"), Some(-50.0));
        assert_eq!(to_number("1e3"), Some(1000.0));
        assert_eq!(to_number(".5"), Some(0.5));
        assert_eq!(to_number("5."), Some(5.0));
        assert_eq!(to_number(""), Some(0.0));
        assert_eq!(to_number("   "), Some(0.0));
        assert_eq!(to_number("Infinity"), Some(f64::INFINITY));
        assert_eq!(to_number("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_to_number_hex() {
        assert_eq!(to_number("0x10"), Some(16.0));
        assert_eq!(to_number("0XFF"), Some(255.0));
        assert_eq!(to_number("0x"), None);
        assert_eq!(to_number("0xG"), None);
    }

    #[test]
    fn test_to_number_unknown() {
        assert_eq!(to_number("A"), None);
        assert_eq!(to_number("12px"), None);
        assert_eq!(to_number("1e"), None);
        assert_eq!(to_number("."), None);
        assert_eq!(to_number("+"), None);
        assert_eq!(to_number("1 2"), None);
    }

    #[test]
    fn test_to_string_plain() {
        assert_eq!(to_string(0.0), "0");
        assert_eq!(to_string(-0.0), "0");
        assert_eq!(to_string(1.0), "1");
        assert_eq!(to_string(-1.5), "-1.5");
        assert_eq!(to_string(1000.0), "1000");
        assert_eq!(to_string(0.5), "0.5");
        assert_eq!(to_string(0.000001), "0.000001");
        assert_eq!(to_string(1e20), "100000000000000000000");
    }

    #[test]
    fn test_to_string_scientific() {
        assert_eq!(to_string(1e21), "1e+21");
        assert_eq!(to_string(1e-7), "1e-7");
        assert_eq!(to_string(1.5e22), "1.5e+22");
        assert_eq!(to_string(-1e21), "-1e+21");
    }

    #[test]
    fn test_to_string_special() {
        assert_eq!(to_string(f64::NAN), "NaN");
        assert_eq!(to_string(f64::INFINITY), "Infinity");
        assert_eq!(to_string(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(to_string(1.0 / 3.0), "0.3333333333333333");
    }
}
