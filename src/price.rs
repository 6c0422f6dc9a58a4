// 💲 Price Normalization - Any price field becomes a number, never an error
//
// Catalog prices are hand-typed: "49.99", "49.99 USD", 49.99, "", null, "TBD".
// normalize() reads the leading numeric portion and falls back to 0.

use crate::catalog::PriceValue;

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Best-effort numeric value of a price field.
///
/// - absent, empty, non-numeric or non-finite -> `0.0`
/// - text -> leading float literal, trailing content ignored
/// - other JSON shapes -> read as text first (`[5]` -> `5`)
/// - negative values pass through unclamped
pub fn normalize(value: Option<&PriceValue>) -> f64 {
    let parsed = match value {
        Some(PriceValue::Number(n)) => *n,
        Some(PriceValue::Text(text)) => parse_leading_float(text).unwrap_or(0.0),
        Some(PriceValue::Other(other)) => parse_leading_float(&coerce_text(other)).unwrap_or(0.0),
        None => 0.0,
    };

    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// Text a loosely typed value reads as: arrays join their elements with
/// commas (`[5]` -> `"5"`, `[]` -> `""`), null reads as empty, objects never
/// read as a number.
fn coerce_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items.iter().map(coerce_text).collect::<Vec<_>>().join(","),
        serde_json::Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Parse the longest float literal at the start of `text`.
///
/// Leading whitespace is skipped. Accepts an optional sign, digits with an
/// optional fraction (`"5."`, `".5"`) and an exponent only when it has digits
/// (`"1e"` reads as `1`).
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let s = text.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - int_start;

    let mut frac_digits = 0;
    if end < len && bytes[end] == b'.' {
        let mut j = end + 1;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = j - end - 1;
        if int_digits > 0 || frac_digits > 0 {
            end = j;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut j = end + 1;
        if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    s[..end].parse::<f64>().ok()
}

// ============================================================================
// DISPLAY
// ============================================================================

/// Fixed-point text with `digits` decimals. Exact ties round away from zero
/// (`0.125` -> `"0.13"`), which `format!("{:.2}")` does not do.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let negative = value < 0.0;
    // Enough extra places to see the exact binary expansion past the cut
    let expanded = format!("{:.*}", digits + 32, value.abs());
    let (int_part, frac_part) = expanded.split_once('.').unwrap_or((expanded.as_str(), ""));

    let mut buf: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(digits))
        .collect();

    let round_up = frac_part.as_bytes().get(digits).is_some_and(|d| *d >= b'5');
    if round_up {
        let mut i = buf.len();
        loop {
            if i == 0 {
                buf.insert(0, b'1');
                break;
            }
            i -= 1;
            if buf[i] == b'9' {
                buf[i] = b'0';
            } else {
                buf[i] += 1;
                break;
            }
        }
    }

    let split = buf.len() - digits;
    let mut out = String::with_capacity(buf.len() + 2);
    if negative {
        out.push('-');
    }
    out.extend(buf[..split].iter().map(|b| *b as char));
    if digits > 0 {
        out.push('.');
        out.extend(buf[split..].iter().map(|b| *b as char));
    }
    out
}

/// Two-decimal amount, as shown in every totals field.
pub fn format_amount(value: f64) -> String {
    to_fixed(value, 2)
}

/// Amount with a leading `$`, as shown on item cards.
pub fn format_currency(value: f64) -> String {
    format!("${}", format_amount(value))
}

/// Discount percentage with two decimals, only when both prices are positive.
pub fn discount_percent(list: f64, sale: f64) -> Option<String> {
    if list > 0.0 && sale > 0.0 {
        Some(to_fixed((list - sale) / list * 100.0, 2))
    } else {
        None
    }
}
