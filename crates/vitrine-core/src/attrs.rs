//! Typed readers for `data-*` configuration attributes.
//!
//! Every widget config is populated through these functions once, at
//! construction, so attribute coercion rules live in one place.

use crate::markup::Markup;

/// Interpret a boolean-ish attribute value.
///
/// - `None` (absent) → `default`
/// - empty, or equal to the attribute name (`data-x="data-x"`) → `true`
/// - `false` / `0` (any case) → `false`
/// - `true` / `1` → `true`
/// - anything else → `true`
#[must_use]
pub fn parse_flag(name: &str, raw: Option<&str>, default: bool) -> bool {
    let Some(raw) = raw else {
        return default;
    };
    if raw.is_empty() || raw == name {
        return true;
    }
    !matches!(raw.to_ascii_lowercase().as_str(), "false" | "0")
}

/// Read a boolean-ish attribute from an element.
pub fn read_flag<M: Markup>(el: Option<&M>, name: &str, default: bool) -> bool {
    match el {
        Some(el) => parse_flag(name, el.attr(name).as_deref(), default),
        None => default,
    }
}

/// Read a non-empty string attribute.
///
/// Empty values count as absent, matching `dataset.x || fallback`.
pub fn read_string<M: Markup>(el: Option<&M>, name: &str) -> Option<String> {
    el.and_then(|el| el.attr(name)).filter(|v| !v.is_empty())
}

/// Parse a finite number the way `Number(v)` does for attribute strings.
///
/// Surrounding whitespace is ignored and an empty string is zero.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Read a finite numeric attribute, `None` when absent or not a number.
pub fn read_number<M: Markup>(el: Option<&M>, name: &str) -> Option<f64> {
    el.and_then(|el| el.attr(name)).and_then(|raw| parse_number(&raw))
}

/// Parse the leading integer of a string like `parseInt(v, 10)`: leading
/// whitespace, an optional sign, then as many digits as there are.
#[must_use]
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    let n: i64 = digits.parse().ok()?;
    Some(if negative { -n } else { n })
}

/// Read a non-negative integer attribute.
pub fn read_index<M: Markup>(el: &M, name: &str) -> Option<usize> {
    el.attr(name)?.trim().parse::<usize>().ok()
}
