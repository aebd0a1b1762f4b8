//! Price text parsing

use regex::Regex;
use std::sync::OnceLock;

fn non_numeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9.]").unwrap())
}

fn money_component_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Marketplace money strings carry two decimal places; the repair pass
    // keys on that.
    RE.get_or_init(|| Regex::new(r"\d+\.\d{2}").unwrap())
}

/// Strip a price fragment down to digits and the decimal separator, then
/// parse: `"US $1,234.56"` → `1234.56`.
///
/// Converted-currency blocks concatenate two decimal numbers once stripped
/// (`"US $123.45(C $110.20)"` → `"123.45110.20"`); the repair pass isolates
/// the second component, the converted amount, instead of failing outright.
/// Best effort only — it is not a currency converter.
pub fn parse_price_text(text: &str) -> Option<f64> {
    let stripped = non_numeric_re().replace_all(text, "");
    if stripped.is_empty() {
        return None;
    }

    if let Ok(price) = stripped.parse::<f64>() {
        return (price.is_finite() && price >= 0.0).then_some(price);
    }

    // Concatenated-decimal repair: take the second component.
    let components: Vec<&str> = money_component_re()
        .find_iter(&stripped)
        .map(|m| m.as_str())
        .collect();
    if components.len() >= 2 {
        if let Ok(price) = components[1].parse::<f64>() {
            return (price >= 0.0).then_some(price);
        }
    }

    None
}
