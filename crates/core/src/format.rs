use numfmt::{Formatter, Precision};

/// Format a monetary value with its currency code, e.g. `"BRL 9,572.96"`
/// or `"-USD 1,234.50"`.
///
/// A locale-lite stand-in for the frontend's locale-aware formatter: two
/// decimals, thousands separators, code-prefixed. Real locale rules
/// (symbol placement, decimal comma) belong to the UI layer.
#[must_use]
pub fn currency(value: f64, code: &str) -> String {
    let prefix = if value < 0.0 {
        format!("-{code} ")
    } else {
        format!("{code} ")
    };

    let fmt = match Formatter::currency(&prefix) {
        Ok(f) => f.precision(Precision::Decimals(2)),
        // Prefix too long for the formatter's buffer — fall back to a
        // plain rendering rather than panicking on odd input.
        Err(_) => return format!("{code} {value:.2}"),
    };

    if value == 0.0 {
        // Zero is hardcoded as "0" by numfmt
        return format!("{code} 0.00");
    }

    let mut formatted = fmt.fmt_string(value.abs());

    // numfmt omits the last trailing zero ("12.30" renders as "12.3"),
    // so we must add it ourselves.
    if formatted.as_bytes()[formatted.len() - 3] != b'.' {
        formatted = format!("{formatted}0");
    }

    formatted
}
