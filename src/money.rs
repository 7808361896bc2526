//! Currency codec: integer cents ⇄ pt-BR text.
//!
//! Money is an `i64` count of centavos everywhere in this crate. These three
//! functions are the only place monetary values touch text:
//!
//! - [`format_cents`] renders for display ("R$ 1.234,56");
//! - [`mask_live_input`] re-renders an input field on every keystroke,
//!   interpreting the typed digit run as centavos ("1234" → "R$ 12,34");
//! - [`parse_to_cents`] reads user text back into centavos, returning 0 for
//!   anything unparseable. Call sites treat 0 as "no valid amount entered"
//!   and keep the action blocked, so the safe default never loses data.

/// Renders integer centavos as a pt-BR currency string: "R$ 1.234,56".
/// Negative amounts render a leading minus: "-R$ 0,50".
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let reais = abs / 100;
    let centavos = abs % 100;
    format!("{}R$ {},{:02}", sign, group_thousands(reais), centavos)
}

/// Same as [`format_cents`] but absent values render as zero, matching the
/// display contract of the dashboard cards (a missing balance is "R$ 0,00",
/// never a blank).
pub fn format_cents_opt(cents: Option<i64>) -> String {
    format_cents(cents.unwrap_or(0))
}

/// Live-input mask: strips everything that is not a digit, treats the
/// remaining digit run as centavos and re-renders it as currency. Returns an
/// empty string for an empty digit run so a cleared field stays cleared.
///
/// Applying the mask to its own output is a no-op (the digits of
/// "R$ 12,34" are again "1234"), which is what keeps the field stable while
/// the operator types.
pub fn mask_live_input(raw: &str) -> String {
    let cents = match digits_to_cents(raw) {
        Some(c) => c,
        None => return String::new(),
    };
    format_cents(cents)
}

/// Parses user-entered pt-BR currency text into integer centavos.
///
/// Accepts both masked values ("R$ 12,34") and bare numbers ("12" → 1200,
/// "0,99" → 99). Whitespace, the currency symbol and thousands separators are
/// stripped; the decimal comma becomes a dot. Invalid or empty input yields 0.
pub fn parse_to_cents(value: &str) -> i64 {
    let clean: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .replace("R$", "")
        .replace('.', "")
        .replace(',', ".");

    if clean.is_empty() {
        return 0;
    }

    match clean.parse::<f64>() {
        Ok(n) if n.is_finite() => {
            let cents = (n * 100.0).round();
            if cents >= i64::MAX as f64 {
                i64::MAX
            } else if cents <= i64::MIN as f64 {
                i64::MIN
            } else {
                cents as i64
            }
        }
        _ => 0,
    }
}

/// Collects the digit run of `raw` as centavos, saturating at `i64::MAX` for
/// pathological inputs. `None` when there are no digits at all.
fn digits_to_cents(raw: &str) -> Option<i64> {
    let mut seen = false;
    let mut acc: i64 = 0;
    for c in raw.chars() {
        if let Some(d) = c.to_digit(10) {
            seen = true;
            acc = acc
                .saturating_mul(10)
                .saturating_add(i64::from(d));
        }
    }
    seen.then_some(acc)
}

fn group_thousands(mut value: u64) -> String {
    if value < 1000 {
        return value.to_string();
    }
    let mut groups = Vec::new();
    while value >= 1000 {
        groups.push(format!("{:03}", value % 1000));
        value /= 1000;
    }
    let mut out = value.to_string();
    for g in groups.iter().rev() {
        out.push('.');
        out.push_str(g);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // ==================== Formatting ====================

    #[rstest]
    #[case(0, "R$ 0,00")]
    #[case(5, "R$ 0,05")]
    #[case(99, "R$ 0,99")]
    #[case(1000, "R$ 10,00")]
    #[case(123_456, "R$ 1.234,56")]
    #[case(100_000_000, "R$ 1.000.000,00")]
    #[case(-50, "-R$ 0,50")]
    fn test_format_cents(#[case] cents: i64, #[case] expected: &str) {
        assert_eq!(format_cents(cents), expected);
    }

    #[test]
    fn test_format_cents_opt_treats_none_as_zero() {
        assert_eq!(format_cents_opt(None), "R$ 0,00");
        assert_eq!(format_cents_opt(Some(250)), "R$ 2,50");
    }

    // ==================== Masking ====================

    #[rstest]
    #[case("", "")]
    #[case("R$ ", "")]
    #[case("abc", "")]
    #[case("1", "R$ 0,01")]
    #[case("1234", "R$ 12,34")]
    #[case("12a34", "R$ 12,34")]
    #[case("0000", "R$ 0,00")]
    fn test_mask_live_input(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(mask_live_input(raw), expected);
    }

    #[test]
    fn test_mask_is_idempotent_once_formatted() {
        let masked = mask_live_input("123456");
        assert_eq!(masked, "R$ 1.234,56");
        assert_eq!(mask_live_input(&masked), masked);
    }

    #[test]
    fn test_mask_saturates_instead_of_overflowing() {
        let huge = "9".repeat(40);
        assert_eq!(mask_live_input(&huge), format_cents(i64::MAX));
    }

    // ==================== Parsing ====================

    #[rstest]
    #[case("R$ 12,34", 1234)]
    #[case("12", 1200)]
    #[case("0,99", 99)]
    #[case("1.234,56", 123_456)]
    #[case("  R$ 1.000,00  ", 100_000)]
    fn test_parse_to_cents(#[case] text: &str, #[case] expected: i64) {
        assert_eq!(parse_to_cents(text), expected);
    }

    #[rstest]
    #[case("")]
    #[case("R$")]
    #[case("abc")]
    #[case("   ")]
    fn test_parse_invalid_input_is_zero(#[case] text: &str) {
        assert_eq!(parse_to_cents(text), 0);
    }

    // ==================== Round trip ====================

    #[test]
    fn test_mask_of_formatted_parse_stabilizes() {
        for s in ["R$ 12,34", "1.234,56", "0,05", "R$ 999.999,99"] {
            let canonical = mask_live_input(&format_cents(parse_to_cents(s)));
            assert_eq!(mask_live_input(&canonical), canonical, "input {:?}", s);
        }
    }
}
