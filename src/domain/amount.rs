use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Decimal places kept on the fiat (receive) side.
pub const FIAT_DECIMALS: u32 = 2;
/// Decimal places kept on the crypto (pay) side.
pub const CRYPTO_DECIMALS: u32 = 4;

/// Parses user input the lenient way an amount box does.
///
/// The longest leading numeric prefix is honoured, exponent included
/// (`"12abc"` is 12, `".5"` is 0.5, `"1e3"` is 1000, `"2e"` is 2). Anything
/// without a numeric prefix, too large to represent, or too small for 28
/// decimal places is zero. This never fails.
pub fn parse_amount(input: &str) -> Decimal {
    let mut chars = input.trim_start().chars().peekable();
    let mut sign = String::new();
    if let Some(&c) = chars.peek()
        && (c == '-' || c == '+')
    {
        if c == '-' {
            sign.push('-');
        }
        chars.next();
    }

    let mut whole = String::new();
    while let Some(&c) = chars.peek()
        && c.is_ascii_digit()
    {
        whole.push(c);
        chars.next();
    }

    let mut fraction = String::new();
    if chars.peek() == Some(&'.') {
        chars.next();
        while let Some(&c) = chars.peek()
            && c.is_ascii_digit()
        {
            fraction.push(c);
            chars.next();
        }
    }

    if whole.is_empty() && fraction.is_empty() {
        return Decimal::ZERO;
    }
    if whole.is_empty() {
        whole.push('0');
    }

    let literal = if fraction.is_empty() {
        format!("{sign}{whole}")
    } else {
        format!("{sign}{whole}.{fraction}")
    };
    match exponent(chars) {
        Some(exp) => Decimal::from_scientific(&format!("{literal}e{exp}")),
        None => Decimal::from_str(&literal),
    }
    .unwrap_or(Decimal::ZERO)
}

/// A trailing `e`/`E` exponent, only when at least one digit follows it.
fn exponent(mut chars: impl Iterator<Item = char>) -> Option<String> {
    if !matches!(chars.next(), Some('e' | 'E')) {
        return None;
    }
    let mut chars = chars.peekable();
    let mut exp = String::new();
    if let Some(&c) = chars.peek()
        && (c == '-' || c == '+')
    {
        if c == '-' {
            exp.push('-');
        }
        chars.next();
    }
    let digits: String = chars.take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    exp.push_str(&digits);
    Some(exp)
}

/// Rounds half away from zero and renders exactly `decimals` places.
///
/// Values too close to the decimal range limit to carry that many places are
/// treated like any other overflow and render as zero.
pub fn format_fixed(value: Decimal, decimals: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimals);
    if rounded.scale() != decimals {
        return Decimal::new(0, decimals).to_string();
    }
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_amount("2"), dec!(2));
        assert_eq!(parse_amount("1.25"), dec!(1.25));
        assert_eq!(parse_amount("  0.0001"), dec!(0.0001));
        assert_eq!(parse_amount("-3.5"), dec!(-3.5));
    }

    #[test]
    fn test_parse_uses_numeric_prefix() {
        assert_eq!(parse_amount("12abc"), dec!(12));
        assert_eq!(parse_amount(".5"), dec!(0.5));
        assert_eq!(parse_amount("5."), dec!(5));
        assert_eq!(parse_amount("1.2.3"), dec!(1.2));
    }

    #[test]
    fn test_parse_exponent() {
        assert_eq!(parse_amount("1e3"), dec!(1000));
        assert_eq!(parse_amount("2.5E2"), dec!(250));
        assert_eq!(parse_amount("1e+2"), dec!(100));
        assert_eq!(parse_amount("15e-1"), dec!(1.5));
        assert_eq!(parse_amount(".5e1"), dec!(5));
        assert_eq!(parse_amount("-2e2"), dec!(-200));
    }

    #[test]
    fn test_parse_dangling_exponent_is_ignored() {
        assert_eq!(parse_amount("2e"), dec!(2));
        assert_eq!(parse_amount("2e-"), dec!(2));
        assert_eq!(parse_amount("3ex"), dec!(3));
        assert_eq!(parse_amount("4e2x"), dec!(400));
    }

    #[test]
    fn test_parse_out_of_range_exponent_is_zero() {
        assert_eq!(parse_amount("1e40"), Decimal::ZERO);
        assert_eq!(parse_amount("1e-40"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_garbage_is_zero() {
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount("."), Decimal::ZERO);
        assert_eq!(parse_amount("-"), Decimal::ZERO);
        assert_eq!(parse_amount("99999999999999999999999999999999999"), Decimal::ZERO);
    }

    #[test]
    fn test_format_fixed_pads_and_rounds() {
        assert_eq!(format_fixed(dec!(7000000), FIAT_DECIMALS), "7000000.00");
        assert_eq!(format_fixed(dec!(1.005), FIAT_DECIMALS), "1.01");
        assert_eq!(format_fixed(dec!(0.00005), CRYPTO_DECIMALS), "0.0001");
        assert_eq!(format_fixed(dec!(2.5), CRYPTO_DECIMALS), "2.5000");
        assert_eq!(format_fixed(Decimal::ZERO, FIAT_DECIMALS), "0.00");
    }

    #[test]
    fn test_format_fixed_without_room_for_places_is_zero() {
        assert_eq!(format_fixed(Decimal::MAX, FIAT_DECIMALS), "0.00");
        assert_eq!(format_fixed(Decimal::MIN, CRYPTO_DECIMALS), "0.0000");
    }
}
