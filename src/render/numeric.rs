//! Numeric Formatting
//!
//! Formats the decimal strings delivered by the listing API for table cells.
//! Inputs are parsed once into an exact plain-decimal string (scientific
//! notation expanded by digit shifting, never through `f64`) and rounded with
//! `rust_decimal`, half away from zero. Values outside the `Decimal` range
//! fall back to `f64` formatting.
//!
//! None of these functions fail: non-numeric or non-finite input yields
//! `"0"` (or `"0%"` for percentages).

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Significant digits shown after the zero run in tiny-price notation
pub const TINY_SIGNIFICANT_DIGITS: usize = 4;

/// Exponent shifts beyond this are left to `f64` parsing
const MAX_EXPONENT_SHIFT: i64 = 400;

/// Expand scientific notation into a plain decimal string.
///
/// `"4.56e-5"` becomes `"0.0000456"`, `"-1.2E3"` becomes `"-1200"`. Strings
/// without an exponent are returned trimmed and otherwise unchanged.
pub fn to_plain_decimal(input: &str) -> String {
    let s = input.trim();
    let Some(split_at) = s.find(['e', 'E']) else {
        return s.to_string();
    };

    let (mantissa_raw, exp_raw) = (&s[..split_at], &s[split_at + 1..]);
    let exp: i64 = exp_raw.parse().unwrap_or(0);
    if exp.abs() > MAX_EXPONENT_SHIFT {
        return s.to_string();
    }

    let (sign, mantissa) = match mantissa_raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa_raw.strip_prefix('+').unwrap_or(mantissa_raw)),
    };

    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return s.to_string();
    }
    let decimal_pos = mantissa.find('.').unwrap_or(digits.len()) as i64;
    let new_index = decimal_pos + exp;

    if new_index <= 0 {
        let zeros = "0".repeat((-new_index) as usize);
        format!("{}0.{}{}", sign, zeros, digits)
    } else if new_index as usize >= digits.len() {
        let zeros = "0".repeat(new_index as usize - digits.len());
        format!("{}{}{}", sign, digits, zeros)
    } else {
        let (int_part, frac_part) = digits.split_at(new_index as usize);
        format!("{}{}.{}", sign, int_part, frac_part)
    }
}

/// Parse an upstream numeric string into its plain form and float value.
/// Returns `None` for non-numeric or non-finite input.
pub fn parse_number(input: &str) -> Option<(String, f64)> {
    let plain = to_plain_decimal(input);
    let value: f64 = plain.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some((plain, value))
}

/// Abbreviate a magnitude: `1.50B`, `2.35M`, `12.00K`, tiny values in price
/// notation, anything else with two decimals
pub fn format_magnitude(input: &str) -> String {
    let Some((plain, value)) = parse_number(input) else {
        return "0".to_string();
    };

    if value >= 1e9 {
        format!("{}B", scaled_fixed(&plain, value, 1_000_000_000, 2))
    } else if value >= 1e6 {
        format!("{}M", scaled_fixed(&plain, value, 1_000_000, 2))
    } else if value >= 1e3 {
        format!("{}K", scaled_fixed(&plain, value, 1_000, 2))
    } else if value > 0.0 && value < 0.01 {
        format_price(&plain)
    } else {
        fixed(&plain, value, 2)
    }
}

/// Format a token price.
///
/// `>= 1` uses four decimals, `>= 0.01` six decimals. Values in `(0, 0.01)`
/// use the leading-zero-count notation `0.0{N}dddd`, where `N` is the number
/// of zeros right after the decimal point and `dddd` the next four digits,
/// right-padded with zeros: `0.0000456` renders as `0.0{4}4560`.
pub fn format_price(input: &str) -> String {
    let Some((plain, value)) = parse_number(input) else {
        return "0".to_string();
    };

    if value == 0.0 {
        return "0".to_string();
    }
    if value >= 1.0 {
        return fixed(&plain, value, 4);
    }
    if value >= 0.01 {
        return fixed(&plain, value, 6);
    }

    tiny_notation(&plain).unwrap_or_else(|| significant(value, 6))
}

/// Two decimals with an explicit sign: `+12.50%`, `-3.26%`. A negative
/// value that rounds to zero keeps its sign (`-0.00%`).
pub fn format_percentage(input: &str) -> String {
    let Some((plain, value)) = parse_number(input) else {
        return "0%".to_string();
    };
    let sign = if value < 0.0 { "-" } else { "+" };
    let digits = fixed(&plain, value, 2);
    format!("{}{}%", sign, digits.trim_start_matches('-'))
}

/// Render a `[0, 1]` fraction as a percentage with one decimal: `0.5` → `50.0%`
pub fn format_progress(input: &str) -> String {
    let Some((plain, value)) = parse_number(input) else {
        return "0%".to_string();
    };
    let scaled = Decimal::from_str(&plain)
        .ok()
        .and_then(|d| d.checked_mul(Decimal::from(100)));
    let text = match scaled {
        Some(d) => decimal_fixed(d, 1),
        None => format!("{:.1}", value * 100.0),
    };
    format!("{}%", text)
}

fn tiny_notation(plain: &str) -> Option<String> {
    let s = plain.strip_prefix('+').unwrap_or(plain);
    let fraction = s.strip_prefix("0.").or_else(|| s.strip_prefix('.'))?;

    let zeros = fraction.chars().take_while(|c| *c == '0').count();
    let digits = &fraction[zeros..];
    if zeros == 0 || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut significant: String = digits.chars().take(TINY_SIGNIFICANT_DIGITS).collect();
    while significant.len() < TINY_SIGNIFICANT_DIGITS {
        significant.push('0');
    }
    Some(format!("0.0{{{}}}{}", zeros, significant))
}

/// `value` with `digits` significant digits, never in exponent form
fn significant(value: f64, digits: i32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    format!("{:.*}", decimals, value)
}

fn fixed(plain: &str, value: f64, dp: u32) -> String {
    match Decimal::from_str(plain) {
        Ok(d) => decimal_fixed(d, dp),
        Err(_) => format!("{:.*}", dp as usize, value),
    }
}

fn scaled_fixed(plain: &str, value: f64, divisor: u64, dp: u32) -> String {
    let scaled = Decimal::from_str(plain)
        .ok()
        .and_then(|d| d.checked_div(Decimal::from(divisor)));
    match scaled {
        Some(d) => decimal_fixed(d, dp),
        None => format!("{:.*}", dp as usize, value / divisor as f64),
    }
}

fn decimal_fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}
