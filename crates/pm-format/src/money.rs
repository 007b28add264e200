use pm_ui_types::{MoneyStyle, SymbolPosition};

use crate::number::parse_float;

/// Renders amounts as currency text, e.g. `1 234,50 ₽` for the default
/// `ru-RU` / `RUB` style.
#[derive(Debug, Clone, Default)]
pub struct MoneyFormatter {
    style: MoneyStyle,
}

impl MoneyFormatter {
    pub fn new(style: MoneyStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &MoneyStyle {
        &self.style
    }

    /// `None` for NaN. Halves round away from zero; any negative value,
    /// including one that rounds to zero, keeps its minus sign.
    pub fn format(&self, value: f64) -> Option<String> {
        if value.is_nan() {
            return None;
        }
        let amount = if value.is_infinite() {
            "∞".to_owned()
        } else {
            let (int_part, frac_part) = round_half_up(value.abs(), self.style.fraction_digits);
            let mut out = group(&int_part, &self.style.group_separator);
            if !frac_part.is_empty() {
                out.push_str(&self.style.decimal_separator);
                out.push_str(&frac_part);
            }
            out
        };
        let sign = if value.is_sign_negative() {
            self.style.minus_sign.as_str()
        } else {
            ""
        };
        let s = &self.style;
        Some(match s.symbol_position {
            SymbolPosition::Suffix => format!("{sign}{amount}{}{}", s.symbol_separator, s.symbol),
            SymbolPosition::Prefix => format!("{sign}{}{}{amount}", s.symbol, s.symbol_separator),
        })
    }

    /// Format the number `text` starts with. `None` when it does not start
    /// with one, so the caller leaves the text alone.
    pub fn format_text(&self, text: &str) -> Option<String> {
        self.format(parse_float(text)?)
    }
}

/// Split a non-negative finite value into integer and fraction digit strings,
/// rounded to `digits` fraction digits.
///
/// Rounding starts from the shortest decimal that round-trips to `value`
/// (`1.005`, not `1.00499999999999989...`), as browsers' `Intl.NumberFormat`
/// does.
fn round_half_up(value: f64, digits: usize) -> (String, String) {
    // `{:e}` prints the shortest round-trip digits, e.g. `1.005e0`, `4e-3`.
    let sci = format!("{:e}", value);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i64 = exponent.parse().unwrap_or(0);
    let significand: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();

    // Digits before the decimal point.
    let point = exponent + 1;
    let (int_part, frac_part): (Vec<u8>, Vec<u8>) = if point <= 0 {
        let zeros = std::iter::repeat_n(b'0', point.unsigned_abs() as usize);
        (vec![b'0'], zeros.chain(significand).collect())
    } else {
        let point = point as usize;
        if point >= significand.len() {
            let pad = point - significand.len();
            let int_part = significand.into_iter().chain(std::iter::repeat_n(b'0', pad)).collect();
            (int_part, Vec::new())
        } else {
            (significand[..point].to_vec(), significand[point..].to_vec())
        }
    };

    let mut kept: Vec<u8> = int_part;
    kept.extend((0..digits).map(|i| frac_part.get(i).copied().unwrap_or(b'0')));
    let round_up = frac_part.get(digits).is_some_and(|d| *d >= b'5');
    if round_up {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
        }
    }

    let split = kept.len() - digits;
    let int_digits = String::from_utf8_lossy(&kept[..split]).into_owned();
    let frac_digits = String::from_utf8_lossy(&kept[split..]).into_owned();
    (int_digits, frac_digits)
}

fn group(int_digits: &str, separator: &str) -> String {
    let len = int_digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, c) in int_digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}
