//! Numeric display policy
//!
//! Turns reals and integers into the text a value format asks for. The
//! exponent is returned separately so the caller can decide whether it is
//! drawn as a superscript or inline.

use doc_model::{LetterCase, NumericStyle, SignMode, ValueFormat};

/// Magnitudes below `10^-4` switch concise styles to exponent form
const CONCISE_MINIMUM_EXPONENT: i32 = -4;

/// Exponent at which concise styles switch to exponent form when the
/// precision is inferred
const CONCISE_MAXIMUM_EXPONENT: i32 = 6;

const INFINITY: &str = "\u{221E}";

/// A formatted number split into mantissa and optional power of ten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericText {
    pub mantissa: String,
    pub exponent: Option<String>,
}

impl NumericText {
    fn plain(mantissa: String) -> Self {
        Self {
            mantissa,
            exponent: None,
        }
    }

    /// Single line rendering using an `e`/`E` exponent marker
    pub fn inline(&self, case: LetterCase) -> String {
        match &self.exponent {
            None => self.mantissa.clone(),
            Some(exponent) => {
                let marker = match case {
                    LetterCase::Lower => 'e',
                    LetterCase::Upper => 'E',
                };
                format!("{}{}{}", self.mantissa, marker, exponent)
            }
        }
    }
}

/// Format a real according to `format`.
///
/// The multiplier is applied first. For the concise styles the precision
/// counts significant digits; for every other style it counts digits after
/// the decimal point. `None` selects the shortest text that reads back as
/// the same number.
pub fn format_real(value: f64, format: &ValueFormat) -> NumericText {
    let mut value = value * format.multiplier;
    if value == 0.0 {
        // Drop the sign of negative zero
        value = 0.0;
    }

    let mut text = if value.is_nan() {
        return NumericText::plain("NaN".to_string());
    } else if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        NumericText::plain(format!("{sign}{INFINITY}"))
    } else {
        match format.style {
            NumericStyle::FloatingPoint => fixed(value, format.precision),
            NumericStyle::Scientific | NumericStyle::ComputerScientific => {
                scientific(value, format.precision)
            }
            NumericStyle::Engineering => engineering(value, format.precision),
            NumericStyle::Concise | NumericStyle::ComputerConcise => {
                concise(value, format.precision)
            }
        }
    };

    if format.sign == SignMode::Always && !text.mantissa.starts_with('-') {
        text.mantissa.insert(0, '+');
    }
    text
}

/// Format an integer in the radix and letter case of `format`.
///
/// Radixes other than 2, 8 and 16 fall back to decimal.
pub fn format_integer(value: i64, format: &ValueFormat) -> String {
    let magnitude = value.unsigned_abs();
    let digits = match (format.radix, format.case) {
        (2, _) => format!("{magnitude:b}"),
        (8, _) => format!("{magnitude:o}"),
        (16, LetterCase::Lower) => format!("{magnitude:x}"),
        (16, LetterCase::Upper) => format!("{magnitude:X}"),
        _ => magnitude.to_string(),
    };

    let sign = if value < 0 {
        "-"
    } else if format.sign == SignMode::Always {
        "+"
    } else {
        ""
    };
    format!("{sign}{digits}")
}

fn fixed(value: f64, precision: Option<u32>) -> NumericText {
    NumericText::plain(match precision {
        Some(p) => format!("{:.*}", p as usize, value),
        None => format!("{value}"),
    })
}

/// Split Rust's `1.5e3` exponent form into mantissa and exponent
fn split_exponent(text: &str) -> (String, i32) {
    match text.split_once('e') {
        Some((mantissa, exponent)) => (mantissa.to_string(), exponent.parse().unwrap_or(0)),
        None => (text.to_string(), 0),
    }
}

fn exponent_form(value: f64, decimals: Option<u32>) -> (String, i32) {
    let text = match decimals {
        Some(d) => format!("{:.*e}", d as usize, value),
        None => format!("{value:e}"),
    };
    split_exponent(&text)
}

fn scientific(value: f64, precision: Option<u32>) -> NumericText {
    let (mantissa, exponent) = exponent_form(value, precision);
    NumericText {
        mantissa,
        exponent: Some(exponent.to_string()),
    }
}

fn engineering(value: f64, precision: Option<u32>) -> NumericText {
    let (mantissa, exponent) = exponent_form(value, precision);
    let shift = exponent.rem_euclid(3) as usize;

    let (sign, unsigned) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa.as_str()),
    };
    let mut digits: String = unsigned.chars().filter(|c| *c != '.').collect();
    let integer_digits = 1 + shift;
    while digits.len() < integer_digits {
        digits.push('0');
    }

    let (integer, fraction) = digits.split_at(integer_digits);
    let mantissa = if fraction.is_empty() {
        format!("{sign}{integer}")
    } else {
        format!("{sign}{integer}.{fraction}")
    };

    NumericText {
        mantissa,
        exponent: Some((exponent - shift as i32).to_string()),
    }
}

fn concise(value: f64, precision: Option<u32>) -> NumericText {
    if value == 0.0 {
        return NumericText::plain("0".to_string());
    }

    match precision {
        None => {
            let (mantissa, exponent) = exponent_form(value, None);
            if exponent < CONCISE_MINIMUM_EXPONENT || exponent >= CONCISE_MAXIMUM_EXPONENT {
                NumericText {
                    mantissa,
                    exponent: Some(exponent.to_string()),
                }
            } else {
                NumericText::plain(format!("{value}"))
            }
        }
        Some(p) => {
            let significant = p.max(1);
            let (mantissa, exponent) = exponent_form(value, Some(significant - 1));
            if exponent < CONCISE_MINIMUM_EXPONENT || exponent >= significant as i32 {
                NumericText {
                    mantissa: strip_trailing_zeros(mantissa),
                    exponent: Some(exponent.to_string()),
                }
            } else {
                let decimals = (significant as i32 - 1 - exponent).max(0) as usize;
                NumericText::plain(strip_trailing_zeros(format!("{value:.decimals$}")))
            }
        }
    }
}

fn strip_trailing_zeros(text: String) -> String {
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
