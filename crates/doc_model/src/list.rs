//! Ordinal text for list labels
//!
//! Converts a paragraph number into the text shown in its label:
//! - Decimal: 1, 2, 3, ...
//! - Letters: a ... z, aa, ab, ... (bijective base 26)
//! - Roman numerals: i, ii, iii, ... up to 3999

use serde::{Deserialize, Serialize};

/// Word used for a zero Roman numeral
pub const ROMAN_ZERO: &str = "nulla";

/// Largest value representable with standard Roman numerals
pub const ROMAN_MAXIMUM: u32 = 3999;

/// Number style of an ordered list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ListNumberStyle {
    /// Decimal numbers: 1, 2, 3, ...
    #[default]
    Decimal,
    /// Lowercase letters: a, b, c, ...
    LowerAlpha,
    /// Uppercase letters: A, B, C, ...
    UpperAlpha,
    /// Lowercase roman numerals: i, ii, iii, ...
    LowerRoman,
    /// Uppercase roman numerals: I, II, III, ...
    UpperRoman,
}

impl ListNumberStyle {
    /// Format a number according to this style
    pub fn format(&self, value: u32) -> String {
        match self {
            Self::Decimal => value.to_string(),
            Self::LowerAlpha => number_to_letters(value),
            Self::UpperAlpha => number_to_letters(value).to_uppercase(),
            Self::LowerRoman => number_to_roman(value),
            Self::UpperRoman => number_to_roman(value).to_uppercase(),
        }
    }
}

/// Format a number as letters (a, b, c, ... z, aa, ab, ...).
///
/// Zero has no letter form and is written as `"0"`.
pub fn number_to_letters(value: u32) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut letters = Vec::new();
    let mut n = value;

    while n > 0 {
        n -= 1;
        letters.push((b'a' + (n % 26) as u8) as char);
        n /= 26;
    }

    letters.iter().rev().collect()
}

/// Format a number as lowercase roman numerals.
///
/// Zero is written as [`ROMAN_ZERO`]; values above [`ROMAN_MAXIMUM`] fall back
/// to decimal.
pub fn number_to_roman(value: u32) -> String {
    if value == 0 {
        return ROMAN_ZERO.to_string();
    }
    if value > ROMAN_MAXIMUM {
        return value.to_string();
    }

    const NUMERALS: [(u32, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];

    let mut result = String::new();
    let mut n = value;

    for (num, roman) in NUMERALS {
        while n >= num {
            result.push_str(roman);
            n -= num;
        }
    }

    result
}
