//! French spelling of monetary amounts.
//!
//! Produces the "montant en lettres" line of a transfer order, e.g.
//! `1234.56` → "Mille deux cent trente-quatre dirhams et cinquante-six centimes".

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const UNITS: [&str; 10] = [
    "", "un", "deux", "trois", "quatre", "cinq", "six", "sept", "huit", "neuf",
];

const TEENS: [&str; 10] = [
    "dix", "onze", "douze", "treize", "quatorze", "quinze", "seize", "dix-sept", "dix-huit",
    "dix-neuf",
];

/// Tens words. 70-79 and 90-99 are built on the 60 and 80 bases plus a teen.
const TENS: [&str; 10] = [
    "",
    "dix",
    "vingt",
    "trente",
    "quarante",
    "cinquante",
    "soixante",
    "soixante",
    "quatre-vingt",
    "quatre-vingt",
];

/// Long-scale names, indexed by base-1000 chunk position.
const SCALES: [&str; 7] = [
    "", "mille", "million", "milliard", "billion", "billiard", "trillion",
];

/// `amount` rounded to whole cents, half away from zero.
///
/// Both the figures and the words of a letter go through this.
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Spell `amount` in French followed by its currency units.
///
/// The main unit takes a plural "s" when the integer part is above one, the
/// sub unit likewise for the cents. Cents are rounded half away from zero.
pub fn amount_to_words(amount: Decimal, main_unit: &str, sub_unit: &str) -> String {
    if amount.is_sign_negative() && !amount.is_zero() {
        let positive = amount_to_words(amount.abs(), main_unit, sub_unit);
        return format!("Moins {}", lowercase_first(&positive));
    }

    let rounded = round_to_cents(amount);
    let integer_part = rounded.trunc();
    let cents = ((rounded - integer_part) * Decimal::ONE_HUNDRED)
        .to_u64()
        .unwrap_or(0);
    let integer = integer_part.to_u64().unwrap_or(u64::MAX);

    let mut result = format!(
        "{} {}",
        capitalize_first(&integer_to_words(integer)),
        pluralize(main_unit, integer)
    );

    if cents > 0 {
        result.push_str(&format!(
            " et {} {}",
            integer_to_words(cents),
            pluralize(sub_unit, cents)
        ));
    }

    result
}

/// Spell a non-negative integer in lower-case French.
pub fn integer_to_words(value: u64) -> String {
    if value == 0 {
        return "zéro".to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    let mut remaining = value;
    let mut position = 0;

    while remaining > 0 {
        let chunk = (remaining % 1000) as u16;
        if chunk > 0 {
            let words = match position {
                0 => chunk_to_words(chunk),
                1 if chunk == 1 => SCALES[1].to_string(),
                1 => format!("{} {}", chunk_to_words(chunk), SCALES[1]),
                _ => {
                    let scale = SCALES[position];
                    let suffix = if chunk > 1 { "s" } else { "" };
                    format!("{} {}{}", chunk_to_words(chunk), scale, suffix)
                }
            };
            parts.push(words);
        }
        remaining /= 1000;
        position += 1;
    }

    parts.reverse();
    parts.join(" ")
}

/// Convert 1..=999.
fn chunk_to_words(chunk: u16) -> String {
    let hundreds = (chunk / 100) as usize;
    let remainder = chunk % 100;
    let mut parts: Vec<String> = Vec::with_capacity(2);

    if hundreds > 0 {
        let mut words = if hundreds > 1 {
            format!("{} cent", UNITS[hundreds])
        } else {
            "cent".to_string()
        };
        if remainder == 0 && hundreds > 1 {
            words.push('s');
        }
        parts.push(words);
    }

    if remainder > 0 {
        parts.push(below_hundred(remainder as usize));
    }

    parts.join(" ")
}

fn below_hundred(value: usize) -> String {
    match value {
        0..=9 => UNITS[value].to_string(),
        10..=19 => TEENS[value - 10].to_string(),
        _ => {
            let ten = value / 10;
            let unit = value % 10;
            match (ten, unit) {
                (7 | 9, _) => format!("{}-{}", TENS[ten], TEENS[unit]),
                (8, 0) => "quatre-vingts".to_string(),
                (_, 0) => TENS[ten].to_string(),
                (8, _) => format!("{}-{}", TENS[ten], UNITS[unit]),
                (_, 1) => format!("{} et un", TENS[ten]),
                _ => format!("{}-{}", TENS[ten], UNITS[unit]),
            }
        }
    }
}

fn pluralize(noun: &str, count: u64) -> String {
    if count > 1 {
        format!("{noun}s")
    } else {
        noun.to_string()
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
