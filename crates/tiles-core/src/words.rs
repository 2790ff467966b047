//! # Amount in Words
//!
//! Spells a rupee amount using South-Asian grouping, as printed under the
//! quotation total.
//!
//! ```text
//!   99,99,99,999
//!   ── ── ── ─ ──
//!   │  │  │  │ └── tens/ones   "and Ninety Nine"
//!   │  │  │  └──── hundred     "Nine Hundred"
//!   │  │  └─────── thousand    "Ninety Nine Thousand"
//!   │  └────────── lakh        "Ninety Nine Lakh"
//!   └───────────── crore       "Ninety Nine Crore"
//! ```
//!
//! ```rust
//! use tiles_core::words::number_to_words;
//!
//! assert_eq!(number_to_words(0), "");
//! assert_eq!(number_to_words(100), "One Hundred Only");
//! assert_eq!(number_to_words(150_000), "One Lakh Fifty Thousand Only");
//! ```

use crate::money::Money;

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;

/// Spells a whole number followed by "Only". Zero is the empty string.
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return String::new();
    }
    let mut words = Vec::new();
    spell(n, &mut words);
    words.push("Only");
    words.join(" ")
}

/// Spells the whole-rupee part of an amount. Paisa are dropped; zero and
/// negative amounts give the empty string.
pub fn amount_in_words(amount: Money) -> String {
    if amount.rupees() <= 0 {
        return String::new();
    }
    number_to_words(amount.rupees() as u64)
}

fn spell(n: u64, words: &mut Vec<&'static str>) {
    let crore = n / CRORE;
    let lakh = (n / LAKH) % 100;
    let thousand = (n / 1_000) % 100;
    let hundred = (n / 100) % 10;
    let rest = n % 100;

    if crore > 0 {
        // Past 99 crore the crore count is itself spelled in this scheme.
        if crore > 99 {
            spell(crore, words);
        } else {
            two_digits(crore, words);
        }
        words.push("Crore");
    }
    if lakh > 0 {
        two_digits(lakh, words);
        words.push("Lakh");
    }
    if thousand > 0 {
        two_digits(thousand, words);
        words.push("Thousand");
    }
    if hundred > 0 {
        two_digits(hundred, words);
        words.push("Hundred");
    }
    if rest > 0 {
        if !words.is_empty() {
            words.push("and");
        }
        two_digits(rest, words);
    }
}

fn two_digits(n: u64, words: &mut Vec<&'static str>) {
    let n = n as usize;
    if n < 20 {
        words.push(ONES[n]);
    } else {
        words.push(TENS[n / 10]);
        if n % 10 > 0 {
            words.push(ONES[n % 10]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        assert_eq!(number_to_words(0), "");
        assert_eq!(number_to_words(100), "One Hundred Only");
        assert_eq!(number_to_words(150_000), "One Lakh Fifty Thousand Only");
        assert_eq!(number_to_words(7), "Seven Only");
        assert_eq!(number_to_words(20), "Twenty Only");
    }

    #[test]
    fn test_and_before_last_group() {
        assert_eq!(number_to_words(125), "One Hundred and Twenty Five Only");
        assert_eq!(
            number_to_words(22_500),
            "Twenty Two Thousand Five Hundred Only"
        );
        assert_eq!(number_to_words(1_011), "One Thousand and Eleven Only");
    }

    #[test]
    fn test_full_nine_digit_range() {
        assert_eq!(
            number_to_words(999_999_999),
            "Ninety Nine Crore Ninety Nine Lakh Ninety Nine Thousand Nine Hundred and Ninety Nine Only"
        );
        assert_eq!(number_to_words(10_000_000), "One Crore Only");
        assert_eq!(number_to_words(1_00_05_000), "One Crore Five Thousand Only");
    }

    #[test]
    fn test_beyond_nine_digits() {
        assert_eq!(number_to_words(1_000_000_000), "One Hundred Crore Only");
    }

    #[test]
    fn test_amount_in_words_truncates_paisa() {
        assert_eq!(
            amount_in_words(Money::from_paisa(2_500_099)),
            "Twenty Five Thousand Only"
        );
        assert_eq!(amount_in_words(Money::from_paisa(99)), "");
        assert_eq!(amount_in_words(Money::from_rupees(-5)), "");
    }
}
