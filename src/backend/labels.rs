//! Page labels (`/PageLabels` number tree).
//!
//! Slide producers such as beamer give every overlay of one frame the same
//! label, which is what the deck uses to detect continuation pages.

use serde::{Deserialize, Serialize};

/// Largest value written in Roman numerals; larger counters use decimal.
const MAX_ROMAN: u32 = 3999;

/// Longest run of repeated letters in alphabetic labels (`ZZ…Z`).
const MAX_ALPHA_REPEAT: u32 = 32;

/// Numbering style of a label range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelStyle {
    /// `/D`: 1, 2, 3
    Decimal,
    /// `/R`: I, II, III
    UpperRoman,
    /// `/r`: i, ii, iii
    LowerRoman,
    /// `/A`: A … Z, AA … ZZ
    UpperAlpha,
    /// `/a`: a … z, aa … zz
    LowerAlpha,
    /// No `/S` entry: the label is the prefix alone
    None,
}

impl LabelStyle {
    /// Parse the `/S` name.
    pub fn from_name(name: &[u8]) -> Self {
        match name {
            b"D" => LabelStyle::Decimal,
            b"R" => LabelStyle::UpperRoman,
            b"r" => LabelStyle::LowerRoman,
            b"A" => LabelStyle::UpperAlpha,
            b"a" => LabelStyle::LowerAlpha,
            _ => LabelStyle::None,
        }
    }

    /// Format a counter value in this style.
    ///
    /// Values too large for Roman or alphabetic numbering are written in
    /// decimal.
    pub fn format(&self, value: u32) -> String {
        match self {
            LabelStyle::Decimal => value.to_string(),
            LabelStyle::UpperRoman | LabelStyle::LowerRoman if value > MAX_ROMAN => {
                value.to_string()
            }
            LabelStyle::UpperAlpha | LabelStyle::LowerAlpha if value > MAX_ALPHA_REPEAT * 26 => {
                value.to_string()
            }
            LabelStyle::UpperRoman => to_roman(value),
            LabelStyle::LowerRoman => to_roman(value).to_lowercase(),
            LabelStyle::UpperAlpha => to_alpha(value, b'A'),
            LabelStyle::LowerAlpha => to_alpha(value, b'a'),
            LabelStyle::None => String::new(),
        }
    }
}

/// One entry of the number tree: pages from `start_index` on use this rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLabelRange {
    /// 0-indexed first page of the range
    pub start_index: u32,
    /// Numbering style
    pub style: LabelStyle,
    /// Literal prefix
    pub prefix: String,
    /// Counter value of the first page (`/St`, default 1)
    pub first: u32,
}

/// All label ranges of a document, sorted by start page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLabels {
    ranges: Vec<PageLabelRange>,
}

impl PageLabels {
    /// Build from unsorted ranges; later duplicates of a start index win.
    pub fn new(mut ranges: Vec<PageLabelRange>) -> Self {
        ranges.sort_by_key(|r| r.start_index);
        ranges.dedup_by(|later, earlier| {
            if later.start_index == earlier.start_index {
                std::mem::swap(later, earlier);
                true
            } else {
                false
            }
        });
        Self { ranges }
    }

    /// Whether the document defines no labels.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Label of the 0-indexed page.
    ///
    /// `None` when no range covers the page or its counter overflows.
    pub fn label(&self, page_index: u32) -> Option<String> {
        let range = self
            .ranges
            .iter()
            .rev()
            .find(|r| r.start_index <= page_index)?;
        let Some(value) = range.first.checked_add(page_index - range.start_index) else {
            log::debug!("Page label counter overflows on page index {}", page_index);
            return None;
        };
        Some(format!("{}{}", range.prefix, range.style.format(value)))
    }
}

/// Convert number to Roman numerals.
fn to_roman(mut num: u32) -> String {
    const NUMERALS: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut result = String::new();
    for (value, symbol) in NUMERALS {
        while num >= value {
            result.push_str(symbol);
            num -= value;
        }
    }
    result
}

/// Alphabetic labels repeat the letter: 1 → A, 26 → Z, 27 → AA, 53 → AAA.
fn to_alpha(value: u32, base: u8) -> String {
    if value == 0 {
        return String::new();
    }
    let letter = (base + ((value - 1) % 26) as u8) as char;
    let count = ((value - 1) / 26 + 1) as usize;
    std::iter::repeat(letter).take(count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start_index: u32, style: LabelStyle, prefix: &str, first: u32) -> PageLabelRange {
        PageLabelRange {
            start_index,
            style,
            prefix: prefix.to_string(),
            first,
        }
    }

    #[test]
    fn test_styles() {
        assert_eq!(LabelStyle::Decimal.format(12), "12");
        assert_eq!(LabelStyle::UpperRoman.format(14), "XIV");
        assert_eq!(LabelStyle::LowerRoman.format(4), "iv");
        assert_eq!(LabelStyle::UpperAlpha.format(1), "A");
        assert_eq!(LabelStyle::UpperAlpha.format(27), "AA");
        assert_eq!(LabelStyle::LowerAlpha.format(53), "aaa");
        assert_eq!(LabelStyle::None.format(3), "");
    }

    #[test]
    fn test_label_ranges() {
        let labels = PageLabels::new(vec![
            range(4, LabelStyle::Decimal, "", 1),
            range(0, LabelStyle::LowerRoman, "", 1),
            range(10, LabelStyle::UpperAlpha, "App-", 1),
        ]);

        assert_eq!(labels.label(0).as_deref(), Some("i"));
        assert_eq!(labels.label(3).as_deref(), Some("iv"));
        assert_eq!(labels.label(4).as_deref(), Some("1"));
        assert_eq!(labels.label(9).as_deref(), Some("6"));
        assert_eq!(labels.label(11).as_deref(), Some("App-B"));
    }

    #[test]
    fn test_repeated_labels_for_overlays() {
        // beamer writes one range per frame; overlays share the label
        let labels = PageLabels::new(vec![
            range(0, LabelStyle::None, "1", 1),
            range(1, LabelStyle::None, "2", 1),
            range(3, LabelStyle::None, "3", 1),
        ]);
        assert_eq!(labels.label(1), labels.label(2));
        assert_ne!(labels.label(2), labels.label(3));
    }

    #[test]
    fn test_no_range_before_first_start() {
        let labels = PageLabels::new(vec![range(2, LabelStyle::Decimal, "", 1)]);
        assert_eq!(labels.label(0), None);
        assert_eq!(labels.label(2).as_deref(), Some("1"));
        assert!(PageLabels::default().is_empty());
    }

    #[test]
    fn test_counter_overflow_has_no_label() {
        let labels = PageLabels::new(vec![range(0, LabelStyle::Decimal, "", u32::MAX)]);
        assert_eq!(labels.label(0).as_deref(), Some("4294967295"));
        assert_eq!(labels.label(1), None);
    }

    #[test]
    fn test_large_counters_fall_back_to_decimal() {
        assert_eq!(LabelStyle::UpperAlpha.format(2_000_000_000), "2000000000");
        assert_eq!(LabelStyle::LowerAlpha.format(833), "833");
        assert_eq!(LabelStyle::LowerAlpha.format(832).len(), 32);
        assert_eq!(LabelStyle::UpperRoman.format(3999), "MMMCMXCIX");
        assert_eq!(LabelStyle::LowerRoman.format(4000), "4000");
    }
}
