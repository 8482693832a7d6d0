//! Textual agreement measures
//!
//! An [`AgreementMeasure`] scores how much two answers agree, in `[0, 1]`.
//! The default [`TokenOverlap`] measure is the Sørensen–Dice coefficient
//! over normalized token sets: case-folded alphanumeric runs, with decimal
//! points and thousands separators inside numbers kept (`37.4`, `14,000`),
//! single letters and common English stop-words dropped. Two answers that
//! both state numbers but share none of them never agree.

use std::collections::BTreeSet;

/// Scores the agreement between two answer texts
///
/// Implementations must be symmetric and return values in `[0, 1]`.
pub trait AgreementMeasure: Send + Sync {
    /// Agreement between `a` and `b`
    fn agreement(&self, a: &str, b: &str) -> f64;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Sørensen–Dice coefficient over normalized token sets
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenOverlap;

impl AgreementMeasure for TokenOverlap {
    fn agreement(&self, a: &str, b: &str) -> f64 {
        let left = normalized_tokens(a);
        let right = normalized_tokens(b);

        if left.is_empty() || right.is_empty() {
            // Nothing but stop-words: fall back to exact comparison
            let same = left.is_empty()
                && right.is_empty()
                && a.trim().to_lowercase() == b.trim().to_lowercase();
            return if same { 1.0 } else { 0.0 };
        }

        if conflicting_numbers(&left, &right) {
            return 0.0;
        }

        let shared = left.intersection(&right).count();
        (2 * shared) as f64 / (left.len() + right.len()) as f64
    }

    fn name(&self) -> &'static str {
        "token-overlap"
    }
}

const STOP_WORDS: &[&str] = &[
    "about", "also", "an", "and", "approximately", "are", "around", "as", "at", "be", "been",
    "being", "but", "by", "for", "from", "had", "has", "have", "having", "in", "into", "is", "it",
    "its", "of", "on", "or", "roughly", "so", "some", "than", "that", "the", "their", "there",
    "these", "they", "this", "those", "to", "was", "were", "which", "while", "with",
];

/// Tokenize and normalize an answer for comparison
pub fn normalized_tokens(text: &str) -> BTreeSet<String> {
    let chars: Vec<char> = text.to_lowercase().chars().collect();
    let mut tokens = BTreeSet::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            current.push(c);
            continue;
        }

        let inside_number = matches!(c, '.' | ',')
            && current.chars().last().is_some_and(|p| p.is_ascii_digit())
            && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
        if inside_number {
            // Keep the decimal point, drop the thousands separator
            if c == '.' {
                current.push(c);
            }
            continue;
        }

        push_token(&mut current, &mut tokens);
    }
    push_token(&mut current, &mut tokens);

    tokens
}

fn is_numeric(token: &str) -> bool {
    token.starts_with(|c: char| c.is_ascii_digit())
        && token.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Both sides carry numbers and none of them match
fn conflicting_numbers(left: &BTreeSet<String>, right: &BTreeSet<String>) -> bool {
    let mut left_numbers = left.iter().filter(|t| is_numeric(t)).peekable();
    let mut right_numbers = right.iter().filter(|t| is_numeric(t)).peekable();
    if left_numbers.peek().is_none() || right_numbers.peek().is_none() {
        return false;
    }
    let right_numbers: BTreeSet<&String> = right_numbers.collect();
    !left_numbers.any(|n| right_numbers.contains(n))
}

fn push_token(current: &mut String, tokens: &mut BTreeSet<String>) {
    if current.is_empty() {
        return;
    }

    let token = std::mem::take(current);
    let single_letter = token.chars().count() == 1 && !token.chars().all(|c| c.is_ascii_digit());
    if !single_letter && !STOP_WORDS.contains(&token.as_str()) {
        tokens.insert(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        normalized_tokens(text).into_iter().collect()
    }

    #[test]
    fn test_tokens_are_case_folded_and_filtered() {
        assert_eq!(
            tokens("The Square Root of 144 is 12."),
            vec!["12", "144", "root", "square"]
        );
    }

    #[test]
    fn test_numbers_keep_decimal_point() {
        assert_eq!(tokens("37.4 million"), vec!["37.4", "million"]);
        assert_eq!(tokens("14,000,000 people"), vec!["14000000", "people"]);
        // A trailing full stop is punctuation, not a decimal point
        assert_eq!(tokens("It is 12."), vec!["12"]);
    }

    #[test]
    fn test_possessive_suffix_dropped() {
        assert_eq!(tokens("Tokyo's"), vec!["tokyo"]);
    }

    #[test]
    fn test_identical_text_agrees_fully() {
        let m = TokenOverlap;
        let text = "Tokyo has about 14 million residents";
        assert_eq!(m.agreement(text, text), 1.0);
    }

    #[test]
    fn test_disjoint_text_disagrees() {
        let m = TokenOverlap;
        assert_eq!(m.agreement("Paris is the capital", "Twelve apples"), 0.0);
    }

    #[test]
    fn test_partial_overlap_dice() {
        let m = TokenOverlap;
        // {capital, france, paris} vs {capital, france, lyon}: 2*2 / 6
        let score = m.agreement(
            "The capital of France is Paris",
            "The capital of France is Lyon",
        );
        assert!((score - 4.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric() {
        let m = TokenOverlap;
        let a = "Water boils at 100 degrees Celsius at sea level";
        let b = "At sea level, water boils at 100 C";
        assert_eq!(m.agreement(a, b), m.agreement(b, a));
    }

    #[test]
    fn test_different_numbers_never_agree() {
        let m = TokenOverlap;
        assert_eq!(
            m.agreement("Tokyo has 14 million people", "Tokyo has 37 million people"),
            0.0
        );
        // A shared number keeps the plain overlap score
        let score = m.agreement("Tokyo has 14 million people", "Tokyo: 14 million residents");
        assert!((score - 6.0 / 8.0).abs() < 1e-9);
        // Numbers on one side only do not veto
        assert!(m.agreement("Tokyo has 14 million people", "Tokyo has millions of people") > 0.0);
    }

    #[test]
    fn test_stop_word_only_answers() {
        let m = TokenOverlap;
        assert_eq!(m.agreement("It is.", "it is."), 1.0);
        assert_eq!(m.agreement("It is.", "It was."), 0.0);
        assert_eq!(m.agreement("It is.", "Twelve"), 0.0);
    }
}
