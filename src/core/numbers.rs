//! Operand recovery from challenge text.
//!
//! Three strategies run in order, each only when the previous one found
//! fewer than two operands:
//! 1. token scan over the normalized text (digit literals and compound
//!    number words such as "two hundred fifty");
//! 2. greedy number-word scan over the despaced blob;
//! 3. raw digit literals in the original, unnormalized challenge.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::normalize::{NormalizedText, canonical_word};

/// Plain decimal numeral, whole token
static NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.?[0-9]*$").expect("numeral pattern"));

/// ASCII decimal literal anywhere in raw text
static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.?[0-9]*").expect("digits pattern"));

/// Values at or above this are scale words (hundred, thousand)
const SCALE_MIN: u64 = 100;

/// Most challenges mention exactly two quantities
pub type Operands = SmallVec<[Operand; 4]>;

/// A spelled-out number and its value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberWord
{
    pub word: String,
    pub value: u64,
}

impl NumberWord
{
    pub fn new(
        word: &str,
        value: u64,
    ) -> Self
    {
        Self { word: word.to_string(), value }
    }
}

/// Default English number-word table
pub fn default_number_words() -> Vec<NumberWord>
{
    [
        ("zero", 0),
        ("one", 1),
        ("two", 2),
        ("three", 3),
        ("four", 4),
        ("five", 5),
        ("six", 6),
        ("seven", 7),
        ("eight", 8),
        ("nine", 9),
        ("ten", 10),
        ("eleven", 11),
        ("twelve", 12),
        ("thirteen", 13),
        ("fourteen", 14),
        ("fifteen", 15),
        ("sixteen", 16),
        ("seventeen", 17),
        ("eighteen", 18),
        ("nineteen", 19),
        ("twenty", 20),
        ("thirty", 30),
        ("forty", 40),
        ("fifty", 50),
        ("sixty", 60),
        ("seventy", 70),
        ("eighty", 80),
        ("ninety", 90),
        ("hundred", 100),
        ("thousand", 1000),
    ]
    .into_iter()
    .map(|(w, v)| NumberWord::new(w, v))
    .collect()
}

/// Where an operand was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperandSource
{
    /// Token indices `[start, end)` in the normalized text
    Tokens
    {
        start: usize, end: usize
    },
    /// Byte offsets `[start, end)` in the blob
    Blob
    {
        start: usize, end: usize
    },
    /// Byte offsets `[start, end)` in the raw challenge
    Digits
    {
        start: usize, end: usize
    },
}

/// A numeric value recovered from challenge text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Operand
{
    pub value: f64,
    pub source: OperandSource,
}

/// Which extraction strategy produced the operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy
{
    Tokens,
    Blob,
    Digits,
}

impl std::fmt::Display for Strategy
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result
    {
        match self
        {
            Strategy::Tokens => write!(f, "tokens"),
            Strategy::Blob => write!(f, "blob"),
            Strategy::Digits => write!(f, "digits"),
        }
    }
}

/// Number-word lookup built from a vocabulary table.
///
/// Words are stored in their canonical (letter-collapsed) spelling so they
/// compare equal to normalized tokens and to blob slices.
#[derive(Debug, Clone)]
pub struct NumberExtractor
{
    /// (canonical word, value), longest word first
    words: Vec<(String, u64)>,
}

impl NumberExtractor
{
    pub fn new(vocabulary: &[NumberWord]) -> Self
    {
        let mut words: Vec<(String, u64)> = vocabulary
            .iter()
            .map(|nw| (canonical_word(&nw.word), nw.value))
            .filter(|(w, _)| !w.is_empty())
            .collect();

        // Longest first so "eighteen" is tried before "eight"
        words.sort_by(|a, b| {
            b.0.len()
                .cmp(&a.0.len())
                .then_with(|| a.0.cmp(&b.0))
        });
        words.dedup_by(|a, b| a.0 == b.0);

        Self { words }
    }

    fn lookup(
        &self,
        token: &str,
    ) -> Option<u64>
    {
        self.words
            .iter()
            .find(|(w, _)| w == token)
            .map(|(_, v)| *v)
    }

    /// Run the strategies in order until one yields at least two operands.
    ///
    /// Returns the operands of the last strategy tried together with which
    /// strategy that was.
    pub fn extract_all(
        &self,
        raw: &str,
        normalized: &NormalizedText,
        blob: &str,
    ) -> (Operands, Strategy)
    {
        let from_tokens = self.extract(normalized);
        if from_tokens.len() >= 2
        {
            return (from_tokens, Strategy::Tokens);
        }

        let from_blob = self.extract_from_blob(blob);
        if from_blob.len() >= 2
        {
            return (from_blob, Strategy::Blob);
        }

        (extract_digits(raw), Strategy::Digits)
    }

    /// Token scan over normalized text
    pub fn extract(
        &self,
        text: &NormalizedText,
    ) -> Operands
    {
        let tokens: Vec<&str> = text
            .tokens()
            .map(|t| t.trim_matches('.'))
            .collect();

        let mut out = Operands::new();
        let mut i = 0;

        while i < tokens.len()
        {
            let tok = tokens[i];

            if NUMERAL.is_match(tok)
            {
                if let Ok(value) = tok.parse::<f64>()
                {
                    out.push(Operand { value, source: OperandSource::Tokens { start: i, end: i + 1 } });
                }
                i += 1;
                continue;
            }

            if self
                .lookup(tok)
                .is_none()
            {
                i += 1;
                continue;
            }

            // Maximal run of number words folds into one operand
            let start = i;
            let mut values = Vec::new();
            while let Some(v) = tokens
                .get(i)
                .and_then(|t| self.lookup(t))
            {
                values.push(v);
                i += 1;
            }

            out.push(Operand {
                value: compose(&values) as f64,
                source: OperandSource::Tokens { start, end: i },
            });
        }

        out
    }

    /// Greedy longest-first number-word scan over a despaced blob.
    ///
    /// Scale words are consumed but never emitted: without word boundaries
    /// there is no way to tell what they multiply. A tens word followed
    /// directly by a ones word ("twentythre") is merged into one operand.
    pub fn extract_from_blob(
        &self,
        blob: &str,
    ) -> Operands
    {
        let mut out = Operands::new();
        let mut pos = 0;

        while pos < blob.len()
        {
            let rest = &blob[pos..];

            let Some((word, value)) = self
                .words
                .iter()
                .find(|(w, _)| rest.starts_with(w.as_str()))
            else
            {
                // Step one char; blob is lowercase ASCII but stay boundary-safe
                pos += rest
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                continue;
            };

            let end = pos + word.len();

            if *value < SCALE_MIN
            {
                let merged = out
                    .last_mut()
                    .filter(|prev| is_tens_ones_pair(prev, *value, pos));

                match merged
                {
                    Some(prev) =>
                    {
                        prev.value += *value as f64;
                        if let OperandSource::Blob { end: prev_end, .. } = &mut prev.source
                        {
                            *prev_end = end;
                        }
                    }
                    None => out.push(Operand {
                        value: *value as f64,
                        source: OperandSource::Blob { start: pos, end },
                    }),
                }
            }

            pos = end;
        }

        out
    }
}

/// Every decimal literal in the raw challenge
pub fn extract_digits(raw: &str) -> Operands
{
    DIGITS
        .find_iter(raw)
        .filter_map(|m| {
            m.as_str()
                .parse::<f64>()
                .ok()
                .map(|value| Operand {
                    value,
                    source: OperandSource::Digits { start: m.start(), end: m.end() },
                })
        })
        .collect()
}

/// Short-scale composition of a run of number-word values.
///
/// `hundred` multiplies the running group, `thousand` (and anything larger)
/// closes the group into the total. An empty group counts as one, so a bare
/// "hundred" is 100.
pub fn compose(values: &[u64]) -> u64
{
    let mut total: u64 = 0;
    let mut group: u64 = 0;

    for &v in values
    {
        if v >= 1000
        {
            total = total.saturating_add(group.max(1).saturating_mul(v));
            group = 0;
        }
        else if v >= SCALE_MIN
        {
            group = group.max(1).saturating_mul(v);
        }
        else
        {
            group = group.saturating_add(v);
        }
    }

    total.saturating_add(group)
}

/// `prev` is a single blob tens word (20..=90) ending exactly at `at`, and
/// the new value is a ones word (1..=9)
fn is_tens_ones_pair(
    prev: &Operand,
    ones: u64,
    at: usize,
) -> bool
{
    let OperandSource::Blob { end, .. } = prev.source
    else
    {
        return false;
    };

    let tens = prev.value as u64;
    end == at
        && (1..=9).contains(&ones)
        && (20..=90).contains(&tens)
        && tens % 10 == 0
        && prev.value.fract() == 0.0
}
