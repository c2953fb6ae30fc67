//! Text normalization for obfuscated challenge text.
//!
//! Three renderings are produced from the same raw input:
//! - the *cleaned* form keeps word boundaries, digits and letter runs, and
//!   is what the primary operator pass reads;
//! - the *normalized* form additionally collapses repeated letters, and is
//!   what the token extractor reads;
//! - the *blob* form drops everything but letters and is used when the
//!   obfuscation has destroyed spacing.

/// Canonical lowercase rendering of a challenge.
///
/// Only ASCII letters, digits, `.` and single spaces survive, and no letter
/// appears twice in a row. Normalizing an already normalized string is a
/// no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText(String);

impl NormalizedText
{
    pub fn as_str(&self) -> &str
    {
        &self.0
    }

    /// Whitespace-delimited tokens in order
    pub fn tokens(&self) -> impl Iterator<Item = &str>
    {
        self.0
            .split(' ')
            .filter(|t| !t.is_empty())
    }
}

impl std::fmt::Display for NormalizedText
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result
    {
        f.write_str(&self.0)
    }
}

/// Lowercase, scrubbed rendering of `raw` with letter runs left intact.
///
/// Operator keywords are matched against this form: collapsing letters
/// first would let "less" (stored as "les") fire inside "miles".
pub fn clean(raw: &str) -> String
{
    let split = split_hyphenated(raw);

    // Anything outside [A-Za-z0-9 .] becomes a space
    split
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c.to_ascii_lowercase() } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Produce the normalized rendering of `raw`.
pub fn normalize(raw: &str) -> NormalizedText
{
    let cleaned = clean(raw);
    let mut out = String::with_capacity(cleaned.len());

    for token in cleaned.split(' ')
    {
        if !out.is_empty()
        {
            out.push(' ');
        }

        push_collapsed(&mut out, token.chars());
    }

    NormalizedText(out)
}

/// Produce the despaced, letters-only rendering of `raw`.
pub fn blob(raw: &str) -> String
{
    let mut out = String::with_capacity(raw.len());

    push_collapsed(
        &mut out,
        raw.chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase()),
    );

    out
}

/// Collapse a word to the spelling it would have after normalization.
///
/// Vocabulary and keyword tables are compared against normalized text, so
/// their entries go through the same letter collapsing ("three" → "thre").
pub fn canonical_word(word: &str) -> String
{
    let mut out = String::with_capacity(word.len());

    push_collapsed(
        &mut out,
        word.trim()
            .chars()
            .map(|c| c.to_ascii_lowercase()),
    );

    out
}

/// Replace `-` with a space when both neighbours are ASCII letters
fn split_hyphenated(raw: &str) -> String
{
    let chars: Vec<char> = raw
        .chars()
        .collect();

    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let between_letters = c == '-'
                && i > 0
                && chars[i - 1].is_ascii_alphabetic()
                && chars
                    .get(i + 1)
                    .is_some_and(char::is_ascii_alphabetic);

            if between_letters { ' ' } else { c }
        })
        .collect()
}

/// Append `chars` to `out`, dropping a letter equal to the one before it.
/// Digits and other characters are always kept.
fn push_collapsed(
    out: &mut String,
    chars: impl Iterator<Item = char>,
)
{
    let mut prev: Option<char> = None;

    for c in chars
    {
        if c.is_ascii_alphabetic() && prev == Some(c)
        {
            continue;
        }

        out.push(c);
        prev = Some(c);
    }
}
