//! Operator detection from keyword evidence.

use aho_corasick::{AhoCorasick, MatchKind};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The four arithmetic operations a challenge can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator
{
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator
{
    /// Families are checked in this order; the first with a hit wins
    pub const PRECEDENCE: [Operator; 4] =
        [Operator::Multiply, Operator::Divide, Operator::Subtract, Operator::Add];

    pub fn symbol(self) -> char
    {
        match self
        {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    fn rank(self) -> usize
    {
        match self
        {
            Operator::Multiply => 0,
            Operator::Divide => 1,
            Operator::Subtract => 2,
            Operator::Add => 3,
        }
    }
}

impl std::fmt::Display for Operator
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result
    {
        match self
        {
            Operator::Add => write!(f, "add"),
            Operator::Subtract => write!(f, "subtract"),
            Operator::Multiply => write!(f, "multiply"),
            Operator::Divide => write!(f, "divide"),
        }
    }
}

/// Keyword lists per operator. Keywords are stems matched as substrings,
/// so "multipl" covers "multiply", "multiplied" and "multiplication".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordTable
{
    pub multiply: Vec<String>,
    pub divide: Vec<String>,
    pub subtract: Vec<String>,
    pub add: Vec<String>,
}

impl Default for KeywordTable
{
    fn default() -> Self
    {
        fn owned(words: &[&str]) -> Vec<String>
        {
            words
                .iter()
                .map(|w| w.to_string())
                .collect()
        }

        Self {
            multiply: owned(&["product", "multipl", "times", "double", "triple"]),
            divide: owned(&["divid", "split", "half", "halv", "quarter", "ratio"]),
            subtract: owned(&[
                "decelerat", "subtract", "minus", "decrease", "slow", "loses", "lose", "drop",
                "reduc", "shrink", "falls", "fell", "lower", "behind", "less",
            ]),
            add: owned(&[
                "accelerat", "add", "plus", "increase", "gain", "faster", "more", "grows", "grow",
                "climbs", "climb", "rises", "rise", "ahead", "boost", "extra", "sum", "total",
            ]),
        }
    }
}

impl KeywordTable
{
    fn family(
        &self,
        op: Operator,
    ) -> &[String]
    {
        match op
        {
            Operator::Add => &self.add,
            Operator::Subtract => &self.subtract,
            Operator::Multiply => &self.multiply,
            Operator::Divide => &self.divide,
        }
    }
}

/// Outcome of a classification pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evidence
{
    /// A keyword from this family was found
    Keyword(Operator),
    /// Nothing matched; the caller falls back to [`Operator::Add`]
    Absent,
}

impl Evidence
{
    pub fn operator(self) -> Operator
    {
        match self
        {
            Evidence::Keyword(op) => op,
            Evidence::Absent => Operator::Add,
        }
    }
}

/// Single automaton over every keyword of every family.
///
/// Keywords are lowercased but otherwise kept as written. They are matched
/// against the cleaned text, where letter runs survive, and against the
/// blob, where a doubled keyword letter ("add") can no longer match.
#[derive(Debug, Clone)]
pub struct OperatorClassifier
{
    automaton: AhoCorasick,
    /// Operator for each automaton pattern id
    families: Vec<Operator>,
}

impl OperatorClassifier
{
    pub fn new(table: &KeywordTable) -> Result<Self>
    {
        let mut patterns = Vec::new();
        let mut families = Vec::new();

        for op in Operator::PRECEDENCE
        {
            for kw in table.family(op)
            {
                let kw = kw
                    .trim()
                    .to_ascii_lowercase();
                if kw.is_empty()
                {
                    continue;
                }

                patterns.push(kw);
                families.push(op);
            }
        }

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&patterns)
            .context("Failed to build operator keyword automaton")?;

        Ok(Self { automaton, families })
    }

    /// Highest-precedence family with any keyword occurring in `text`
    pub fn evidence(
        &self,
        text: &str,
    ) -> Evidence
    {
        self.automaton
            .find_overlapping_iter(text)
            .map(|m| self.families[m.pattern().as_usize()])
            .min_by_key(|op| op.rank())
            .map_or(Evidence::Absent, Evidence::Keyword)
    }

    /// Classify using the cleaned text, consulting the blob when the
    /// cleaned text only supports `add`.
    ///
    /// Obfuscation can break a keyword across tokens ("mul tiplied"); the
    /// blob rejoins it.
    pub fn classify(
        &self,
        cleaned: &str,
        blob: &str,
    ) -> Operator
    {
        let primary = self
            .evidence(cleaned)
            .operator();

        if primary != Operator::Add
        {
            return primary;
        }

        match self
            .evidence(blob)
            .operator()
        {
            Operator::Add => primary,
            other => other,
        }
    }
}
