//! Arithmetic on recovered operands and answer formatting.

use serde::{Deserialize, Serialize};

use super::operator::Operator;

/// Fractional digits in every answer
pub const PRECISION: usize = 2;

/// A submitted answer: a decimal string with exactly [`PRECISION`]
/// fractional digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answer(String);

impl Answer
{
    /// Format a value with two fractional digits.
    ///
    /// Rounding is that of `format!("{:.2}")`: the exact binary value is
    /// rounded to nearest, ties to even. A result that rounds to zero is
    /// always rendered unsigned. Non-finite values render as `0.00`.
    pub fn from_value(value: f64) -> Self
    {
        if !value.is_finite()
        {
            return Self(format!("{:.*}", PRECISION, 0.0));
        }

        let s = format!("{:.*}", PRECISION, value);
        match s.strip_prefix('-')
        {
            Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => Self(rest.to_string()),
            _ => Self(s),
        }
    }

    pub fn as_str(&self) -> &str
    {
        &self.0
    }
}

impl std::fmt::Display for Answer
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result
    {
        f.write_str(&self.0)
    }
}

/// Apply `op` to `a` and `b`. Division by zero yields zero.
pub fn apply(
    a: f64,
    b: f64,
    op: Operator,
) -> f64
{
    match op
    {
        Operator::Add => a + b,
        Operator::Subtract => a - b,
        Operator::Multiply => a * b,
        Operator::Divide =>
        {
            if b == 0.0
            {
                0.0
            }
            else
            {
                a / b
            }
        }
    }
}

/// Apply and format in one step
pub fn evaluate(
    a: f64,
    b: f64,
    op: Operator,
) -> Answer
{
    Answer::from_value(apply(a, b, op))
}
