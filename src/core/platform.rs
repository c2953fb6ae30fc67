//! Platform verification payloads.
//!
//! Reading a challenge out of a verification-required response, building
//! the answer submission, and sorting rejection messages into terminal and
//! retryable ones.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Challenge and code pulled from a verification-required response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationPrompt
{
    pub verification_code: String,
    pub challenge: String,
}

impl VerificationPrompt
{
    /// Read `verification.{verification_code|code, challenge}`.
    ///
    /// `None` when the response carries no verification block or either
    /// field is missing or empty; the action went through unverified.
    pub fn from_response(response: &Value) -> Option<Self>
    {
        let v = response.get("verification")?;

        let code = ["verification_code", "code"]
            .iter()
            .find_map(|k| {
                v.get(*k)
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
            })?;

        let challenge = v
            .get("challenge")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())?;

        Some(Self { verification_code: code.to_string(), challenge: challenge.to_string() })
    }
}

/// Body of the answer submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest
{
    pub verification_code: String,
    pub answer: String,
}

/// Outcome named by a platform claim/verify error message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rejection
{
    /// This agent was already claimed, by an earlier attempt of ours
    AgentAlreadyClaimed,
    /// The social account has already claimed some other agent
    AccountBound,
    /// The platform has not indexed the proof post yet
    NoRecentTweets,
    /// Anything else, including a wrong answer
    Other,
}

impl Rejection
{
    /// Case-insensitive match on the platform's error text.
    ///
    /// "This agent has already been claimed" is about the agent;
    /// "This X account has already claimed an agent" is about the account.
    pub fn classify(message: &str) -> Self
    {
        let lower = message.to_lowercase();

        if lower.contains("already been claimed")
        {
            Rejection::AgentAlreadyClaimed
        }
        else if lower.contains("already claimed")
        {
            if lower.contains("agent") && !lower.contains("account")
            {
                Rejection::AgentAlreadyClaimed
            }
            else
            {
                Rejection::AccountBound
            }
        }
        else if lower.contains("no recent tweets") || lower.contains("couldn't find")
        {
            Rejection::NoRecentTweets
        }
        else
        {
            Rejection::Other
        }
    }

    /// The claim already went through; nothing left to do
    pub fn is_success(self) -> bool
    {
        matches!(self, Rejection::AgentAlreadyClaimed)
    }

    /// Retrying the same identity cannot succeed
    pub fn is_terminal(self) -> bool
    {
        matches!(self, Rejection::AccountBound)
    }
}

impl std::fmt::Display for Rejection
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result
    {
        match self
        {
            Rejection::AgentAlreadyClaimed => write!(f, "agent-already-claimed"),
            Rejection::AccountBound => write!(f, "account-bound"),
            Rejection::NoRecentTweets => write!(f, "no-recent-tweets"),
            Rejection::Other => write!(f, "other"),
        }
    }
}
