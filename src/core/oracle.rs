//! Text-completion oracle used as the first solving attempt.
//!
//! The oracle receives the raw challenge and a fixed instruction, and its
//! free-form reply is mined for the first decimal number. Every failure mode
//! surfaces as an [`OracleError`]; the solver turns those into a fall-through
//! to the deterministic path.

use std::{sync::LazyLock, time::Duration};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::evaluate::Answer;

/// Instruction sent alongside every challenge
pub const SYSTEM_PROMPT: &str = "You solve arithmetic word problems that have been deliberately \
garbled. Letters may be in random case or repeated, words may be split apart or hyphenated, and \
stray symbols may be inserted. Recover the two numbers and the operation, compute the result, and \
reply with only that number rounded to two decimal places, for example 42.00. Do not explain.";

/// First number-shaped substring of a reply
static REPLY_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?[0-9]+\.?[0-9]*").expect("reply number pattern"));

/// Why the oracle could not produce an answer
#[derive(Debug, thiserror::Error)]
pub enum OracleError
{
    #[error("no API key configured")]
    MissingApiKey,

    #[error("oracle request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("oracle returned status {0}")]
    Status(u16),

    #[error("oracle returned no text")]
    EmptyReply,

    #[error("no number in oracle reply: {0:?}")]
    NoNumber(String),
}

/// Anything that can answer a short prompt with free text
pub trait Oracle: Send + Sync
{
    /// Send `system` as the instruction and `challenge` as user content
    fn complete(
        &self,
        system: &str,
        challenge: &str,
    ) -> Result<String, OracleError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Ask `oracle` for an answer and normalize it to two fractional digits
#[instrument(level = "debug", skip_all, fields(oracle = oracle.name()))]
pub(crate) fn solve_via_oracle(
    oracle: &dyn Oracle,
    challenge: &str,
) -> Result<Answer, OracleError>
{
    let reply = oracle.complete(SYSTEM_PROMPT, challenge)?;
    debug!(reply = %reply, "oracle replied");
    parse_reply(&reply)
}

/// Extract the first decimal number from a reply
pub(crate) fn parse_reply(reply: &str) -> Result<Answer, OracleError>
{
    let text = reply.trim();
    if text.is_empty()
    {
        return Err(OracleError::EmptyReply);
    }

    REPLY_NUMBER
        .find(text)
        .and_then(|m| {
            m.as_str()
                .parse::<f64>()
                .ok()
        })
        .map(Answer::from_value)
        .ok_or_else(|| OracleError::NoNumber(text.chars().take(80).collect()))
}

/// Connection settings for [`HttpOracle`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig
{
    /// API root; requests go to `{base_url}/v1/messages`
    pub base_url: String,
    /// Bearer token; the oracle is disabled when unset
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    /// Whole-request timeout
    pub timeout_secs: u64,
}

impl Default for OracleConfig
{
    fn default() -> Self
    {
        Self {
            base_url: "https://api.anthropic.com".to_string(),
            api_key: None,
            model: "claude-haiku-4-5".to_string(),
            max_tokens: 64,
            timeout_secs: 15,
        }
    }
}

#[derive(Serialize, Debug)]
struct MessagesRequest<'a>
{
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Serialize, Debug)]
struct Message<'a>
{
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize, Default, Debug)]
#[serde(default)]
struct MessagesResponse
{
    content: Vec<ContentBlock>,
}

#[derive(Deserialize, Default, Debug)]
#[serde(default)]
struct ContentBlock
{
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

impl MessagesResponse
{
    /// Concatenated text of every `text` block
    fn text(&self) -> String
    {
        self.content
            .iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text.as_deref())
            .collect::<String>()
            .trim()
            .to_string()
    }
}

/// Messages-API oracle over a blocking HTTP client
pub struct HttpOracle
{
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl HttpOracle
{
    pub fn new(config: &OracleConfig) -> Result<Self, OracleError>
    {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(OracleError::MissingApiKey)?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/v1/messages",
                config
                    .base_url
                    .trim_end_matches('/')
            ),
            api_key,
            model: config
                .model
                .clone(),
            max_tokens: config.max_tokens,
        })
    }
}

impl Oracle for HttpOracle
{
    fn complete(
        &self,
        system: &str,
        challenge: &str,
    ) -> Result<String, OracleError>
    {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages: [Message { role: "user", content: challenge }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()?;

        let status = resp.status();
        if !status.is_success()
        {
            return Err(OracleError::Status(status.as_u16()));
        }

        let text = resp
            .json::<MessagesResponse>()?
            .text();

        if text.is_empty()
        {
            return Err(OracleError::EmptyReply);
        }

        Ok(text)
    }

    fn name(&self) -> &'static str
    {
        "http-messages"
    }
}
