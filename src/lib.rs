//! **unriddle** - Deterministic solver for obfuscated arithmetic verification challenges
//!
//! Recovers two operands and an operator from deliberately corrupted word problems
//! ("tHiRrTy-tWwO nEeWtOnS ... dOuUbLeS") and formats a two-decimal answer, optionally
//! asking a text-completion oracle first.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Solver pipeline - normalization, operand recovery, operator detection, evaluation
pub mod core
{
    /// Case, punctuation, hyphen and letter-doubling cleanup; blob rendering
    mod normalize;

    /// Digit literals, compound number words and blob recovery
    mod numbers;
    pub use numbers::{NumberWord, Operand, OperandSource, Strategy, default_number_words};

    /// Keyword families with multiply > divide > subtract > add precedence
    mod operator;
    pub use operator::{KeywordTable, Operator};

    /// Arithmetic and two-decimal answer formatting
    mod evaluate;
    pub use evaluate::Answer;

    /// Text-completion oracle trait and messages-API client
    pub mod oracle;
    pub use oracle::{HttpOracle, Oracle, OracleConfig, OracleError};

    /// Facade: oracle-first or deterministic-only solving
    pub mod solver;
    pub use solver::{Breakdown, Policy, SolveError, Solver};

    /// Verification payloads and rejection triage for the platform boundary
    pub mod platform;
    pub use platform::{Rejection, VerificationPrompt, VerifyRequest};
}

/// CLI command handlers
pub mod cli_ext
{
    /// solve / inspect / respond / triage
    pub mod solve_cmd;
}

/// Infrastructure - Configuration and logging
pub mod infra
{
    /// Layered configuration (defaults, file, environment) with TOML init
    pub mod config;
    pub use config::{Config, init as config_init, load_config};

    /// Tracing subscriber setup
    pub mod logging;
}

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli, Commands};
pub use infra::{Config, load_config};

// Core types for external consumers
pub use core::{Answer, Operator, Policy, Solver};
