//! CLI command handlers for solving, inspecting and answering challenges.

use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::{
    cli::{AppContext, InspectArgs, OutputFormat, RespondArgs, SolveArgs, TriageArgs},
    core::{
        platform::{Rejection, VerificationPrompt, VerifyRequest},
        solver::Breakdown,
    },
    infra::config::load_config,
};

/// Join positional words, or read stdin when there are none
fn challenge_text(words: &[String]) -> Result<String>
{
    if !words.is_empty()
    {
        return Ok(words.join(" "));
    }

    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read challenge from stdin")?;

    Ok(buf
        .trim()
        .to_string())
}

#[instrument(skip_all)]
pub fn solve(
    args: SolveArgs,
    _ctx: &AppContext,
) -> Result<()>
{
    let cfg = load_config()?;
    let solver = cfg.build_solver()?;
    let policy = args
        .policy
        .unwrap_or(cfg.solver.policy);

    let challenge = challenge_text(&args.challenge)?;

    match solver.solve(&challenge, policy)
    {
        Some(answer) =>
        {
            println!("{answer}");
            Ok(())
        }
        None => bail!("No answer: could not recover two operands from the challenge"),
    }
}

pub fn inspect(
    args: InspectArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let solver = load_config()?.build_solver()?;
    let challenge = challenge_text(&args.challenge)?;
    let breakdown = solver.explain(&challenge);

    match args.format
    {
        OutputFormat::Json =>
        {
            let out = json!({ "challenge": challenge, "breakdown": breakdown });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => print!("{}", render_breakdown(&challenge, &breakdown, ctx.no_color)),
    }

    Ok(())
}

/// Labelled, one-field-per-line view of a breakdown
pub fn render_breakdown(
    challenge: &str,
    b: &Breakdown,
    no_color: bool,
) -> String
{
    let operands = b
        .operands
        .iter()
        .map(|o| o.value.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let answer = b
        .answer
        .as_ref()
        .map_or_else(|| "none".to_string(), |a| a.to_string());

    let rows = [
        ("challenge", challenge.to_string()),
        ("normalized", b.normalized.clone()),
        ("blob", b.blob.clone()),
        ("strategy", b.strategy.to_string()),
        ("operands", operands),
        ("operator", format!("{} ({})", b.operator, b.operator.symbol())),
        ("answer", answer),
    ];

    let mut out = String::new();
    for (label, value) in rows
    {
        let label = format!("{:<12}", format!("{label}:"));
        if no_color
        {
            out.push_str(&format!("{label}{value}\n"));
        }
        else
        {
            out.push_str(&format!("{}{value}\n", label.cyan()));
        }
    }
    out
}

/// Read the response JSON from a file or stdin
fn read_response(input: Option<&Path>) -> Result<Value>
{
    let text = match input
    {
        Some(p) if p != Path::new("-") => fs::read_to_string(p)
            .with_context(|| format!("Failed to read response from {}", p.display()))?,
        _ =>
        {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read response from stdin")?;
            buf
        }
    };

    serde_json::from_str(&text).context("Response is not valid JSON")
}

#[instrument(skip_all)]
pub fn respond(
    args: RespondArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let response = read_response(args.input.as_deref())?;

    let Some(prompt) = VerificationPrompt::from_response(&response)
    else
    {
        if !ctx.quiet
        {
            eprintln!("No verification required");
        }
        return Ok(());
    };

    let cfg = load_config()?;
    let solver = cfg.build_solver()?;
    let policy = args
        .policy
        .unwrap_or(cfg.solver.policy);

    let Some(answer) = solver.solve(&prompt.challenge, policy)
    else
    {
        bail!("No answer for challenge: {}", prompt.challenge.chars().take(80).collect::<String>());
    };

    info!(%answer, "answered verification challenge");

    let body = VerifyRequest { verification_code: prompt.verification_code, answer: answer.to_string() };
    println!("{}", serde_json::to_string(&body)?);
    Ok(())
}

pub fn triage(
    args: TriageArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let message = args
        .message
        .join(" ");
    let rejection = Rejection::classify(&message);
    let verdict = if rejection.is_success()
    {
        "done"
    }
    else if rejection.is_terminal()
    {
        "terminal"
    }
    else
    {
        "retryable"
    };

    if args.json
    {
        let out = json!({
            "rejection": rejection,
            "success": rejection.is_success(),
            "terminal": rejection.is_terminal(),
        });
        println!("{out}");
    }
    else if ctx.no_color
    {
        println!("{verdict}: {rejection}");
    }
    else if rejection.is_success()
    {
        println!("{}: {rejection}", verdict.green());
    }
    else if rejection.is_terminal()
    {
        println!("{}: {rejection}", verdict.red());
    }
    else
    {
        println!("{}: {rejection}", verdict.yellow());
    }

    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::core::{KeywordTable, Solver, default_number_words};

    #[test]
    fn plain_render_has_one_line_per_field()
    {
        let solver = Solver::new(&default_number_words(), &KeywordTable::default()).unwrap();
        let b = solver.explain("only 7 here");
        let text = render_breakdown("only 7 here", &b, true);

        assert_eq!(
            text,
            "challenge:  only 7 here\n\
             normalized: only 7 here\n\
             blob:       onlyhere\n\
             strategy:   digits\n\
             operands:   7\n\
             operator:   add (+)\n\
             answer:     none\n"
        );
    }
}
