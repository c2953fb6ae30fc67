//! Shell completion scripts for `unrd`.

use std::fs;

use anyhow::{Context, Result, bail};
use clap::CommandFactory;
use clap_complete::{Shell as CompletionShell, generate, generate_to};
use tracing::info;

use crate::cli::{AppContext, Cli, CompletionsArgs, Shell};

/// Binary name the completions are generated for
pub const BIN_NAME: &str = "unrd";

fn target(shell: Shell) -> CompletionShell
{
    match shell
    {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    }
}

/// Render the completion script for `shell` into memory
pub fn script(shell: Shell) -> Result<String>
{
    let mut buf = Vec::new();
    generate(target(shell), &mut Cli::command(), BIN_NAME, &mut buf);
    String::from_utf8(buf).context("Completion script is not UTF-8")
}

pub fn run(
    args: CompletionsArgs,
    ctx: &AppContext,
) -> Result<()>
{
    if args.stdout
    {
        print!("{}", script(args.shell)?);
        return Ok(());
    }

    let Some(dir) = args.out_dir
    else
    {
        bail!("Pass --stdout or --out-dir DIR");
    };

    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = generate_to(target(args.shell), &mut Cli::command(), BIN_NAME, &dir)
        .context("Failed to write completion script")?;

    info!(path = %path.display(), "wrote completion script");
    if !ctx.quiet
    {
        println!("Wrote {} completion to {}", target(args.shell), path.display());
    }
    Ok(())
}
