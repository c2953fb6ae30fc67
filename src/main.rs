use anyhow::Result;
use clap::Parser;
use unriddle::{
    cli::{AppContext, Cli, Commands},
    cli_ext::solve_cmd,
    infra::logging,
};

fn main() -> Result<()>
{
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.quiet);

    // Build a context once, pass everywhere
    let ctx = AppContext { quiet: cli.quiet, no_color: cli.no_color };

    match cli.command
    {
        Commands::Solve(args) => solve_cmd::solve(args, &ctx),
        Commands::Inspect(args) => solve_cmd::inspect(args, &ctx),
        Commands::Respond(args) => solve_cmd::respond(args, &ctx),
        Commands::Triage(args) => solve_cmd::triage(args, &ctx),
        Commands::Init(args) => unriddle::infra::config::init(args, &ctx),
        Commands::Completions(args) => unriddle::completion::run(args, &ctx),
    }
}
