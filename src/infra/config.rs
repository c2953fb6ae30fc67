use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    cli::{AppContext, InitArgs},
    core::{HttpOracle, KeywordTable, NumberWord, OracleConfig, Policy, Solver, default_number_words},
};

/// Config files looked up in the working directory, first hit wins
pub const CONFIG_FILES: [&str; 4] =
    ["unriddle.toml", "unriddle.yaml", "unriddle.json", ".unriddle.toml"];

/// Environment prefix; nested keys use `__`, e.g. `UNRIDDLE__ORACLE__API_KEY`
pub const ENV_PREFIX: &str = "UNRIDDLE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Default solving behavior
    pub solver: SolverConfig,

    /// Operator keyword families
    pub keywords: KeywordTable,

    /// Spelled-out numbers recognized by the extractor
    pub vocabulary: Vec<NumberWord>,

    /// Completion oracle connection
    pub oracle: OracleConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig
{
    pub policy: Policy,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            solver: SolverConfig::default(),
            keywords: KeywordTable::default(),
            vocabulary: default_number_words(),
            oracle: OracleConfig::default(),
        }
    }
}

impl Config
{
    /// Build a solver from this configuration.
    ///
    /// An oracle is attached only when an API key is configured.
    pub fn build_solver(&self) -> Result<Solver>
    {
        let solver = Solver::new(&self.vocabulary, &self.keywords)
            .context("Failed to build solver from configuration")?;

        let has_key = self
            .oracle
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty());

        if !has_key
        {
            debug!("no oracle API key configured, oracle disabled");
            return Ok(solver);
        }

        let oracle = HttpOracle::new(&self.oracle).context("Failed to build oracle client")?;
        Ok(solver.with_oracle(Box::new(oracle)))
    }
}

/// Load configuration from the first config file in the working directory
/// plus `UNRIDDLE__*` environment overrides
pub fn load_config() -> Result<Config>
{
    let file = CONFIG_FILES
        .iter()
        .map(Path::new)
        .find(|p| p.exists());

    load_config_from(file)
}

/// Defaults, then `file` if given, then environment overrides
pub fn load_config_from(file: Option<&Path>) -> Result<Config>
{
    let defaults =
        config::Config::try_from(&Config::default()).context("Failed to seed default config")?;

    let mut builder = config::Config::builder().add_source(defaults);

    if let Some(path) = file
    {
        debug!(path = %path.display(), "loading config file");
        builder = builder.add_source(config::File::from(path));
    }

    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__"),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join("unriddle.toml");

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}
