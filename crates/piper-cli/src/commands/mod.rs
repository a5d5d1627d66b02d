//! CLI command definitions and dispatch.

pub mod plan;
pub mod resolve;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

use piper_common::config::InterpreterConfig;
use piper_pipeline::catalog::Catalog;
use piper_pipeline::registry::ComponentRegistry;

/// piper — interpret piper pipeline descriptions.
#[derive(Parser, Debug)]
#[command(name = piper_common::constants::BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interpret a piper file and print the resulting pipeline plan.
    Plan(plan::PlanArgs),
    /// Show which component a bare or qualified name resolves to.
    Resolve(resolve::ResolveArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Plan(args) => plan::execute(args),
        Command::Resolve(args) => resolve::execute(args),
    }
}

/// Loads the component registry from an optional catalog file.
fn load_registry(catalog: Option<&Path>) -> anyhow::Result<ComponentRegistry> {
    let Some(path) = catalog else {
        tracing::warn!("no component catalog given, every component lookup will fail");
        return Ok(ComponentRegistry::new());
    };
    let catalog = Catalog::load(path)
        .with_context(|| format!("failed to load catalog {}", path.display()))?;
    Ok(catalog.into_registry())
}

/// Loads interpreter configuration; `.json` files are JSON, others YAML.
fn load_config(path: Option<&Path>) -> anyhow::Result<InterpreterConfig> {
    let Some(path) = path else {
        return Ok(InterpreterConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        InterpreterConfig::from_json(&text)?
    } else {
        serde_yaml::from_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))?
    };
    tracing::debug!(path = %path.display(), "loaded interpreter config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_arguments_parse() {
        let cli = Cli::try_parse_from([
            "piper",
            "plan",
            "Default.piper",
            "-i",
            "/in",
            "--option",
            "t=4",
            "--json",
        ])
        .expect("should parse");
        let Command::Plan(args) = cli.command else {
            panic!("expected plan");
        };
        assert_eq!(args.file, "Default.piper");
        assert_eq!(args.input.as_deref(), Some("/in"));
        assert_eq!(args.options, vec!["t=4"]);
        assert!(args.json);
    }

    #[test]
    fn resolve_arguments_parse() {
        let cli = Cli::try_parse_from([
            "piper",
            "resolve",
            "FileTreeReader",
            "--reader",
            "--package",
            "com.acme",
            "--package",
            "org.example",
        ])
        .expect("should parse");
        let Command::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert!(args.reader);
        assert_eq!(args.packages, vec!["com.acme", "org.example"]);
    }

    #[test]
    fn yaml_config_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("piper.yaml");
        std::fs::write(&path, "max_load_depth: 3\n").expect("write");
        let config = load_config(Some(path.as_path())).expect("should load");
        assert_eq!(config.max_load_depth, 3);
        assert_eq!(config.piper_extension, ".piper");
    }

    #[test]
    fn missing_catalog_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_registry(Some(dir.path().join("none.yaml").as_path())).is_err());
        assert!(load_registry(None).expect("empty registry").is_empty());
    }
}
