//! `piper plan` — Interpret a piper file and display the pipeline plan.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use piper_lang::CliOptionMap;
use piper_pipeline::interpreter::PiperInterpreter;
use piper_pipeline::locator::FileLocator;

use crate::output;

/// Arguments for the `plan` command.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Piper file to interpret, as a path or a name searched in namespaces.
    pub file: String,

    /// Component catalog (JSON or YAML).
    #[arg(long, env = "PIPER_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Interpreter configuration (JSON or YAML).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Value of the `i` command-line option (input directory).
    #[arg(short = 'i', long = "input")]
    pub input: Option<String>,

    /// Value of the `o` command-line option (output directory).
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    /// Additional command-line option as `<key>=<value>`.
    #[arg(long = "option", value_name = "K=V")]
    pub options: Vec<String>,

    /// Print the plan as JSON.
    #[arg(long)]
    pub json: bool,

    /// Also print which piper files loaded which.
    #[arg(long)]
    pub includes: bool,
}

impl PlanArgs {
    fn cli_options(&self) -> anyhow::Result<CliOptionMap> {
        let mut options = CliOptionMap::new();
        if let Some(input) = &self.input {
            let _ = options.insert('i', input.clone());
        }
        if let Some(out) = &self.output {
            let _ = options.insert('o', out.clone());
        }
        for assignment in &self.options {
            let (key, value) = CliOptionMap::parse_assignment(assignment)?;
            let _ = options.insert(key, value);
        }
        Ok(options)
    }
}

/// Executes the `plan` command.
///
/// # Errors
///
/// Returns an error if the catalog or configuration cannot be loaded or the
/// piper file fails to interpret.
pub fn execute(args: PlanArgs) -> anyhow::Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let registry = super::load_registry(args.catalog.as_deref())?;
    let options = args.cli_options()?;

    let locator = FileLocator::from_env(&config.search_roots);
    let mut interpreter = PiperInterpreter::new(registry, locator).with_config(config);
    interpreter.attach_cli_optionals(options);

    tracing::info!(file = %args.file, "interpreting piper file");
    interpreter
        .load_file(&args.file)
        .with_context(|| format!("failed to interpret {}", args.file))?;

    let plan = interpreter.builder();
    if args.json {
        println!("{}", plan.to_json()?);
    } else {
        print!("{}", output::render_plan(&args.file, plan));
    }
    if args.includes {
        println!();
        print!("{}", output::render_includes(interpreter.include_graph()));
    }
    Ok(())
}
