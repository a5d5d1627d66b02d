//! `piper resolve` — Show which component a name resolves to.

use std::path::PathBuf;

use clap::Args;

use piper_common::types::Capability;
use piper_pipeline::resolver::ComponentResolver;

/// Arguments for the `resolve` command.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Bare or fully-qualified component name.
    pub name: String,

    /// Resolve as a collection reader instead of an analysis component.
    #[arg(long)]
    pub reader: bool,

    /// User namespace searched before the built-ins (repeatable, in order).
    #[arg(long = "package", value_name = "NS")]
    pub packages: Vec<String>,

    /// Component catalog (JSON or YAML).
    #[arg(long, env = "PIPER_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Interpreter configuration (JSON or YAML).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// List every candidate symbol in search order.
    #[arg(long)]
    pub candidates: bool,
}

/// Executes the `resolve` command.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or nothing matches.
pub fn execute(args: ResolveArgs) -> anyhow::Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let registry = super::load_registry(args.catalog.as_deref())?;
    let resolver = ComponentResolver::new(registry, config.builtin_namespaces);
    let capability = if args.reader {
        Capability::Reader
    } else {
        Capability::AnalysisComponent
    };

    if args.candidates {
        for candidate in resolver.candidates(&args.name, capability, &args.packages) {
            let marker = if resolver.registry().get(&candidate).is_some() {
                "*"
            } else {
                " "
            };
            println!("{marker} {candidate}");
        }
    }

    let symbol = resolver.resolve(&args.name, capability, &args.packages)?;
    println!("{}\t{}", symbol.name(), symbol.kind());
    Ok(())
}
