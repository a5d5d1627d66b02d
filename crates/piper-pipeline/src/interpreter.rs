//! Piper file interpreter.
//!
//! Reads a piper file line by line, dispatching each directive to a
//! [`PipelineBuilder`]. `load` directives recurse into other piper files
//! with the same interpreter state: the builder, the user namespaces and the
//! attached command-line options are shared across the whole include tree.
//!
//! Failures to resolve or create a component, or to locate a loaded file,
//! abort the enclosing top-level [`PiperInterpreter::load_file`]. Every other
//! problem is logged and drops only the effect of its own line.

use std::io::BufRead;
use std::path::PathBuf;

use piper_common::config::InterpreterConfig;
use piper_common::constants::PIPELINE_SUBDIR;
use piper_common::error::{PiperError, Result};
use piper_common::types::{Capability, ViewSet};
use piper_lang::{
    CliOptionals, Command, Line, classify_line, extract_views, parse_description_values,
    parse_parameters, parse_parameters_with_cli_override, split_name,
};

use crate::builder::{PipelineBuilder, PipelinePlan};
use crate::include::IncludeGraph;
use crate::locator::{LocatedResource, ResourceLocator};
use crate::registry::ComponentRegistry;
use crate::resolver::ComponentResolver;

/// What interpreting a single line did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank or comment line.
    Ignored,
    /// The directive took effect.
    Applied,
    /// The directive failed without aborting interpretation.
    Skipped,
}

/// Interprets piper files into a [`PipelineBuilder`].
pub struct PiperInterpreter<B: PipelineBuilder = PipelinePlan> {
    builder: B,
    resolver: ComponentResolver,
    locator: Box<dyn ResourceLocator>,
    config: InterpreterConfig,
    user_namespaces: Vec<String>,
    cli_options: Option<Box<dyn CliOptionals>>,
    load_stack: Vec<String>,
    includes: IncludeGraph,
}

impl PiperInterpreter<PipelinePlan> {
    /// Creates an interpreter recording into a fresh [`PipelinePlan`].
    pub fn new(registry: ComponentRegistry, locator: impl ResourceLocator + 'static) -> Self {
        Self::with_builder(registry, locator, PipelinePlan::new())
    }
}

impl<B: PipelineBuilder> PiperInterpreter<B> {
    /// Creates an interpreter driving `builder`.
    pub fn with_builder(
        registry: ComponentRegistry,
        locator: impl ResourceLocator + 'static,
        builder: B,
    ) -> Self {
        let config = InterpreterConfig::default();
        Self {
            builder,
            resolver: ComponentResolver::new(registry, config.builtin_namespaces.clone()),
            locator: Box::new(locator),
            config,
            user_namespaces: Vec::new(),
            cli_options: None,
            load_stack: Vec::new(),
            includes: IncludeGraph::new(),
        }
    }

    /// Replaces the configuration, returning the interpreter.
    ///
    /// Search roots are a concern of the locator and are not applied here.
    #[must_use]
    pub fn with_config(mut self, config: InterpreterConfig) -> Self {
        self.resolver
            .set_builtin_namespaces(config.builtin_namespaces.clone());
        self.config = config;
        self
    }

    /// Interprets the piper file `name`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error, wrapped in [`PiperError::AtLine`] for
    /// every file of the include chain it occurred in.
    pub fn load_file(&mut self, name: &str) -> Result<()> {
        let result = self.load(name);
        if let Err(e) = &result {
            tracing::error!(file = name, error = %e, "piper file interpretation failed");
        }
        result
    }

    /// Interprets one line.
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal failures of `load`, `reader`, `add`,
    /// `addLogged`, `addLast` and `addDescription`.
    pub fn interpret_line(&mut self, line: &str) -> Result<LineOutcome> {
        let Line::Directive(directive) = classify_line(line) else {
            return Ok(LineOutcome::Ignored);
        };
        let command = match directive.command.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!(command = directive.command, error = %e, "skipping piper line");
                return Ok(LineOutcome::Skipped);
            }
        };

        let (views, remaining) = extract_views(directive.argument);
        tracing::debug!(%command, argument = remaining.trim(), "dispatching directive");
        match self.dispatch(command, remaining.trim(), &views) {
            Ok(()) => Ok(LineOutcome::Applied),
            Err(e) if e.is_fatal() && aborts_on_failure(command) => Err(e),
            Err(e) => {
                tracing::warn!(%command, error = %e, "skipping piper directive");
                Ok(LineOutcome::Skipped)
            }
        }
    }

    /// Appends a user namespace searched for components and piper files.
    pub fn register_namespace(&mut self, namespace: impl Into<String>) {
        let namespace = namespace.into();
        tracing::debug!(namespace = %namespace, "registering user namespace");
        self.user_namespaces.push(namespace);
    }

    /// Attaches the command-line option values used by `cli` directives.
    pub fn attach_cli_optionals(&mut self, options: impl CliOptionals + 'static) {
        self.cli_options = Some(Box::new(options));
    }

    /// The builder.
    pub const fn builder(&self) -> &B {
        &self.builder
    }

    /// The builder, mutably.
    pub const fn builder_mut(&mut self) -> &mut B {
        &mut self.builder
    }

    /// Consumes the interpreter, returning the builder.
    pub fn into_builder(self) -> B {
        self.builder
    }

    /// User namespaces in search order.
    pub fn user_namespaces(&self) -> &[String] {
        &self.user_namespaces
    }

    /// Files interpreted so far and which loaded which.
    pub const fn include_graph(&self) -> &IncludeGraph {
        &self.includes
    }

    /// The component resolver.
    pub const fn resolver(&self) -> &ComponentResolver {
        &self.resolver
    }

    /// The active configuration.
    pub const fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    fn load(&mut self, name: &str) -> Result<()> {
        if self.load_stack.len() >= self.config.max_load_depth {
            return Err(PiperError::LoadDepthExceeded {
                depth: self.config.max_load_depth,
                name: name.to_string(),
            });
        }

        let resource = self.locate_piper(name)?;
        let id = resource
            .origin
            .as_ref()
            .map_or_else(|| resource.name.clone(), |p| p.display().to_string());
        if self.load_stack.contains(&id) {
            let mut chain = self.load_stack.clone();
            chain.push(id);
            return Err(PiperError::LoadCycle {
                chain: chain.join(" -> "),
            });
        }
        match self.load_stack.last() {
            Some(parent) => self.includes.record_include(parent, &id),
            None => self.includes.record_root(&id),
        }

        tracing::info!(file = %id, depth = self.load_stack.len(), "loading piper file");
        self.load_stack.push(id);
        let LocatedResource { name, reader, .. } = resource;
        let result = self.interpret_lines(reader, &name);
        let _ = self.load_stack.pop();
        result
    }

    fn interpret_lines(&mut self, reader: Box<dyn BufRead>, source_name: &str) -> Result<()> {
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| PiperError::Io {
                path: PathBuf::from(source_name),
                source,
            })?;
            let _ = self
                .interpret_line(&line)
                .map_err(|e| PiperError::AtLine {
                    source_name: source_name.to_string(),
                    line: index + 1,
                    source: Box::new(e),
                })?;
        }
        Ok(())
    }

    fn locate_piper(&mut self, name: &str) -> Result<LocatedResource> {
        let extension = &self.config.piper_extension;
        let mut names = vec![name.to_string()];
        if !extension.is_empty() && !name.to_lowercase().ends_with(&extension.to_lowercase()) {
            names.push(format!("{name}{extension}"));
        }

        for candidate in names {
            if let Some(resource) = self.search_piper(&candidate) {
                self.register_origin(&resource);
                return Ok(resource);
            }
        }
        Err(PiperError::ResourceUnavailable {
            name: name.to_string(),
        })
    }

    fn search_piper(&self, name: &str) -> Option<LocatedResource> {
        if let Some(resource) = self.locator.locate_quiet(name) {
            return Some(resource);
        }
        self.user_namespaces
            .iter()
            .chain(self.resolver.builtin_namespaces())
            .find_map(|namespace| {
                let dir = namespace_dir(namespace);
                self.locator
                    .locate_quiet(&format!("{dir}/{name}"))
                    .or_else(|| {
                        self.locator
                            .locate_quiet(&format!("{dir}/{PIPELINE_SUBDIR}/{name}"))
                    })
            })
    }

    fn register_origin(&mut self, resource: &LocatedResource) {
        let Some(parent) = resource.origin.as_ref().and_then(|p| p.parent()) else {
            return;
        };
        let parent = parent.to_string_lossy();
        if !parent.is_empty() && !self.user_namespaces.iter().any(|ns| *ns == parent) {
            self.register_namespace(parent.into_owned());
        }
    }

    fn dispatch(&mut self, command: Command, argument: &str, views: &ViewSet) -> Result<()> {
        match command {
            Command::Package => {
                require_argument(command, argument)?;
                self.register_namespace(argument);
                Ok(())
            }
            Command::Load => {
                require_argument(command, argument)?;
                self.load(argument)
            }
            Command::Set => self.builder.set_parameters(parse_parameters(argument)),
            Command::Cli => {
                let options = self
                    .cli_options
                    .as_deref()
                    .ok_or(PiperError::CliOverrideUnavailable)?;
                let parameters = parse_parameters_with_cli_override(argument, Some(options));
                self.builder.set_parameters_if_absent(parameters)
            }
            Command::Reader => {
                let (name, blob) = split_name(argument);
                require_argument(command, name)?;
                let reader = self
                    .resolver
                    .resolve(name, Capability::Reader, &self.user_namespaces)?;
                self.builder.set_reader(&reader, parse_parameters(blob))
            }
            Command::ReadFiles => self.builder.set_read_files(optional(argument)),
            Command::Add | Command::AddLogged | Command::AddLast => {
                let (name, blob) = split_name(argument);
                require_argument(command, name)?;
                let component = self.resolver.resolve(
                    name,
                    Capability::AnalysisComponent,
                    &self.user_namespaces,
                )?;
                let parameters = parse_parameters(blob);
                match command {
                    Command::AddLogged => {
                        self.builder
                            .add_logged_component(&component, views, parameters)
                    }
                    Command::AddLast => {
                        self.builder
                            .add_last_component(&component, views, parameters)
                    }
                    _ => self.builder.add_component(&component, views, parameters),
                }
            }
            Command::AddDescription => {
                let (name, blob) = split_name(argument);
                require_argument(command, name)?;
                let component = self.resolver.resolve(
                    name,
                    Capability::AnalysisComponent,
                    &self.user_namespaces,
                )?;
                let description = component.describe(&parse_description_values(blob))?;
                self.builder.add_component_description(description, views)
            }
            Command::CollectCuis => self.builder.enable_cui_collection(),
            Command::CollectEntities => self.builder.enable_entity_collection(),
            Command::WriteXmis => self.builder.set_xmi_output(optional(argument)),
        }
    }
}

/// Commands whose fatal failures abort the enclosing load.
const fn aborts_on_failure(command: Command) -> bool {
    matches!(
        command,
        Command::Load
            | Command::Reader
            | Command::Add
            | Command::AddLogged
            | Command::AddLast
            | Command::AddDescription
    )
}

fn require_argument(command: Command, argument: &str) -> Result<()> {
    if argument.is_empty() {
        return Err(PiperError::syntax(format!("{command} needs an argument")));
    }
    Ok(())
}

fn optional(argument: &str) -> Option<&str> {
    (!argument.is_empty()).then_some(argument)
}

/// Directory searched for piper files of a namespace.
///
/// Namespaces registered from file locations are already paths; dotted
/// namespaces map each segment to a directory.
fn namespace_dir(namespace: &str) -> String {
    if namespace.contains(['/', '\\']) {
        namespace.trim_end_matches(['/', '\\']).to_string()
    } else {
        namespace.replace('.', "/")
    }
}
