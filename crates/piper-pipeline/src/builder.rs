//! The sink for interpreted directives.
//!
//! [`PipelineBuilder`] is the contract the interpreter drives; it never
//! instantiates components itself. [`PipelinePlan`] is the recording
//! implementation: it keeps an ordered, serializable description of the
//! pipeline a runtime would assemble.

use std::fmt;

use serde::Serialize;

use piper_common::constants::{INPUT_DIRECTORY_PARAM, OUTPUT_DIRECTORY_PARAM};
use piper_common::error::{PiperError, Result};
use piper_common::types::{ComponentKind, Parameter, ParameterList, ParameterValue, ViewSet};

use crate::registry::{ComponentSymbol, Description};

/// Reader used by `readFiles`.
pub const FILES_READER_SYMBOL: &str = "org.apache.ctakes.core.cr.FileTreeReader";

/// Consumer used by `writeXmis`.
pub const XMI_WRITER_SYMBOL: &str = "org.apache.ctakes.core.cc.XmiWriterCasConsumerCtakes";

/// Operations a piper file can request of a pipeline.
pub trait PipelineBuilder {
    /// Sets global parameters, overwriting existing keys.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::Builder`] if the builder rejects the parameters.
    fn set_parameters(&mut self, parameters: ParameterList) -> Result<()>;

    /// Sets global parameters only where the key is absent or empty.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::Builder`] if the builder rejects the parameters.
    fn set_parameters_if_absent(&mut self, parameters: ParameterList) -> Result<()>;

    /// Sets the collection reader.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::Builder`] if the reader cannot be configured.
    fn set_reader(&mut self, reader: &ComponentSymbol, parameters: ParameterList) -> Result<()>;

    /// Sets the file tree reader over `directory`, or over the configured
    /// input directory.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::Builder`] if no directory is known.
    fn set_read_files(&mut self, directory: Option<&str>) -> Result<()>;

    /// Appends a component.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::Builder`] if the component cannot be added.
    fn add_component(
        &mut self,
        component: &ComponentSymbol,
        views: &ViewSet,
        parameters: ParameterList,
    ) -> Result<()>;

    /// Appends a component whose start and end are logged.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::Builder`] if the component cannot be added.
    fn add_logged_component(
        &mut self,
        component: &ComponentSymbol,
        views: &ViewSet,
        parameters: ParameterList,
    ) -> Result<()>;

    /// Appends a component placed after every ordinary component.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::Builder`] if the component cannot be added.
    fn add_last_component(
        &mut self,
        component: &ComponentSymbol,
        views: &ViewSet,
        parameters: ParameterList,
    ) -> Result<()>;

    /// Appends a ready-made component description.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::Builder`] if the description cannot be added.
    fn add_component_description(&mut self, description: Description, views: &ViewSet)
    -> Result<()>;

    /// Enables collection of discovered CUIs.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::Builder`] if collection cannot be enabled.
    fn enable_cui_collection(&mut self) -> Result<()>;

    /// Enables collection of discovered entities.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::Builder`] if collection cannot be enabled.
    fn enable_entity_collection(&mut self) -> Result<()>;

    /// Writes XMI files to `directory`, or to the configured output
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::Builder`] if no directory is known.
    fn set_xmi_output(&mut self, directory: Option<&str>) -> Result<()>;
}

/// A component as placed in a [`PipelinePlan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedComponent {
    /// Fully-qualified symbol.
    pub symbol: String,
    /// Component kind.
    pub kind: ComponentKind,
    /// Views the component operates on; empty means the default view.
    #[serde(skip_serializing_if = "ViewSet::is_empty")]
    pub views: ViewSet,
    /// Constructor parameters in directive order.
    pub parameters: ParameterList,
    /// Whether start and end are logged.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub logged: bool,
}

impl PlannedComponent {
    fn new(symbol: impl Into<String>, kind: ComponentKind, parameters: ParameterList) -> Self {
        Self {
            symbol: symbol.into(),
            kind,
            views: ViewSet::new(),
            parameters,
            logged: false,
        }
    }

    fn from_symbol(symbol: &ComponentSymbol, views: &ViewSet, parameters: ParameterList) -> Self {
        Self {
            views: views.clone(),
            ..Self::new(symbol.name(), symbol.kind(), parameters)
        }
    }
}

/// One entry of the processing sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum PlanStep {
    /// A component added by symbol.
    Component(PlannedComponent),
    /// A component added through its description factory.
    Description {
        /// The produced description.
        description: Description,
        /// Views the component operates on.
        #[serde(skip_serializing_if = "ViewSet::is_empty")]
        views: ViewSet,
    },
}

impl PlanStep {
    /// Symbol of the component this step adds.
    pub fn symbol(&self) -> &str {
        match self {
            Self::Component(c) => &c.symbol,
            Self::Description { description, .. } => &description.component,
        }
    }
}

/// Recorded pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelinePlan {
    parameters: ParameterList,
    reader: Option<PlannedComponent>,
    steps: Vec<PlanStep>,
    last_steps: Vec<PlanStep>,
    collect_cuis: bool,
    collect_entities: bool,
    xmi_output: Option<String>,
}

impl PipelinePlan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Global parameters, in first-set order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Looks up a global parameter.
    pub fn parameter(&self, key: &str) -> Option<&ParameterValue> {
        self.parameters
            .iter()
            .find(|p| p.key == key)
            .map(|p| &p.value)
    }

    /// The collection reader, if one was set.
    pub const fn reader(&self) -> Option<&PlannedComponent> {
        self.reader.as_ref()
    }

    /// Every step in execution order: ordinary steps, then `addLast` steps,
    /// then the XMI writer.
    pub fn steps(&self) -> Vec<PlanStep> {
        let mut steps: Vec<PlanStep> = self
            .steps
            .iter()
            .chain(&self.last_steps)
            .cloned()
            .collect();
        if let Some(dir) = &self.xmi_output {
            steps.push(PlanStep::Component(PlannedComponent::new(
                XMI_WRITER_SYMBOL,
                ComponentKind::Consumer,
                vec![Parameter::new(
                    OUTPUT_DIRECTORY_PARAM,
                    ParameterValue::String(dir.clone()),
                )],
            )));
        }
        steps
    }

    /// Whether CUI collection is enabled.
    pub const fn collects_cuis(&self) -> bool {
        self.collect_cuis
    }

    /// Whether entity collection is enabled.
    pub const fn collects_entities(&self) -> bool {
        self.collect_entities
    }

    /// Directory XMI files are written to, if enabled.
    pub fn xmi_output(&self) -> Option<&str> {
        self.xmi_output.as_deref()
    }

    /// Renders the plan as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn put(&mut self, parameter: Parameter, overwrite: bool) {
        match self.parameters.iter_mut().find(|p| p.key == parameter.key) {
            Some(existing) if overwrite || existing.value.is_empty_string() => {
                existing.value = parameter.value;
            }
            Some(existing) => {
                tracing::trace!(key = %existing.key, "keeping existing parameter");
            }
            None => self.parameters.push(parameter),
        }
    }

    fn configured_directory(&self, key: &str, directive: &str) -> Result<String> {
        match self.parameter(key) {
            Some(value) if !value.is_empty_string() => Ok(value
                .as_str()
                .map_or_else(|| value.to_string(), str::to_string)),
            _ => Err(PiperError::builder(format!(
                "{directive} needs a directory argument or a {key} parameter"
            ))),
        }
    }
}

impl PipelineBuilder for PipelinePlan {
    fn set_parameters(&mut self, parameters: ParameterList) -> Result<()> {
        for parameter in parameters {
            self.put(parameter, true);
        }
        Ok(())
    }

    fn set_parameters_if_absent(&mut self, parameters: ParameterList) -> Result<()> {
        for parameter in parameters {
            self.put(parameter, false);
        }
        Ok(())
    }

    fn set_reader(&mut self, reader: &ComponentSymbol, parameters: ParameterList) -> Result<()> {
        if let Some(old) = &self.reader {
            tracing::debug!(old = %old.symbol, new = reader.name(), "replacing reader");
        }
        self.reader = Some(PlannedComponent::from_symbol(
            reader,
            &ViewSet::new(),
            parameters,
        ));
        Ok(())
    }

    fn set_read_files(&mut self, directory: Option<&str>) -> Result<()> {
        let directory = match directory {
            Some(dir) => dir.to_string(),
            None => self.configured_directory(INPUT_DIRECTORY_PARAM, "readFiles")?,
        };
        self.reader = Some(PlannedComponent::new(
            FILES_READER_SYMBOL,
            ComponentKind::Reader,
            vec![Parameter::new(
                INPUT_DIRECTORY_PARAM,
                ParameterValue::String(directory),
            )],
        ));
        Ok(())
    }

    fn add_component(
        &mut self,
        component: &ComponentSymbol,
        views: &ViewSet,
        parameters: ParameterList,
    ) -> Result<()> {
        self.steps.push(PlanStep::Component(PlannedComponent::from_symbol(
            component, views, parameters,
        )));
        Ok(())
    }

    fn add_logged_component(
        &mut self,
        component: &ComponentSymbol,
        views: &ViewSet,
        parameters: ParameterList,
    ) -> Result<()> {
        let mut planned = PlannedComponent::from_symbol(component, views, parameters);
        planned.logged = true;
        self.steps.push(PlanStep::Component(planned));
        Ok(())
    }

    fn add_last_component(
        &mut self,
        component: &ComponentSymbol,
        views: &ViewSet,
        parameters: ParameterList,
    ) -> Result<()> {
        self.last_steps
            .push(PlanStep::Component(PlannedComponent::from_symbol(
                component, views, parameters,
            )));
        Ok(())
    }

    fn add_component_description(
        &mut self,
        description: Description,
        views: &ViewSet,
    ) -> Result<()> {
        self.steps.push(PlanStep::Description {
            description,
            views: views.clone(),
        });
        Ok(())
    }

    fn enable_cui_collection(&mut self) -> Result<()> {
        self.collect_cuis = true;
        Ok(())
    }

    fn enable_entity_collection(&mut self) -> Result<()> {
        self.collect_entities = true;
        Ok(())
    }

    fn set_xmi_output(&mut self, directory: Option<&str>) -> Result<()> {
        let directory = match directory {
            Some(dir) => dir.to_string(),
            None => self.configured_directory(OUTPUT_DIRECTORY_PARAM, "writeXmis")?,
        };
        self.xmi_output = Some(directory);
        Ok(())
    }
}

fn write_parameters(f: &mut fmt::Formatter<'_>, parameters: &[Parameter]) -> fmt::Result {
    if parameters.is_empty() {
        return Ok(());
    }
    let joined: Vec<String> = parameters.iter().map(ToString::to_string).collect();
    write!(f, " ({})", joined.join(" "))
}

fn write_views(f: &mut fmt::Formatter<'_>, views: &ViewSet) -> fmt::Result {
    if views.is_empty() {
        return Ok(());
    }
    let joined: Vec<&str> = views.iter().map(String::as_str).collect();
    write!(f, " [views: {}]", joined.join(","))
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component(c) => {
                write!(f, "{}", c.symbol)?;
                if c.logged {
                    f.write_str(" <logged>")?;
                }
                write_views(f, &c.views)?;
                write_parameters(f, &c.parameters)
            }
            Self::Description { description, views } => {
                write!(f, "{} <description>", description.component)?;
                write_views(f, views)?;
                write_parameters(f, &description.parameters)
            }
        }
    }
}

impl fmt::Display for PipelinePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reader {
            Some(reader) => {
                write!(f, "Reader: {}", reader.symbol)?;
                write_parameters(f, &reader.parameters)?;
                writeln!(f)?;
            }
            None => writeln!(f, "Reader: <none>")?,
        }
        if !self.parameters.is_empty() {
            writeln!(f, "Parameters:")?;
            for parameter in &self.parameters {
                writeln!(f, "  {parameter}")?;
            }
        }
        writeln!(f, "Pipeline:")?;
        for (i, step) in self.steps().iter().enumerate() {
            writeln!(f, "  {}. {step}", i + 1)?;
        }
        if self.collect_cuis {
            writeln!(f, "Collect CUIs: yes")?;
        }
        if self.collect_entities {
            writeln!(f, "Collect entities: yes")?;
        }
        Ok(())
    }
}
