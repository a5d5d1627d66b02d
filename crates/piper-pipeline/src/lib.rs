//! # piper-pipeline
//!
//! Interprets piper files into a pipeline.
//!
//! Provides:
//! - [`PiperInterpreter`](interpreter::PiperInterpreter): Line-by-line driver with recursive `load`.
//! - [`ComponentRegistry`](registry::ComponentRegistry): Explicit mapping of component symbols.
//! - [`ComponentResolver`](resolver::ComponentResolver): Ordered namespace search for bare names.
//! - [`ResourceLocator`](locator::ResourceLocator): Finding piper files on disk or in memory.
//! - [`PipelineBuilder`](builder::PipelineBuilder): The sink for interpreted directives, with
//!   [`PipelinePlan`](builder::PipelinePlan) as the recording implementation.
//!
//! # Example
//!
//! ```rust,no_run
//! use piper_common::types::ComponentKind;
//! use piper_pipeline::interpreter::PiperInterpreter;
//! use piper_pipeline::locator::FileLocator;
//! use piper_pipeline::registry::ComponentRegistry;
//!
//! let registry = ComponentRegistry::new()
//!     .with_component("org.apache.ctakes.core.ae.SentenceDetector", ComponentKind::Annotator);
//! let mut interpreter = PiperInterpreter::new(registry, FileLocator::from_env(&[]));
//! interpreter.load_file("Default.piper")?;
//! # Ok::<(), piper_common::error::PiperError>(())
//! ```

pub mod builder;
pub mod catalog;
pub mod include;
pub mod interpreter;
pub mod locator;
pub mod registry;
pub mod resolver;
