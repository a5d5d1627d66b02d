//! Formatted output helpers for CLI commands.

use std::fmt::Write as _;

use piper_pipeline::builder::PipelinePlan;
use piper_pipeline::include::IncludeGraph;

const RULE_WIDTH: usize = 35;

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "\u{2550}".repeat(RULE_WIDTH));
}

/// Renders a plan under a heading naming its piper file.
#[must_use]
pub fn render_plan(file: &str, plan: &PipelinePlan) -> String {
    let mut out = String::new();
    heading(&mut out, &format!("Pipeline Plan for: {file}"));
    let _ = write!(out, "{plan}");
    let steps = plan.steps().len();
    let _ = writeln!(out);
    let _ = writeln!(out, "  {steps} component(s) in pipeline.");
    out
}

/// Renders the include tree, one file per line.
#[must_use]
pub fn render_includes(graph: &IncludeGraph) -> String {
    let mut out = String::new();
    heading(&mut out, "Piper files");
    for line in graph.tree_lines() {
        let _ = writeln!(out, "  {line}");
    }
    out
}

#[cfg(test)]
mod tests {
    use piper_common::types::{Parameter, ParameterValue};
    use piper_pipeline::builder::PipelineBuilder;

    use super::*;

    #[test]
    fn plan_output_counts_components() {
        let mut plan = PipelinePlan::new();
        plan.set_xmi_output(Some("/out")).expect("xmi");
        plan.set_parameters(vec![Parameter::new("Threads", ParameterValue::Integer(2))])
            .expect("set");
        let text = render_plan("Default.piper", &plan);
        assert!(text.starts_with("Pipeline Plan for: Default.piper\n"), "got: {text}");
        assert!(text.contains("Threads=2"), "got: {text}");
        assert!(text.contains("1 component(s) in pipeline."), "got: {text}");
    }

    #[test]
    fn include_output_is_indented() {
        let mut graph = IncludeGraph::new();
        graph.record_root("Main.piper");
        graph.record_include("Main.piper", "Sub.piper");
        let text = render_includes(&graph);
        assert!(text.contains("\n  Main.piper\n    Sub.piper\n"), "got: {text}");
    }
}
