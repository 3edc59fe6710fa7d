//! Implementation of the `tagfill check` command.

use std::fs::read_to_string;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use serde::Serialize;
use tagfill::{lint_template, lint_with_registry, LintWarning, ProviderRegistry, Syntax};

use super::eval::{json_to_value, parse_provider_key};
use crate::output::LintDiagnostic;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Template files to check
    #[arg(required_unless_present = "template")]
    pub files: Vec<PathBuf>,

    /// Check an inline template instead of files
    #[arg(long)]
    pub template: Option<String>,

    /// JSON file of placeholder values; enables unknown-token checks
    #[arg(long)]
    pub values: Option<PathBuf>,

    /// Opening delimiter
    #[arg(long, default_value = "%")]
    pub open: String,

    /// Closing delimiter
    #[arg(long, default_value = "%")]
    pub close: String,

    /// Token body separator
    #[arg(long, default_value_t = '_')]
    pub separator: char,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one finding.
#[derive(Serialize)]
struct JsonWarning {
    source: String,
    offset: usize,
    length: usize,
    message: String,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> miette::Result<i32> {
    let syntax = Syntax::new(args.open.clone(), args.close.clone(), args.separator)
        .map_err(|e| miette::miette!("Invalid delimiter syntax: {}", e))?;

    // A values file stands in for the live registry: keys registered there
    // count as known, everything else is flagged.
    let registry = match &args.values {
        Some(path) => {
            let content = read_to_string(path)
                .map_err(|e| miette::miette!("Cannot read values file {}: {}", path.display(), e))?;
            let parsed: serde_json::Value = serde_json::from_str(&content)
                .map_err(|e| miette::miette!("Invalid JSON in {}: {}", path.display(), e))?;
            let object = parsed
                .as_object()
                .ok_or_else(|| miette::miette!("{}: expected a JSON object", path.display()))?;
            let registry = ProviderRegistry::new();
            for (name, value) in object {
                let key = parse_provider_key(name, args.separator)?;
                registry.register_value(key, json_to_value(name, value)?);
            }
            Some(registry)
        }
        None => None,
    };

    let mut sources: Vec<(String, String)> = Vec::new();
    if let Some(template) = &args.template {
        sources.push(("<template>".to_string(), template.clone()));
    }
    for path in &args.files {
        let content = read_to_string(path)
            .map_err(|e| miette::miette!("Cannot read {}: {}", path.display(), e))?;
        sources.push((path.display().to_string(), content));
    }

    let mut findings: Vec<(String, String, LintWarning)> = Vec::new();
    for (name, content) in &sources {
        let warnings = match &registry {
            Some(registry) => lint_with_registry(content, &syntax, registry),
            None => lint_template(content, &syntax),
        };
        for warning in warnings {
            findings.push((name.clone(), content.clone(), warning));
        }
    }

    if args.json {
        let warnings: Vec<JsonWarning> = findings
            .iter()
            .map(|(source, _, warning)| {
                let (offset, length) = warning.span();
                JsonWarning {
                    source: source.clone(),
                    offset,
                    length,
                    message: warning.to_string(),
                }
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&warnings)
                .map_err(|e| miette::miette!("JSON serialization failed: {}", e))?
        );
    } else {
        for (name, content, warning) in &findings {
            let diagnostic = LintDiagnostic::from_warning(name, content, warning);
            println!("{:?}", miette::Report::new(diagnostic));
        }
        if findings.is_empty() {
            println!("{}: no template warnings", "ok".green());
        } else {
            println!(
                "{}: {} warning(s) in {} template(s)",
                "check failed".yellow(),
                findings.len(),
                sources.len()
            );
        }
    }

    if findings.is_empty() {
        Ok(exitcode::OK)
    } else {
        Ok(exitcode::DATAERR)
    }
}
