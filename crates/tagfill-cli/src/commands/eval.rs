//! Implementation of the `tagfill eval` command.

use std::fs::read_to_string;
use std::path::PathBuf;

use serde::Serialize;
use tagfill::{
    Engine, EngineConfig, ProviderKey, ResolutionContext, Syntax, UnknownFallback, Value,
};

/// Arguments for the eval command.
#[derive(Debug, clap::Args)]
pub struct EvalArgs {
    /// Template string to resolve
    #[arg(long, required = true)]
    pub template: String,

    /// JSON file of placeholder values, e.g. {"player_name": "Ash"}
    #[arg(long)]
    pub values: Option<PathBuf>,

    /// Extra placeholder values in key=value form (repeatable)
    #[arg(short = 'p', long = "provide", value_parser = parse_key_val)]
    pub provide: Vec<(String, String)>,

    /// Opening delimiter
    #[arg(long, default_value = "%")]
    pub open: String,

    /// Closing delimiter
    #[arg(long, default_value = "%")]
    pub close: String,

    /// Token body separator
    #[arg(long, default_value_t = '_')]
    pub separator: char,

    /// Text for unknown tokens (default: the token rendered verbatim)
    #[arg(long)]
    pub fallback_unknown: Option<String>,

    /// Text for absent values
    #[arg(long, default_value = "")]
    pub fallback_absent: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for eval results.
#[derive(Serialize)]
pub struct EvalResult {
    pub result: String,
}

/// Parse a key=value parameter string.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid value format '{}': expected key=value", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Run the eval command.
pub fn run_eval(args: EvalArgs) -> miette::Result<i32> {
    let syntax = Syntax::new(args.open.clone(), args.close.clone(), args.separator)
        .map_err(|e| miette::miette!("Invalid delimiter syntax: {}", e))?;

    let fallback_unknown = match &args.fallback_unknown {
        Some(text) => UnknownFallback::Text(text.clone()),
        None => UnknownFallback::Verbatim,
    };
    let config = EngineConfig::builder()
        .syntax(syntax)
        .fallback_unknown(fallback_unknown)
        .fallback_absent(args.fallback_absent.clone())
        .build();
    let engine = Engine::new(config);

    // Values file first, then -p pairs (later registrations win).
    if let Some(path) = &args.values {
        let content = read_to_string(path)
            .map_err(|e| miette::miette!("Cannot read values file {}: {}", path.display(), e))?;
        let parsed: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| miette::miette!("Invalid JSON in {}: {}", path.display(), e))?;
        let object = parsed
            .as_object()
            .ok_or_else(|| miette::miette!("{}: expected a JSON object", path.display()))?;
        for (name, value) in object {
            let key = parse_provider_key(name, args.separator)?;
            engine.registry().register_value(key, json_to_value(name, value)?);
        }
    }

    for (name, raw) in &args.provide {
        let key = parse_provider_key(name, args.separator)?;
        // Try i64 first, fall back to String
        let value = match raw.parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::from(raw.clone()),
        };
        engine.registry().register_value(key, value);
    }

    let ctx = ResolutionContext::detached();
    let result = engine.resolve(&args.template, &ctx);

    if args.json {
        let output = EvalResult { result };
        println!(
            "{}",
            serde_json::to_string_pretty(&output)
                .map_err(|e| miette::miette!("JSON serialization failed: {}", e))?
        );
    } else {
        println!("{}", result);
    }
    Ok(exitcode::OK)
}

/// Parse a values key in token-body form (`player_name`, `online`).
pub(crate) fn parse_provider_key(name: &str, separator: char) -> miette::Result<ProviderKey> {
    ProviderKey::parse(name, separator).ok_or_else(|| {
        miette::miette!(
            "invalid key '{}': expected identifier or namespace{}identifier",
            name,
            separator
        )
    })
}

/// Convert a JSON scalar into a placeholder value.
pub(crate) fn json_to_value(name: &str, value: &serde_json::Value) -> miette::Result<Value> {
    match value {
        serde_json::Value::String(s) => Ok(Value::from(s.clone())),
        serde_json::Value::Bool(b) => Ok(Value::from(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::from(f))
            } else {
                Err(miette::miette!("value for '{}' is out of range", name))
            }
        }
        _ => Err(miette::miette!(
            "value for '{}' must be a string, number, or boolean",
            name
        )),
    }
}
