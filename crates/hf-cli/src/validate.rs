//! # Validate Subcommand
//!
//! ```bash
//! hf validate --schema character party/*.json
//! hf validate --schema homebrew --format json storm-blade.yaml
//! ```
//!
//! Exit code 0 when every document is valid, 1 otherwise. A file that
//! cannot be read or parsed aborts the command with exit code 2.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use hf_schema::{load_document, validation_summary, ValidationResult, ValidationSummary, Validator};

use crate::config::FoundryConfig;
use crate::{EXIT_INVALID, EXIT_OK};

/// Output format for validation reports.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One line per document plus indented diagnostics.
    #[default]
    Text,
    /// A single JSON object with per-file results and the summary.
    Json,
}

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Registered schema name (e.g. character, ruleset, homebrew).
    #[arg(long, short)]
    pub schema: String,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// JSON or YAML documents to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Execute the validate subcommand.
pub fn run_validate(
    args: &ValidateArgs,
    validator: &Validator,
    config: &FoundryConfig,
    out: &mut dyn Write,
) -> Result<u8> {
    let documents = args
        .files
        .iter()
        .map(|path| load_document(path).with_context(|| format!("reading {}", path.display())))
        .collect::<Result<Vec<Value>>>()?;

    let results = validator.validate_multiple(&documents, &args.schema);
    let summary = validation_summary(&results);

    match args.format {
        OutputFormat::Text => render_text(out, &args.files, &results, &summary)?,
        OutputFormat::Json => render_json(out, &args.files, &results, &summary)?,
    }

    Ok(exit_code(&summary, config.fail_on_warnings))
}

/// 1 when any document is invalid, or when warnings are fatal and present.
pub fn exit_code(summary: &ValidationSummary, fail_on_warnings: bool) -> u8 {
    if summary.invalid > 0 || (fail_on_warnings && summary.total_warnings > 0) {
        EXIT_INVALID
    } else {
        EXIT_OK
    }
}

fn render_text(
    out: &mut dyn Write,
    files: &[PathBuf],
    results: &[ValidationResult],
    summary: &ValidationSummary,
) -> Result<()> {
    for (path, result) in files.iter().zip(results) {
        let status = if result.is_valid() { "OK  " } else { "FAIL" };
        writeln!(out, "{status} {}", path.display())?;
        for error in result.errors() {
            writeln!(out, "  {error}")?;
        }
        for warning in result.warnings() {
            writeln!(out, "  warning: {warning}")?;
        }
    }
    writeln!(out, "{summary}")?;
    Ok(())
}

fn render_json(
    out: &mut dyn Write,
    files: &[PathBuf],
    results: &[ValidationResult],
    summary: &ValidationSummary,
) -> Result<()> {
    let entries = files
        .iter()
        .zip(results)
        .map(|(path, result)| {
            let mut entry = serde_json::to_value(result)?;
            if let Value::Object(map) = &mut entry {
                map.insert("file".to_string(), json!(path.display().to_string()));
            }
            Ok(entry)
        })
        .collect::<Result<Vec<Value>, serde_json::Error>>()?;
    let report = json!({ "results": entries, "summary": summary });
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hf_schema::SchemaRegistry;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn run(args: &ValidateArgs, config: &FoundryConfig) -> (u8, String) {
        let validator = Validator::new(SchemaRegistry::with_builtins());
        let mut out = Vec::new();
        let code = run_validate(args, &validator, config, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    const VALID_RULESET: &str = r#"{"id": "r1", "name": "Core", "version": "1.0.0"}"#;

    #[test]
    fn text_report_lists_each_file() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "good.json", VALID_RULESET);
        let bad = write(&dir, "bad.yaml", "id: r2\nname: Broken\nversion: one\n");
        let args = ValidateArgs {
            schema: "ruleset".into(),
            format: OutputFormat::Text,
            files: vec![good, bad],
        };
        let (code, text) = run(&args, &FoundryConfig::default());
        assert_eq!(code, EXIT_INVALID);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("OK   ") && lines[0].ends_with("good.json"));
        assert!(lines[1].starts_with("FAIL ") && lines[1].ends_with("bad.yaml"));
        assert!(lines[2].starts_with("  version: String does not match pattern"));
        assert!(lines[2].ends_with("[PATTERN_MISMATCH]"));
        assert_eq!(lines[3], "1/2 valid (1 invalid), 1 error(s), 0 warning(s)");
    }

    #[test]
    fn json_report_has_results_and_summary() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "good.json", VALID_RULESET);
        let args = ValidateArgs {
            schema: "ruleset".into(),
            format: OutputFormat::Json,
            files: vec![good],
        };
        let (code, text) = run(&args, &FoundryConfig::default());
        assert_eq!(code, EXIT_OK);
        let report: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(report["results"][0]["isValid"], json!(true));
        assert!(report["results"][0]["file"].as_str().unwrap().ends_with("good.json"));
        assert_eq!(report["summary"]["total"], json!(1));
    }

    #[test]
    fn warnings_fail_only_when_configured() {
        let dir = TempDir::new().unwrap();
        let doc = write(
            &dir,
            "hb.json",
            r#"{"id": "h", "name": "Blade", "type": "item", "version": "1.0.0", "rulesetId": "r1", "content": {"name": "Blade"}}"#,
        );
        let args = ValidateArgs {
            schema: "homebrew".into(),
            format: OutputFormat::Text,
            files: vec![doc],
        };
        let (code, text) = run(&args, &FoundryConfig::default());
        assert_eq!(code, EXIT_OK);
        assert!(text.contains("  warning: content.description: Recommended property 'description' is missing"));

        let strict = FoundryConfig {
            fail_on_warnings: true,
            ..FoundryConfig::default()
        };
        assert_eq!(run(&args, &strict).0, EXIT_INVALID);
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let args = ValidateArgs {
            schema: "ruleset".into(),
            format: OutputFormat::Text,
            files: vec![PathBuf::from("/nonexistent/doc.json")],
        };
        let validator = Validator::new(SchemaRegistry::with_builtins());
        let err = run_validate(&args, &validator, &FoundryConfig::default(), &mut Vec::new())
            .unwrap_err();
        assert!(format!("{err:#}").contains("reading /nonexistent/doc.json"));
    }

    #[test]
    fn unknown_schema_fails_each_document() {
        let dir = TempDir::new().unwrap();
        let doc = write(&dir, "x.json", "{}");
        let args = ValidateArgs {
            schema: "monster".into(),
            format: OutputFormat::Text,
            files: vec![doc],
        };
        let (code, text) = run(&args, &FoundryConfig::default());
        assert_eq!(code, EXIT_INVALID);
        assert!(text.contains("(root): Schema 'monster' not found [SCHEMA_NOT_FOUND]"));
    }
}
