//! `saftpt-validate`: runs the validation engine over a JSON-serialised
//! SAF-T (PT) document tree and prints what it found.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use saftpt_core::ErrorReport;
use saftpt_documents::AuditFile;
use saftpt_observability::LogFormat;
use saftpt_validation::{ValidationConfig, validate};

#[derive(Debug, Parser)]
#[command(name = "saftpt-validate", version, about = "Validate a SAF-T (PT) document tree")]
pub struct Args {
    /// Document tree serialised as JSON.
    pub file: PathBuf,

    /// PEM public key of the producing software (SPKI or PKCS#1).
    #[arg(long, value_name = "PEM")]
    pub public_key: Option<PathBuf>,

    /// TOML file with rule-group switches.
    #[arg(long, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Skip hash-chain verification.
    #[arg(long)]
    pub no_sign: bool,

    /// Skip structural validation.
    #[arg(long)]
    pub no_schema: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    #[arg(long, value_name = "FORMAT", default_value = "json")]
    pub log_format: LogFormat,
}

/// How a run ended, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    Findings,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Clean => 0,
            Outcome::Findings => 1,
        }
    }
}

/// Exit code for errors that stop the run before any finding is produced.
pub const FATAL_EXIT_CODE: u8 = 2;

pub fn load_config(path: Option<&Path>) -> anyhow::Result<ValidationConfig> {
    let Some(path) = path else {
        return Ok(ValidationConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    ValidationConfig::from_toml_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))
}

pub fn load_audit_file(path: &Path) -> anyhow::Result<AuditFile> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Load everything, validate and write the report to `out`.
pub fn run(args: &Args, out: &mut impl std::io::Write) -> anyhow::Result<Outcome> {
    let mut config = load_config(args.config.as_deref())?;
    if args.no_sign {
        config = config.with_sign_validation(false);
    }
    if args.no_schema {
        config = config.with_schema_validate(false);
    }
    let audit = load_audit_file(&args.file)?;

    tracing::info!(file = %args.file.display(), "validating");
    let clean = validate(&audit, args.public_key.as_deref(), &config)?;

    let report = audit.error_register().report();
    let rendered = if args.json {
        serde_json::to_string_pretty(&report).context("serialising report")?
    } else {
        render(&report)
    };
    writeln!(out, "{rendered}").context("writing report")?;

    Ok(if clean { Outcome::Clean } else { Outcome::Findings })
}

/// Plain-text report, one section per non-empty category.
pub fn render(report: &ErrorReport) -> String {
    let mut out = String::new();
    let sections: [(&str, Vec<String>); 5] = [
        ("value errors", report.on_set_value.clone()),
        ("xml node errors", report.on_create_xml_node.clone()),
        ("schema errors", report.lib_xml.clone()),
        (
            "validation errors",
            report
                .validation
                .iter()
                .map(|e| format!("[{}] {}", e.code, e.message))
                .collect(),
        ),
        ("warnings", report.warnings.clone()),
    ];
    for (title, items) in sections.iter().filter(|(_, items)| !items.is_empty()) {
        let _ = writeln!(out, "{title} ({}):", items.len());
        for item in items {
            let _ = writeln!(out, "  {item}");
        }
    }
    if out.is_empty() {
        out.push_str("no findings\n");
    }
    out.trim_end().to_string()
}
