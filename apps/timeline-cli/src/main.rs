//! Timeline forensics command-line tool
//!
//! Reads Metro 2 fixed-width records or extracted fields, runs the timeline
//! engine, and prints JSON (or a text summary) on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use shared_types::{FieldInput, TimelineReport};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use timeline_engine::{estimate_removal, normalize, EngineConfig, EngineError, TimelineEngine};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "timeline-forensics")]
#[command(
    version,
    about = "Date normalization and timeline checks for credit report records"
)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze fixed-width Metro 2 records, one per line
    Analyze {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,

        /// Evaluation date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        now: Option<String>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Normalize free-form date strings
    Normalize {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Estimate the removal date for a date of first delinquency
    Removal {
        /// Date of first delinquency, any recognizable format
        date: String,
    },

    /// Validate a JSON object of extracted fields
    Validate {
        /// JSON file mapping field name to value or {value, confidence}
        file: PathBuf,

        /// Evaluation date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        now: Option<String>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    // stdout carries results, so every log line goes to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Analyze {
            file,
            now,
            config,
            format,
        } => {
            let now = resolve_now(now.as_deref())?;
            let engine = TimelineEngine::new(load_config(config.as_deref())?);
            let reader: Box<dyn BufRead> = match &file {
                Some(path) => Box::new(BufReader::new(
                    fs::File::open(path)
                        .with_context(|| format!("Failed to open {}", path.display()))?,
                )),
                None => Box::new(BufReader::new(io::stdin())),
            };
            analyze(&engine, reader, now, format, &mut out)?;
        }
        Commands::Normalize { text } => {
            for raw in &text {
                writeln!(out, "{}", serde_json::to_string(&normalize(raw))?)?;
            }
        }
        Commands::Removal { date } => {
            let value = normalize(&date);
            let dofd = value
                .canonical()
                .ok_or_else(|| EngineError::InvalidDate(date.clone()))?;
            let removal = serde_json::json!({
                "delinquency_date": dofd,
                "confidence": value.confidence(),
                "estimated_removal": estimate_removal(dofd),
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&removal)?)?;
        }
        Commands::Validate { file, now, config } => {
            let now = resolve_now(now.as_deref())?;
            let engine = TimelineEngine::new(load_config(config.as_deref())?);
            let content = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let fields: BTreeMap<String, FieldInput> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse fields from {}", file.display()))?;
            let verdicts = engine.validate_fields(&fields, now);
            writeln!(out, "{}", serde_json::to_string_pretty(&verdicts)?)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            Ok(EngineConfig::from_file(path)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

/// The wall clock is read here and nowhere else
fn resolve_now(arg: Option<&str>) -> Result<NaiveDate, EngineError> {
    match arg {
        Some(value) => parse_date(value),
        None => Ok(Local::now().date_naive()),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| EngineError::InvalidDate(value.to_string()))
}

fn analyze(
    engine: &TimelineEngine,
    reader: impl BufRead,
    now: NaiveDate,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<usize> {
    let mut analyzed = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", index + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let report = engine.analyze_line(&line, now);
        match format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&report)?)?,
            OutputFormat::Text => write!(out, "{}", render_text(index + 1, &report))?,
        }
        analyzed += 1;
    }

    tracing::info!("Analyzed {} record(s) as of {}", analyzed, now);
    Ok(analyzed)
}

fn render_text(line_number: usize, report: &TimelineReport) -> String {
    let mut text = format!(
        "line {}: account {} ({})\n",
        line_number,
        if report.account_number.is_empty() {
            "<blank>"
        } else {
            report.account_number.as_str()
        },
        report.layout_version
    );

    match (report.delinquency_date, report.estimated_removal) {
        (Some(dofd), Some(removal)) => {
            text.push_str(&format!("  delinquent since {}, remove by {}\n", dofd, removal));
        }
        _ => text.push_str("  no date of first delinquency\n"),
    }

    if report.violations.is_empty() {
        text.push_str("  no violations\n");
    }
    for violation in &report.violations {
        text.push_str(&format!(
            "  [{}] {} {}: {}\n",
            violation.severity.as_str(),
            violation.rule_id,
            violation.field,
            violation.message
        ));
        if let Some(citation) = report.citations.get(&violation.rule_id) {
            text.push_str(&format!("      {}\n", citation));
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Blank base segment with status and dates at their Metro 2 offsets
    fn record_line(status: &str, dofd: &str, doai: &str) -> String {
        let mut chars = vec![' '; 426];
        for (start, value) in [(123, status), (189, dofd), (181, doai)] {
            for (i, c) in value.chars().enumerate() {
                chars[start + i] = c;
            }
        }
        chars.into_iter().collect()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-06-01").unwrap(), ymd(2024, 6, 1));
        assert_eq!(parse_date(" 2024-06-01 ").unwrap(), ymd(2024, 6, 1));
        assert!(matches!(
            parse_date("06/01/2024"),
            Err(EngineError::InvalidDate(_))
        ));
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_resolve_now_prefers_argument() {
        assert_eq!(resolve_now(Some("2020-01-31")).unwrap(), ymd(2020, 1, 31));
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "timeline-forensics",
            "analyze",
            "records.txt",
            "--now",
            "2024-06-01",
            "--format",
            "text",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze {
                file, now, format, ..
            } => {
                assert_eq!(file, Some(PathBuf::from("records.txt")));
                assert_eq!(now.as_deref(), Some("2024-06-01"));
                assert_eq!(format, OutputFormat::Text);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_requires_normalize_text() {
        assert!(Cli::try_parse_from(["timeline-forensics", "normalize"]).is_err());
    }

    #[test]
    fn test_analyze_skips_blank_lines() {
        let input = format!(
            "{}\n\n{}\n",
            record_line("97", "", "05312024"),
            record_line("11", "", "05312024")
        );
        let mut out = Vec::new();
        let count = analyze(
            &TimelineEngine::default(),
            Cursor::new(input),
            ymd(2024, 6, 1),
            OutputFormat::Json,
            &mut out,
        )
        .unwrap();

        assert_eq!(count, 2);
        let output = String::from_utf8(out).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("MISSING_DOFD"));
        assert!(!lines[1].contains("MISSING_DOFD"));
    }

    #[test]
    fn test_render_text_lists_violations() {
        let report = TimelineEngine::default()
            .analyze_line(&record_line("97", "", "05312024"), ymd(2024, 6, 1));
        let text = render_text(3, &report);

        assert!(text.starts_with("line 3: account <blank>"));
        assert!(text.contains("[Critical] MISSING_DOFD"));
        assert!(text.contains("1681s-2(a)(5)"));
    }

    #[test]
    fn test_render_text_with_removal_date() {
        let report = TimelineEngine::default()
            .analyze_line(&record_line("93", "03152018", "05312024"), ymd(2024, 6, 1));
        let text = render_text(1, &report);

        assert!(text.contains("delinquent since 2018-03-15, remove by 2025-09-11"));
        assert!(text.contains("no violations"));
    }
}
