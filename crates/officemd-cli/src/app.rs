//! CLI Application logic
//!
//! Parses the command line, merges it over an optional TOML config file
//! and prints the extracted Markdown to stdout.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use officemd::{parse_office, Config};

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "officemd")]
#[command(author, version, about = "Extract Markdown from office documents and PDF", long_about = None)]
pub struct Args {
    /// Document to extract (docx, pptx, xlsx, odt, odp, ods, pdf)
    pub file: PathBuf,

    /// Drop speaker notes
    #[arg(
        long = "ignoreNotes",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub ignore_notes: Option<bool>,

    /// Collect speaker notes in a trailing section
    #[arg(
        long = "putNotesAtLast",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub put_notes_at_last: Option<bool>,

    /// Block separator; \n, \r and \t escapes are decoded
    #[arg(long = "newlineDelimiter", value_name = "STR", allow_hyphen_values = true)]
    pub newline_delimiter: Option<String>,

    /// Log extraction failures to stderr
    #[arg(
        long = "outputErrorToConsole",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub output_error_to_console: Option<bool>,

    /// TOML configuration file; command-line options take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Effective configuration: defaults, then the config file, then flags
    pub fn to_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };

        if let Some(ignore_notes) = self.ignore_notes {
            config.ignore_notes = ignore_notes;
        }
        if let Some(put_notes_at_last) = self.put_notes_at_last {
            config.put_notes_at_last = put_notes_at_last;
        }
        if let Some(delimiter) = &self.newline_delimiter {
            config.newline_delimiter = decode_escapes(delimiter);
        }
        if let Some(output_error_to_console) = self.output_error_to_console {
            config.output_error_to_console = output_error_to_console;
        }
        Ok(config.normalized())
    }
}

fn load_config(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    Config::from_toml_str(&text)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Decode `\n`, `\r`, `\t` and `\\` escapes; anything else is kept as written
pub fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Extract one document to Markdown
pub fn convert_command(args: &Args) -> Result<String> {
    let config = args.to_config()?;
    debug!(file = %args.file.display(), ?config, "converting");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime
        .block_on(parse_office(args.file.as_path(), config))
        .with_context(|| format!("Failed to extract: {}", args.file.display()))
}

/// Filter for the given `RUST_LOG` value; `warn` when unset or invalid
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

/// Install the stderr logger; `RUST_LOG` replaces the default `warn` level
pub fn init_logging() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

/// Main entry point for the CLI
pub fn run_cli() -> Result<()> {
    let args = Args::parse();
    init_logging();
    debug!("officemd v{}", officemd_core::VERSION);

    let markdown = convert_command(&args)?;
    println!("{markdown}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv.iter().copied()).unwrap()
    }

    #[test]
    fn test_decode_escapes() {
        assert_eq!(decode_escapes(r"\r\n"), "\r\n");
        assert_eq!(decode_escapes(r"a\tb"), "a\tb");
        assert_eq!(decode_escapes(r"\\n"), "\\n");
        assert_eq!(decode_escapes(r"\x"), "\\x");
        assert_eq!(decode_escapes("end\\"), "end\\");
        assert_eq!(decode_escapes("plain"), "plain");
    }

    #[test]
    fn test_flags_in_any_order() {
        let args = parse(&[
            "officemd",
            "--putNotesAtLast=true",
            "deck.pptx",
            "--ignoreNotes=false",
            r"--newlineDelimiter=\r\n",
        ]);
        assert_eq!(args.file, PathBuf::from("deck.pptx"));

        let config = args.to_config().unwrap();
        assert!(config.put_notes_at_last);
        assert!(!config.ignore_notes);
        assert_eq!(config.newline_delimiter, "\r\n");
        assert!(!config.output_error_to_console);
    }

    #[test]
    fn test_bare_flag_means_true() {
        let config = parse(&["officemd", "--ignoreNotes", "a.odp"])
            .to_config()
            .unwrap();
        assert!(config.ignore_notes);
    }

    #[test]
    fn test_missing_file_is_usage_error() {
        let err = Args::try_parse_from(["officemd", "--ignoreNotes=true"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_invalid_bool_rejected() {
        assert!(Args::try_parse_from(["officemd", "a.docx", "--ignoreNotes=maybe"]).is_err());
    }

    #[test]
    fn test_log_filter_defaults_to_warn() {
        use tracing_subscriber::filter::LevelFilter;

        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(
            log_filter(Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            log_filter(Some("officemd=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn test_empty_delimiter_normalized() {
        let config = parse(&["officemd", "a.docx", "--newlineDelimiter="])
            .to_config()
            .unwrap();
        assert_eq!(config.newline_delimiter, "\n");
    }
}
