//! `cssom-dump`: parse a stylesheet and print it back.
//!
//! ```text
//! cssom-dump <file.css> [--log <path>]
//! ```
//!
//! The parsed rules are printed to stdout as CSS text, one rule per line.
//! Diagnostics go to stderr as `file:line:column: message`.

mod log_init;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cssom::StyleSheet;

use crate::log_init::init_logger;

#[derive(Parser, Debug)]
#[command(name = "cssom-dump")]
#[command(about = "Parse a stylesheet and print its rules back as CSS")]
struct Args {
    /// Stylesheet to parse
    input: PathBuf,
    /// Append parser log records to this file
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(log_file) = &args.log {
        if let Err(err) = init_logger(log_file) {
            eprintln!("cssom-dump: could not install logger: {}", err);
        }
    }

    let sheet = match StyleSheet::load(&args.input) {
        Ok(sheet) => sheet,
        Err(err) => {
            log::error!("failed to load {}: {:?}", args.input.display(), err);
            eprintln!("cssom-dump: {}: {}", args.input.display(), err);
            return ExitCode::FAILURE;
        }
    };

    for diagnostic in sheet.diagnostics().iter() {
        eprintln!("{}", diagnostic);
    }
    let text = sheet.css_text();
    if !text.is_empty() {
        println!("{}", text);
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_only() {
        let args = Args::try_parse_from(["cssom-dump", "theme.css"]).unwrap();
        assert_eq!(args.input, PathBuf::from("theme.css"));
        assert_eq!(args.log, None);
    }

    #[test]
    fn test_parse_log_option_anywhere() {
        let args = Args::try_parse_from(["cssom-dump", "--log", "out.log", "theme.css"]).unwrap();
        assert_eq!(args.input, PathBuf::from("theme.css"));
        assert_eq!(args.log, Some(PathBuf::from("out.log")));

        let args = Args::try_parse_from(["cssom-dump", "theme.css", "--log", "out.log"]).unwrap();
        assert_eq!(args.log, Some(PathBuf::from("out.log")));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Args::try_parse_from(["cssom-dump"]).is_err());
        assert!(Args::try_parse_from(["cssom-dump", "theme.css", "--log"]).is_err());
        assert!(Args::try_parse_from(["cssom-dump", "a.css", "b.css"]).is_err());
        assert!(Args::try_parse_from(["cssom-dump", "--verbose", "a.css"]).is_err());
    }

    #[test]
    fn test_usage_errors_exit_with_2() {
        let err = Args::try_parse_from(["cssom-dump"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
