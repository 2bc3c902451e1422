//! Scribe - annotate a C++ file from the command line.
//!
//! Usage: scribe [--config FILE] FILE...
//!
//! Each file is opened in its own tab and reported separately.

use scribe_core::annotate::Annotations;
use scribe_core::{EditorConfig, TextBuffer, Workspace};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "usage: scribe [--config FILE] FILE...";

#[derive(Debug, PartialEq, Eq)]
struct Args {
    config: Option<PathBuf>,
    files: Vec<PathBuf>,
}

fn parse_args<I>(args: I) -> Result<Args, String>
where
    I: IntoIterator<Item = String>,
{
    let mut config = None;
    let mut files = Vec::new();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args.next().ok_or("--config needs a file argument")?;
                config = Some(PathBuf::from(path));
            }
            "--help" | "-h" => return Err(USAGE.to_string()),
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(format!("unknown option '{}'\n{}", flag, USAGE));
            }
            _ => files.push(PathBuf::from(arg)),
        }
    }

    if files.is_empty() {
        return Err(USAGE.to_string());
    }
    Ok(Args { config, files })
}

/// Converts a byte offset to a 1-based "line:col" label.
fn location(buffer: &TextBuffer, byte: usize) -> String {
    let (line, col) = buffer.char_to_line_col(buffer.byte_to_char(byte));
    format!("{}:{}", line + 1, col + 1)
}

fn report(buffer: &TextBuffer, text: &str, annotations: &Annotations) -> String {
    let mut out = String::new();

    let names: Vec<&str> = annotations.variable_names.iter().map(String::as_str).collect();
    out.push_str(&format!("variables ({}): {}\n", names.len(), names.join(", ")));

    out.push_str(&format!("calls ({}):\n", annotations.calls.len()));
    for span in &annotations.calls {
        out.push_str(&format!(
            "  {:<8} {}\n",
            location(buffer, span.start),
            span.text(text)
        ));
    }

    out.push_str(&format!("errors ({}):\n", annotations.errors.len()));
    for finding in &annotations.errors {
        out.push_str(&format!(
            "  {:<8} {} {}\n",
            location(buffer, finding.start),
            finding.rule.code(),
            finding.rule.message()
        ));
    }
    out
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        }
    };

    let config = match &args.config {
        Some(path) => match EditorConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => EditorConfig::default(),
    };

    let mut workspace = Workspace::new(config);
    let mut status = ExitCode::SUCCESS;
    for file in &args.files {
        if let Err(e) = workspace.open_file(file) {
            log::error!("Failed to open file '{}': {}", file.display(), e);
            status = ExitCode::FAILURE;
        }
    }

    let tabs = workspace.tabs();
    for tab in &tabs {
        let Some(session) = workspace.session(tab.id) else {
            continue;
        };
        if tabs.len() > 1 {
            println!("== {} ==", tab.title);
        }
        let text = session.text();
        print!("{}", report(session.buffer(), &text, session.annotations()));
        log::debug!("{}: {}", tab.title, session.annotation_stats().summary());
    }

    status
}
