use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use billscan::ExtractionEngine;

/// Extract structured invoice fields from OCR text and print them as JSON.
#[derive(Parser, Debug)]
#[command(name = "billscan", version, about)]
struct Args {
    /// Path to a file holding OCR text. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let text = read_input(args.input.as_deref())?;
    info!("read {} bytes of OCR text", text.len());

    let record = ExtractionEngine::new().extract(&text);
    let json = if args.pretty {
        serde_json::to_string_pretty(&record)?
    } else {
        serde_json::to_string(&record)?
    };
    println!("{}", json);
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read OCR text from {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read OCR text from stdin")?;
            Ok(buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn input_files_are_read_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Total: 99.00\n").unwrap();

        let text = read_input(Some(file.path())).unwrap();
        assert_eq!(text, "Total: 99.00\n");
    }

    #[test]
    fn missing_input_files_carry_the_path_in_the_error() {
        let err = read_input(Some(Path::new("/definitely/not/here.txt"))).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }
}
