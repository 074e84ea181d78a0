mod json;

use std::io::{Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::{Context, Result};

use beve_core::value::Value;

#[derive(Parser)]
#[command(name = "beve")]
#[command(about = "Encode, decode, and inspect BEVE files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a JSON document to BEVE bytes
    Encode {
        /// Input JSON file; reads stdin if omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output BEVE file; writes stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert BEVE bytes to a pretty-printed JSON document
    Decode {
        /// Input BEVE file; reads stdin if omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output JSON file; writes stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a structural summary of a BEVE file without materializing JSON
    Inspect {
        /// Input BEVE file; reads stdin if omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Encode { input, output } => encode(input.as_ref(), output.as_ref()),
        Commands::Decode { input, output } => decode(input.as_ref(), output.as_ref()),
        Commands::Inspect { input } => inspect(input.as_ref()),
    }
}

fn encode(input: Option<&PathBuf>, output: Option<&PathBuf>) -> Result<()> {
    let text = read_input_to_string(input)?;
    let json: serde_json::Value =
        serde_json::from_str(&text).wrap_err("input is not valid JSON")?;
    let value = json::json_to_value(&json).wrap_err("JSON document has no BEVE representation")?;
    let bytes = beve_core::encode(&value).wrap_err("failed to encode value")?;

    tracing::info!(bytes = bytes.len(), "encoded value");
    write_output_bytes(output, &bytes)
}

fn decode(input: Option<&PathBuf>, output: Option<&PathBuf>) -> Result<()> {
    let bytes = read_input_bytes(input)?;
    let value = beve_core::decode(&bytes).wrap_err("failed to decode BEVE buffer")?;
    let json = json::value_to_json(&value).wrap_err("decoded value has no JSON representation")?;
    let text = serde_json::to_string_pretty(&json).wrap_err("failed to render JSON")?;

    tracing::info!(bytes = bytes.len(), "decoded value");
    write_output_text(output, &text)
}

fn inspect(input: Option<&PathBuf>) -> Result<()> {
    let bytes = read_input_bytes(input)?;
    let value = beve_core::decode(&bytes).wrap_err("failed to decode BEVE buffer")?;
    println!("{} bytes, top-level: {}", bytes.len(), describe(&value));
    Ok(())
}

/// A one-line structural summary: top-level kind plus element/entry count
/// where applicable, deliberately shallow so it never chokes on content
/// (non-UTF-8 strings, oversized U64, a Variant) that the JSON bridge would.
fn describe(value: &Value) -> String {
    match value {
        Value::Null => "Null".to_string(),
        Value::Bool(_) => "Bool".to_string(),
        Value::I8(_) | Value::I16(_) | Value::I32(_) | Value::I64(_) => "signed integer".to_string(),
        Value::U8(_) | Value::U16(_) | Value::U32(_) | Value::U64(_) => "unsigned integer".to_string(),
        Value::F32(_) | Value::F64(_) => "float".to_string(),
        Value::Str(s) => format!("Str ({} bytes)", s.len()),
        Value::Array(items) => format!("Array ({} elements)", items.len()),
        Value::TypedArray(t) => format!("TypedArray ({} elements)", t.len()),
        Value::Object(obj) => format!("Object ({} entries)", obj.len()),
        Value::Matrix(m) => format!("Matrix ({}x{})", m.rows, m.cols),
        Value::Complex { .. } => "Complex".to_string(),
        Value::Variant(inner) => format!("Variant({})", describe(inner)),
    }
}

fn read_input_bytes(input: Option<&PathBuf>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match input {
        Some(path) => {
            buf = std::fs::read(path).wrap_err_with(|| format!("reading {}", path.display()))?;
        }
        None => {
            std::io::stdin()
                .read_to_end(&mut buf)
                .wrap_err("reading stdin")?;
        }
    }
    Ok(buf)
}

fn read_input_to_string(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => {
            std::fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .wrap_err("reading stdin")?;
            Ok(buf)
        }
    }
}

fn write_output_bytes(output: Option<&PathBuf>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, bytes).wrap_err_with(|| format!("writing {}", path.display()))
        }
        None => std::io::stdout()
            .write_all(bytes)
            .wrap_err("writing stdout"),
    }
}

fn write_output_text(output: Option<&PathBuf>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text).wrap_err_with(|| format!("writing {}", path.display()))
        }
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}
