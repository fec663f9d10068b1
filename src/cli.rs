use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Generate CSV metadata rows from files and merge external metadata",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate one metadata row per file, optionally merging a metadata CSV
    Generate(GenerateArgs),
    /// Merge a metadata CSV into previously generated rows
    Merge(MergeArgs),
    /// Preview the populated columns of a generated CSV
    Preview(PreviewArgs),
    /// List the fields of a headings file and the roles they play
    Headings(HeadingsArgs),
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Single-row CSV whose values are the output field names
    #[arg(short = 's', long = "schema")]
    pub schema: Option<PathBuf>,
    /// YAML profile overriding field roles and match columns
    #[arg(short = 'p', long = "profile")]
    pub profile: Option<PathBuf>,
    /// CSV delimiter character for inputs (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,
    /// Files to generate rows for
    pub paths: Vec<PathBuf>,
    /// Text file listing one path per line ('-' reads stdin)
    #[arg(long = "files-from")]
    pub files_from: Option<PathBuf>,
    /// Directory whose files are added (non-recursive)
    #[arg(long = "dir")]
    pub dir: Option<PathBuf>,
    /// Restrict --dir to these extensions
    #[arg(long = "extension", value_delimiter = ',', action = clap::ArgAction::Append)]
    pub extensions: Vec<String>,
    /// Metadata CSV merged into the generated rows
    #[arg(long = "metadata")]
    pub metadata: Option<PathBuf>,
    /// Output CSV file or directory (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Delimiter to use for output
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Print a preview table of the populated columns
    #[arg(long = "preview")]
    pub preview: bool,
}

#[derive(Debug, Args)]
pub struct MergeArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,
    /// Previously generated rows
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Metadata CSV to merge
    #[arg(long = "metadata")]
    pub metadata: PathBuf,
    /// Output CSV file or directory (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Delimiter to use for output
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Write the merge summary as JSON to this file
    #[arg(long = "report")]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// CSV file to preview
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display (0 = all)
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Truncate cells longer than this many characters (0 = never)
    #[arg(long = "max-width", default_value_t = 40)]
    pub max_width: usize,
    /// CSV delimiter character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding for input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct HeadingsArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
