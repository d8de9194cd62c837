use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tagnorm::config::EngineConfig;
use tagnorm::tracing_setup::{self, Verbosity};
use tagnorm::{
    ExtractError, LabelInput, LabelOccurrence, Metadata, TagEngine, TagEngineBuilder, TagVariant,
    Tokenizer,
};

/// tagnorm - turn noisy labels into a canonical tag vocabulary
#[derive(Parser)]
#[command(name = "tagnorm")]
#[command(about = "Normalize and group noisy labels into canonical tags")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored log output
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Print the tokens of a string
    Tokenize(TokenizeCommand),
    /// Derive a title and tags for one entity
    Process(ProcessCommand),
    /// Group label occurrences into tag variants
    Group(GroupCommand),
    /// Search a tag vocabulary
    Search(SearchCommand),
}

/// Print the tokens of a string
#[derive(Parser)]
struct TokenizeCommand {
    /// Text to tokenize
    #[arg(value_name = "TEXT")]
    text: String,
}

/// Derive a title and tags for one entity
#[derive(Parser)]
struct ProcessCommand {
    /// Filename of the entity
    #[arg(value_name = "FILENAME")]
    filename: String,

    /// Folder path the entity lives in
    #[arg(long, value_name = "PATH")]
    folder: Option<String>,

    /// Folder label chosen by the user
    #[arg(long, value_name = "LABEL")]
    user_folder: Option<String>,

    /// Entity identifier recorded as provenance
    #[arg(long, value_name = "ID")]
    entity: Option<String>,

    /// JSON file with an array of metadata records
    #[arg(long, value_name = "FILE")]
    metadata: Option<PathBuf>,
}

/// Group label occurrences into tag variants
#[derive(Parser)]
struct GroupCommand {
    /// JSON file with an array of occurrences (stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,
}

/// Search a tag vocabulary
#[derive(Parser)]
struct SearchCommand {
    /// Query text
    #[arg(value_name = "QUERY")]
    query: String,

    /// JSON file with an array of tag variants
    #[arg(long, value_name = "FILE")]
    variants: PathBuf,
}

fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    tracing_setup::init_subscriber(Verbosity::from_flags(cli.verbose, cli.quiet), cli.no_color);

    if let Err(e) = run(&cli) {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Commands::Tokenize(cmd) => execute_tokenize(&cmd.text, &mut stdout),
        Commands::Process(cmd) => execute_process(cmd, &load_engine(cli)?, &mut stdout),
        Commands::Group(cmd) => {
            let occurrences: Vec<LabelOccurrence> = read_json(cmd.input.as_deref())?;
            execute_group(&occurrences, &load_engine(cli)?, &mut stdout)
        }
        Commands::Search(cmd) => {
            let variants: Vec<TagVariant> = read_json(Some(&cmd.variants))?;
            execute_search(&cmd.query, variants, &load_engine(cli)?, &mut stdout)
        }
    }
}

/// Builds the engine from the resolved config file.
fn load_engine(cli: &Cli) -> Result<TagEngine> {
    let config = EngineConfig::resolve(cli.config.as_deref())?;
    Ok(TagEngineBuilder::from_config(&config).build())
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are rejected input values, unreadable input files and
/// malformed JSON.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause.is::<ExtractError>()
            || cause.is::<serde_json::Error>()
            || cause
                .downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
    })
}

fn execute_tokenize(text: &str, out: &mut impl Write) -> Result<()> {
    for token in Tokenizer::tokenize(text) {
        writeln!(out, "{token}")?;
    }
    Ok(())
}

fn execute_process(cmd: &ProcessCommand, engine: &TagEngine, out: &mut impl Write) -> Result<()> {
    let mut input = LabelInput::new(&cmd.filename);
    input.folder_name = cmd.folder.clone();
    input.user_folder_name = cmd.user_folder.clone();
    input.entity_id = cmd.entity.as_deref().map(Into::into);
    if let Some(path) = &cmd.metadata {
        input.metadata = read_json::<Vec<Metadata>>(Some(path))?;
    }

    let processed = engine
        .process_labels(&input)
        .context("Failed to process labels")?;
    serde_json::to_writer_pretty(&mut *out, &processed)?;
    writeln!(out)?;
    Ok(())
}

fn execute_group(
    occurrences: &[LabelOccurrence],
    engine: &TagEngine,
    out: &mut impl Write,
) -> Result<()> {
    let variants = engine.group(occurrences);
    serde_json::to_writer_pretty(&mut *out, &variants)?;
    writeln!(out)?;
    Ok(())
}

fn execute_search(
    query: &str,
    variants: Vec<TagVariant>,
    engine: &TagEngine,
    out: &mut impl Write,
) -> Result<()> {
    let index = engine.build_index(variants);
    let results = index.search(query);
    if results.is_empty() {
        writeln!(out, "No tags match \"{query}\"")?;
        return Ok(());
    }
    for variant in results {
        writeln!(
            out,
            "{} ({} uses, {:.0}% confidence)",
            variant.canonical(),
            variant.count(),
            variant.confidence() * 100.0
        )?;
    }
    Ok(())
}

/// Reads JSON from `path`, or from stdin when `path` is `None`.
fn read_json<T: DeserializeOwned>(path: Option<&Path>) -> Result<T> {
    let (content, source) = match path {
        Some(path) => (
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            path.display().to_string(),
        ),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            (buffer, "stdin".to_string())
        }
    };
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON from {source}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagnorm::SourceKind;
    use time::OffsetDateTime;

    fn output(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).expect("output should be utf-8")
    }

    #[test]
    fn tokenize_prints_one_token_per_line() {
        let mut out = Vec::new();
        execute_tokenize("Forced_Feminization-Tutorial_2024.jpg", &mut out).unwrap();
        assert_eq!(output(out), "forced\nfeminization\ntutorial\n");
    }

    #[test]
    fn process_prints_json() {
        let cmd = ProcessCommand {
            filename: "Trip Report ,, beach ,, sunset ,, family.jpg".to_string(),
            folder: None,
            user_folder: None,
            entity: Some("img-1".to_string()),
            metadata: None,
        };
        let mut out = Vec::new();
        execute_process(&cmd, &TagEngine::default(), &mut out).unwrap();

        let json: serde_json::Value = serde_json::from_str(&output(out)).unwrap();
        assert_eq!(json["title"], "Trip Report");
        assert_eq!(json["raw_occurrences"].as_array().unwrap().len(), 3);
        assert_eq!(json["raw_occurrences"][0]["entity_id"], "img-1");
    }

    #[test]
    fn group_prints_variants() {
        let now = OffsetDateTime::now_utc();
        let occurrences = vec![
            LabelOccurrence::new(SourceKind::Filename, "latex", None, now),
            LabelOccurrence::new(SourceKind::Filename, "latx", None, now),
        ];
        let mut out = Vec::new();
        execute_group(&occurrences, &TagEngine::default(), &mut out).unwrap();

        let variants: Vec<TagVariant> = serde_json::from_str(&output(out)).unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].canonical(), "latex");
    }

    #[test]
    fn search_reports_no_matches() {
        let mut out = Vec::new();
        execute_search("volcano", Vec::new(), &TagEngine::default(), &mut out).unwrap();
        assert_eq!(output(out), "No tags match \"volcano\"\n");
    }

    #[test]
    fn oversized_values_are_user_errors() {
        let engine = TagEngineBuilder::new().max_value_len(4).build();
        let cmd = ProcessCommand {
            filename: "much too long.jpg".to_string(),
            folder: None,
            user_folder: None,
            entity: None,
            metadata: None,
        };
        let err = execute_process(&cmd, &engine, &mut Vec::new()).unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn missing_input_file_is_a_user_error() {
        let err = read_json::<Vec<TagVariant>>(Some(Path::new("/nonexistent/variants.json")))
            .unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn internal_errors_are_not_user_errors() {
        let err = anyhow::anyhow!("index corrupted");
        assert!(!is_user_error(&err));
    }
}
