pub mod cli;
pub mod error;
pub mod export;
pub mod generate;
pub mod io_utils;
pub mod merge;
pub mod metadata;
pub mod normalize;
pub mod preview;
pub mod profile;
pub mod row;
pub mod schema;
pub mod session;
pub mod table;

use std::{env, fs::File, io::Write, path::Path, sync::Arc, sync::OnceLock};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use encoding_rs::Encoding;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, SchemaArgs},
    generate::PathSources,
    metadata::MetadataTable,
    profile::Profile,
    schema::Schema,
    session::Session,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_metagen", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => handle_generate(&args),
        Commands::Merge(args) => handle_merge(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Headings(args) => handle_headings(&args.schema),
    }
}

struct Inputs {
    session: Session,
    delimiter: Option<u8>,
    encoding: &'static Encoding,
}

fn open_session(args: &SchemaArgs) -> Result<Inputs> {
    let profile = match &args.profile {
        Some(path) => Profile::load(path)?,
        None => Profile::default(),
    };
    let headings = args
        .schema
        .clone()
        .or_else(|| profile.headings.clone())
        .ok_or_else(|| {
            anyhow!("No headings file given; pass --schema or set 'headings' in the profile")
        })?;
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let delimiter = io_utils::resolve_input_delimiter(&headings, args.delimiter);
    let schema = Schema::load(&headings, delimiter, encoding)?;
    info!("Loaded {} CSV heading(s) from {:?}", schema.len(), headings);
    let session = Session::new(Arc::new(schema), &profile);
    debug!(
        "Match column priority: {:?}",
        session.match_priority().candidates()
    );
    Ok(Inputs {
        session,
        delimiter: args.delimiter,
        encoding,
    })
}

fn load_metadata(path: &Path, inputs: &Inputs) -> Result<MetadataTable> {
    let delimiter = io_utils::resolve_input_delimiter(path, inputs.delimiter);
    Ok(MetadataTable::load(path, delimiter, inputs.encoding)?)
}

fn handle_generate(args: &cli::GenerateArgs) -> Result<()> {
    let inputs = open_session(&args.schema)?;
    let paths = generate::collect_paths(&PathSources {
        paths: &args.paths,
        files_from: args.files_from.as_deref(),
        dir: args.dir.as_deref(),
        extensions: &args.extensions,
    })?;
    let session = &inputs.session;
    session.generate(&paths)?;

    if let Some(path) = &args.metadata {
        let metadata = load_metadata(path, &inputs)?;
        session
            .merge(&metadata)
            .with_context(|| format!("Merging metadata from {path:?}"))?;
    }

    if args.preview {
        let rendered = preview::render_rows(&session.rows(), 10, 40);
        if args.output.is_some() {
            print!("{rendered}");
        } else {
            eprint!("{rendered}");
        }
    }

    session.export(args.output.as_deref(), args.output_delimiter)?;
    Ok(())
}

fn handle_merge(args: &cli::MergeArgs) -> Result<()> {
    let inputs = open_session(&args.schema)?;
    let session = &inputs.session;
    let delimiter = io_utils::resolve_input_delimiter(&args.input, inputs.delimiter);
    let rows = row::load_rows(&args.input, session.schema(), delimiter, inputs.encoding)
        .with_context(|| format!("Loading generated rows from {:?}", args.input))?;
    let loaded = session.replace_rows(rows)?;
    info!("Loaded {loaded} generated row(s) from {:?}", args.input);

    let metadata = load_metadata(&args.metadata, &inputs)?;
    let summary = session
        .merge(&metadata)
        .with_context(|| format!("Merging metadata from {:?}", args.metadata))?;

    if let Some(report) = &args.report {
        let file =
            File::create(report).with_context(|| format!("Creating report file {report:?}"))?;
        serde_json::to_writer_pretty(file, &summary).context("Writing merge summary JSON")?;
        debug!("Merge summary written to {report:?}");
    }

    session.export(args.output.as_deref(), args.output_delimiter)?;
    Ok(())
}

fn handle_headings(args: &SchemaArgs) -> Result<()> {
    let inputs = open_session(args)?;
    let session = &inputs.session;
    let roles = session.roles();
    let rows = session
        .schema()
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let role = if *field == roles.filename {
                "filename"
            } else if *field == roles.title {
                "title"
            } else if *field == roles.identifier {
                "identifier"
            } else {
                ""
            };
            vec![(idx + 1).to_string(), field.clone(), role.to_string()]
        })
        .collect::<Vec<_>>();
    let headers = vec!["#".to_string(), "field".to_string(), "role".to_string()];
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(table::render_table(&headers, &rows, 0).as_bytes())
        .context("Writing headings table")?;
    info!("Listed {} heading(s)", rows.len());
    Ok(())
}
