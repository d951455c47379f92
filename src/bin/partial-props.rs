//! partial-props CLI
//!
//! Command-line interface for resolving component properties the way a
//! partial reload would.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use partial_props::{
    convert_value, load_config, load_json_auto, load_properties, Case, PartialRequest,
    PropertiesResolver, RequestPropertiesResolver, ResolverConfig, EXCEPT_DATA_HEADER,
    ONLY_DATA_HEADER,
};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "partial-props")]
#[command(about = "Resolve component properties for full and partial reloads")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a properties document for a component
    Resolve {
        /// Properties source: file path or URL (http:// or https://)
        properties: String,

        /// Component being rendered
        #[arg(long, short)]
        component: String,

        /// Component targeted by the partial reload (omit for a full load)
        #[arg(long)]
        partial_component: Option<String>,

        /// JSON list of dot-paths to include, as sent in the only-data header
        #[arg(long)]
        only: Option<String>,

        /// JSON list of dot-paths to exclude, as sent in the except-data header
        #[arg(long)]
        except: Option<String>,

        /// Dot-path the client already holds (repeatable)
        #[arg(long)]
        persisted: Vec<String>,

        /// Resolver configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Case applied to only/except paths: none, camel or snake
        #[arg(long, value_parser = parse_case)]
        input_case: Option<Case>,

        /// Case applied to output keys: none, camel or snake
        #[arg(long, value_parser = parse_case)]
        output_case: Option<Case>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Convert the keys of a JSON document to another case
    Case {
        /// Document source: file path or URL
        document: String,

        /// Target case: none, camel or snake
        #[arg(long, value_parser = parse_case)]
        to: Case,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

struct ResolveArgs {
    properties: String,
    component: String,
    partial_component: Option<String>,
    only: Option<String>,
    except: Option<String>,
    persisted: Vec<String>,
    config: Option<PathBuf>,
    input_case: Option<Case>,
    output_case: Option<Case>,
    output: Option<PathBuf>,
    pretty: bool,
}

fn main() -> ExitCode {
    setup_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Resolve {
            properties,
            component,
            partial_component,
            only,
            except,
            persisted,
            config,
            input_case,
            output_case,
            output,
            pretty,
        } => run_resolve(ResolveArgs {
            properties,
            component,
            partial_component,
            only,
            except,
            persisted,
            config,
            input_case,
            output_case,
            output,
            pretty,
        }),

        Commands::Case {
            document,
            to,
            pretty,
        } => run_case(&document, to, pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

/// Log to stderr, filtered by `RUST_LOG`, so stdout stays pure JSON.
fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn parse_case(s: &str) -> Result<Case, String> {
    Case::parse(s).ok_or_else(|| format!("unknown case '{}': expected none, camel or snake", s))
}

fn run_resolve(args: ResolveArgs) -> Result<(), u8> {
    let mut config = match &args.config {
        Some(path) => load_config(path).map_err(|e| {
            eprintln!("Error loading config: {}", e);
            e.exit_code() as u8
        })?,
        None => ResolverConfig::new(),
    };
    if let Some(case) = args.input_case {
        config = config.input_case(case);
    }
    if let Some(case) = args.output_case {
        config = config.output_case(case);
    }

    let properties = load_properties(&args.properties).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let mut request = PartialRequest::new();
    if let Some(component) = &args.partial_component {
        request = request.with_partial_component(component);
    }
    if let Some(only) = args.only {
        request = request.with_header(ONLY_DATA_HEADER, only);
    }
    if let Some(except) = args.except {
        request = request.with_header(EXCEPT_DATA_HEADER, except);
    }

    let resolver = RequestPropertiesResolver::new(&request, config);
    let resolved = resolver
        .resolve(&args.component, properties, &args.persisted)
        .map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;

    write_json(&Value::Object(resolved), args.output, args.pretty)
}

fn run_case(source: &str, case: Case, pretty: bool) -> Result<(), u8> {
    let document = load_json_auto(source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let converted = convert_value(document, case);

    write_json(&converted, None, pretty)
}

fn write_json(value: &Value, output: Option<PathBuf>, pretty: bool) -> Result<(), u8> {
    let json_output = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}
