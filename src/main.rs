//! dmn-enrich CLI
//!
//! Commands:
//!   enrich   - Enrich the decision tables of a decision
//!   types    - Show how a type flattens into input columns
//!   schema   - Print JSON schemas
//!   version  - Print the version

use dmn_enrich::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "enrich" => cmd_enrich(&args[2..]),
        "types" => cmd_types(&args[2..]),
        "schema" => cmd_schema(&args[2..]),
        "version" | "--version" | "-v" => {
            println!("dmn-enrich {}", VERSION);
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            Err("Unknown command".into())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    println!(
        r#"
dmn-enrich - Decision table enrichment for DMN models

USAGE:
    dmn-enrich <COMMAND> [OPTIONS]

COMMANDS:
    enrich <model> <decision-id>     Enrich the decision tables of a decision
    types <model> <type-name>        Show the input columns a type flattens to
    schema [name]                    Print a JSON schema (definitions, decision-table, config)
    version                          Print version
    help                             Print this help

OPTIONS:
    --json                           Output JSON (enrich)
    --config <file>                  Enrichment config YAML (enrich, types)
    --as <name>                      Variable name to flatten under (types)

Models are YAML, or JSON when the file ends in .json.
Set RUST_LOG=debug to trace type resolution and edge linking.
"#
    );
}

fn cmd_enrich(args: &[String]) -> Result<()> {
    let positional = positional_args(args);
    let (model_path, decision_id) = match positional.as_slice() {
        [model, decision, ..] => (*model, *decision),
        _ => return Err("Usage: dmn-enrich enrich <model> <decision-id> [--json] [--config <file>]".into()),
    };
    let config = load_config(args)?;

    let model = import(Definitions::from_path(Path::new(model_path))?)?;
    let tables = model.enrich_decision(decision_id, &config)?;

    if args.contains(&"--json".to_string()) {
        println!("{}", serde_json::to_string_pretty(&tables)?);
        return Ok(());
    }

    if tables.is_empty() {
        println!("No decision tables in '{}'", decision_id);
        return Ok(());
    }
    for enriched in &tables {
        println!("== {} ==", enriched.path);
        println!("{}", enriched.table.to_report());
    }
    Ok(())
}

fn cmd_types(args: &[String]) -> Result<()> {
    let positional = positional_args(args);
    let (model_path, type_name) = match positional.as_slice() {
        [model, type_name, ..] => (*model, *type_name),
        _ => return Err("Usage: dmn-enrich types <model> <type-name> [--as <name>]".into()),
    };
    let config = load_config(args)?;
    let prefix = flag_value(args, "--as").unwrap_or(type_name);

    let model = import(Definitions::from_path(Path::new(model_path))?)?;
    let flattener = Flattener::new(&model.catalog).with_expansion(config.reference_expansion);
    let requirements = flattener.flatten_variable(prefix, Some(&TypeRef::local(type_name)));

    let width = requirements.iter().map(|r| r.text.len()).max().unwrap_or(0);
    for requirement in &requirements {
        println!("{:<width$}  {}", requirement.text, requirement.type_ref, width = width);
    }
    Ok(())
}

fn cmd_schema(args: &[String]) -> Result<()> {
    let schema_name = args.first().map(|s| s.as_str()).unwrap_or("list");

    match schema_name {
        "list" => {
            println!("Available schemas: definitions, decision-table, config");
            Ok(())
        }
        "definitions" => print_schema::<Definitions>(),
        "decision-table" => print_schema::<EnrichedTable>(),
        "config" => print_schema::<EnrichConfig>(),
        _ => Err(format!("Unknown schema: {}", schema_name).into()),
    }
}

fn print_schema<T: schemars::JsonSchema>() -> Result<()> {
    let schema = schemars::schema_for!(T);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

/// Arguments that are neither flags nor flag values
fn positional_args(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        match arg.as_str() {
            "--config" | "--as" => skip_next = true,
            a if a.starts_with('-') => {}
            a => out.push(a),
        }
    }
    out
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn load_config(args: &[String]) -> Result<EnrichConfig> {
    match flag_value(args, "--config") {
        Some(path) => EnrichConfig::load(&PathBuf::from(path)),
        None => Ok(EnrichConfig::default()),
    }
}
