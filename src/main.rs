use clap::Parser;
use reportdef::{CommandEngine, RenderFormat, ReportError, ReportLoader};
use std::path::PathBuf;
use std::time::Duration;
use std::{env, process};

/// Render a report definition against a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "reportdef", version, about, long_about = None)]
struct Args {
    /// Report definition file
    definition: PathBuf,

    /// SQLite database the datasets query
    #[arg(short, long, env = "REPORTDEF_DATABASE")]
    database: PathBuf,

    /// Output format: CSV, Excel, Image or PDF
    #[arg(short, long, default_value = "CSV")]
    format: RenderFormat,

    /// Output file; defaults to the definition name with the format's extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Parameter value as NAME=VALUE; repeat a name for a multi-value list
    #[arg(short, long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Query timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// External renderer for Excel, Image and PDF output
    #[arg(long, env = "REPORTDEF_ENGINE")]
    engine_command: Option<String>,

    /// List the report parameters and their valid values, then exit
    #[arg(long, default_value_t = false)]
    list_parameters: bool,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))
}

/// Groups repeated names, keeping first-seen order.
fn group_params(params: Vec<(String, String)>) -> Vec<(String, Vec<String>)> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (name, value) in params {
        match grouped.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value),
            None => grouped.push((name, vec![value])),
        }
    }
    grouped
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), ReportError> {
    let conn = rusqlite::Connection::open(&args.database)?;

    let mut loader = ReportLoader::new().with_command_timeout(Duration::from_secs(args.timeout));
    if let Some(engine) = args.engine_command.as_deref().and_then(CommandEngine::from_command_line) {
        loader = loader.with_engine(Box::new(engine));
    }
    let mut report = loader.load_file(&args.definition, &conn)?;

    if args.list_parameters {
        for parameter in report.parameters() {
            println!("{} ({})", parameter.name, parameter.data_type);
            let Some(reference) = &parameter.dataset_reference else { continue };
            if let Some(table) = report.reference_data(&reference.dataset_name) {
                for row in 0..table.row_count() {
                    let value = table.cell(row, &reference.value_field).map(|v| v.to_string()).unwrap_or_default();
                    let label = table.cell(row, &reference.label_field).map(|v| v.to_string()).unwrap_or_default();
                    println!("  {value}\t{label}");
                }
            }
        }
        report.close();
        return Ok(());
    }

    for (name, values) in group_params(args.params) {
        report.set_parameter_values(&name, Some(values))?;
    }
    report.initialize_data_sources(&conn)?;

    let output = args
        .output
        .unwrap_or_else(|| args.definition.with_extension(args.format.file_extension()));
    report.render_to_file(args.format, &output)?;
    report.close();
    Ok(())
}
