use std::error::Error;
use std::io::Read;
use std::path::PathBuf;

use arrayql::config::{CliConfig, CompilerConfig, ConfigError};
use arrayql::request::ast::Expression;
use arrayql::schema::SchemaMapping;
use arrayql::statement::SequentialTags;
use arrayql::translator::Translator;
use clap::Parser;

/// ArrayQL - compile an array request into a MySQL SELECT
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Compiler configuration YAML file (otherwise ARRAYQL_* environment variables)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Schema mapping YAML file
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Request expression tree as JSON, or `-` for stdin
    #[arg(long, default_value = "-")]
    request: String,

    /// Maximum nesting depth of the request tree
    #[arg(long)]
    max_depth: Option<usize>,
}

/// CLI flags override the config file, or the environment when there is none.
fn load_config(cli: &Cli) -> Result<CompilerConfig, ConfigError> {
    let base = match &cli.config {
        Some(path) => CompilerConfig::from_yaml_file(path)?,
        None => CompilerConfig::from_env()?,
    };

    CompilerConfig::from_cli(CliConfig {
        schema_path: cli
            .schema
            .clone()
            .unwrap_or_else(|| PathBuf::from(&base.schema_path)),
        max_expression_depth: cli.max_depth.unwrap_or(base.max_expression_depth),
    })
}

fn read_request(source: &str) -> Result<Expression, Box<dyn Error>> {
    let json = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(source)?
    };
    Ok(serde_json::from_str(&json)?)
}

fn run(cli: &Cli) -> Result<String, Box<dyn Error>> {
    let config = load_config(cli)?;
    let schema = SchemaMapping::from_yaml_file(&config.schema_path)?;
    let request = read_request(&cli.request)?;
    log::info!("Compiling {}", request);

    let tags = SequentialTags::new();
    let translator = Translator::with_config(&schema, &tags, &config);
    Ok(translator.translate(&request)?)
}

fn main() {
    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(sql) => println!("{}", sql),
        Err(e) => {
            eprintln!("Error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            std::process::exit(1);
        }
    }
}
