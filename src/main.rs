use clap::{Parser, ValueEnum};
use erdsql::config::{self, ConfigError};
use erdsql::{CompileOptions, compile, describe_error};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Schema snapshot (JSON)
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target dialect: mysql, postgresql, sqlite, mssql
    #[arg(short, long)]
    dialect: Option<String>,

    /// Options file (default: .erdsql.json in the current directory, if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit DROP statements before the CREATE phase
    #[arg(long)]
    drop: bool,

    /// Omit table description comments
    #[arg(long)]
    no_comments: bool,

    /// Omit foreign key indexes
    #[arg(long)]
    no_indexes: bool,

    /// Omit foreign key constraints
    #[arg(long)]
    no_constraints: bool,

    /// Quote every identifier
    #[arg(long)]
    quote: bool,

    /// Align column types in CREATE TABLE bodies
    #[arg(long)]
    align: bool,

    #[arg(short, long, value_enum, default_value_t = Format::Sql)]
    format: Format,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// Plain SQL script
    Sql,
    /// `{ sql, dialect, warnings }` JSON
    Json,
}

impl Args {
    fn options(&self) -> Result<CompileOptions, ConfigError> {
        let mut options = match &self.config {
            Some(path) => config::load_options(path)?,
            None => config::discover_options(Path::new("."))?,
        };

        if let Some(dialect) = &self.dialect {
            options.dialect = dialect.clone();
        }
        options.include_drop_statements |= self.drop;
        options.include_comments &= !self.no_comments;
        options.include_indexes &= !self.no_indexes;
        options.include_constraints &= !self.no_constraints;
        options.quote_identifiers |= self.quote;
        options.align_columns |= self.align;
        Ok(options)
    }
}

fn main() {
    let args = Args::parse();

    let options = args.options().unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    });

    let schema = config::load_schema(&args.input).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    });

    let compiled = match compile(&schema, &options) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", describe_error(&e));
            process::exit(1);
        }
    };

    for warning in &compiled.warnings {
        eprintln!("warning: {}", warning);
    }

    let text = match args.format {
        Format::Sql => compiled.sql,
        Format::Json => match serde_json::to_string_pretty(&compiled) {
            Ok(json) => json + "\n",
            Err(e) => {
                eprintln!("Failed to serialize output: {}", e);
                process::exit(1);
            }
        },
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &text) {
                eprintln!("Failed to write {}: {}", path.display(), e);
                process::exit(1);
            }
        }
        None => print!("{}", text),
    }
}
