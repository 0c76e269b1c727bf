use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{error, info};
use regex::Regex;

use rdbscan::formatter::{FormatterType, Nil, Plain, Protocol, JSON};
use rdbscan::{filter, Checksum, Outcome, ParseStats, RdbError, RdbParser, Type};

const EXIT_DECODE_FAILURE: u8 = 1;
const EXIT_CHECKSUM_MISMATCH: u8 = 2;
const EXIT_IO: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Plain,
    Protocol,
    Nil,
}

/// Decode a Redis RDB dump file
#[derive(Parser, Debug)]
#[command(name = "rdbscan", version)]
struct Args {
    /// Dump file to read
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Only decode this database (repeatable)
    #[arg(short, long = "databases", value_name = "DB")]
    databases: Vec<u32>,

    /// Only decode this type: string, list, set, sortedset or hash (repeatable)
    #[arg(short, long = "type", value_name = "TYPE")]
    types: Vec<Type>,

    /// Only decode keys matching this regular expression
    #[arg(short, long, value_name = "REGEX")]
    keys: Option<String>,

    /// Write output to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print parse statistics to stderr
    #[arg(long)]
    stats: bool,
}

fn build_filter(args: &Args) -> Result<filter::Simple, regex::Error> {
    let mut filter = filter::Simple::new();
    for db in &args.databases {
        filter.add_database(*db);
    }
    for typ in &args.types {
        filter.add_type(*typ);
    }
    if let Some(keys) = &args.keys {
        filter.add_keys(Regex::new(keys)?);
    }
    Ok(filter)
}

fn build_formatter(format: Format, output: Option<&PathBuf>) -> io::Result<FormatterType> {
    let out: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    Ok(match format {
        Format::Json => FormatterType::Json(JSON::new(out)),
        Format::Plain => FormatterType::Plain(Plain::new(out)),
        Format::Protocol => FormatterType::Protocol(Protocol::new(out)),
        Format::Nil => FormatterType::Nil(Nil::new()),
    })
}

fn print_stats(stats: &ParseStats) {
    let total = stats
        .total_bytes
        .map(|total| total.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    eprintln!("total bytes:    {}", total);
    eprintln!("consumed bytes: {}", stats.consumed_bytes);
    for typ in Type::ALL {
        eprintln!("{:<15} {}", format!("{}:", typ), stats.records(typ));
    }
    eprintln!("skipped:        {}", stats.skipped);
    if let Some(elapsed) = stats.elapsed {
        eprintln!("elapsed:        {:?}", elapsed);
    }
}

fn run(args: Args) -> ExitCode {
    let filter = match build_filter(&args) {
        Ok(filter) => filter,
        Err(err) => {
            error!("Invalid key pattern: {}", err);
            return ExitCode::from(EXIT_IO);
        }
    };

    let file = match File::open(&args.file) {
        Ok(file) => file,
        Err(err) => {
            error!("Cannot open {}: {}", args.file.display(), err);
            return ExitCode::from(EXIT_IO);
        }
    };
    let total_bytes = file.metadata().ok().map(|meta| meta.len());

    let mut formatter = match build_formatter(args.format, args.output.as_ref()) {
        Ok(formatter) => formatter,
        Err(err) => {
            error!("Cannot open output: {}", err);
            return ExitCode::from(EXIT_IO);
        }
    };

    let mut parser = RdbParser::new(BufReader::new(file), filter);
    if let Some(total) = total_bytes {
        parser = parser.with_total_bytes(total);
    }

    let result = parser.parse(&mut formatter);
    if args.stats {
        print_stats(parser.stats());
    }

    if let Some(err) = formatter.take_error() {
        error!("Failed to write output: {}", err);
        return ExitCode::from(EXIT_IO);
    }

    match result {
        Ok(Outcome::Completed { checksum, .. }) => {
            if checksum == Checksum::Disabled {
                info!("Dump was written without a checksum");
            }
            ExitCode::SUCCESS
        }
        Ok(Outcome::Aborted { .. }) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            match err.kind {
                RdbError::ChecksumMismatch { .. } => ExitCode::from(EXIT_CHECKSUM_MISMATCH),
                RdbError::Io(_) => ExitCode::from(EXIT_IO),
                _ => ExitCode::from(EXIT_DECODE_FAILURE),
            }
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(EXIT_IO)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    run(args)
}
