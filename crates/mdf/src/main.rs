//! Command-line interface for mdf.

use std::{path::PathBuf, process::ExitCode, time::UNIX_EPOCH};

use clap::Parser;
use mdf_search::{FileRecord, Finder};
use serde::Serialize;

/// Find Markdown files matching a compact search-box query.
#[derive(Parser, Debug)]
#[command(name = "mdf")]
#[command(about = "Find Markdown files matching a compact search query")]
#[command(after_help = "\
Examples:
  mdf 'size>10kb | content:abc' notes/
  mdf 'blockcodelang:python -taskdone:release' .
  mdf 'h1:intro \"getting started\"' docs/
")]
struct Args {
    /// The query, e.g. 'size>10kb | content:abc'
    #[arg(required_unless_present_any = ["grammar", "scopes"])]
    query: Option<String>,

    /// Directory to search
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Match case-sensitively (query literals and file text)
    #[arg(short = 's', long)]
    case_sensitive: bool,

    /// Output one JSON object per match
    #[arg(long)]
    json: bool,

    /// Output only the number of matches
    #[arg(short = 'c', long)]
    count: bool,

    /// Print the parsed query AST without searching
    #[arg(long)]
    explain: bool,

    /// Print the query grammar and exit
    #[arg(long)]
    grammar: bool,

    /// Print the qualifier catalogue and exit
    #[arg(long)]
    scopes: bool,
}

/// One match in `--json` mode.
#[derive(Serialize)]
struct MatchOutput {
    /// Path of the matching file.
    path: String,
    /// Size in bytes.
    size: u64,
    /// Modification time as epoch milliseconds.
    mtime_ms: i64,
}

impl From<&FileRecord> for MatchOutput {
    fn from(record: &FileRecord) -> Self {
        let mtime_ms = record
            .stats
            .modified
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or(0);
        Self {
            path: record.path.display().to_string(),
            size: record.stats.size,
            mtime_ms,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let finder = Finder::new();

    if args.grammar {
        print!("{}", finder.grammar());
        return ExitCode::SUCCESS;
    }
    if args.scopes {
        print_scopes(&finder);
        return ExitCode::SUCCESS;
    }
    let Some(query) = args.query.as_deref() else {
        eprintln!("error: query is must");
        return ExitCode::FAILURE;
    };

    if args.explain {
        return match finder.parse(query, args.case_sensitive) {
            Ok(expr) => {
                print!("{expr}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        };
    }

    let stream = match finder.find(query, &args.dir, args.case_sensitive) {
        Ok(stream) => stream,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut matches: usize = 0;
    for result in stream {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        };
        matches += 1;
        if args.count {
            continue;
        }
        if args.json {
            match serde_json::to_string(&MatchOutput::from(&record)) {
                Ok(line) => println!("{line}"),
                Err(err) => {
                    eprintln!("error: {err}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("{}", record.path.display());
        }
    }
    if args.count {
        println!("{matches}");
    }
    ExitCode::SUCCESS
}

/// Prints the qualifier catalogue: scope, kind, label.
fn print_scopes(finder: &Finder) {
    for qualifier in finder.registry().iter() {
        let kind = if qualifier.is_meta() { "meta" } else { "content" };
        println!("{:<14} {:<8} {}", qualifier.scope(), kind, qualifier.name());
    }
}
