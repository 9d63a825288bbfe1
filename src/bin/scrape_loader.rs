// src/bin/scrape_loader.rs
use std::{env, path::PathBuf, process::ExitCode};

use html_scrape_loader::{logging, LoaderContext};

const USAGE: &str = "\
Usage: scrape_loader <FILE> [--query <QUERY>] [--blocking]

Scrapes FILE (HTML, a URL, or a JSON descriptor with html/url/selectors keys)
and prints the generated module source.

Options:
  -q, --query <QUERY>   Loader query supplying selectors, e.g. '?title=h1'
      --blocking        Fetch URLs with the blocking client
  -h, --help            Print this help

Logging is controlled by SCRAPE_LOADER_LOG (or RUST_LOG).";

struct Args {
    file: PathBuf,
    query: Option<String>,
    blocking: bool,
}

fn parse_args() -> Result<Option<Args>, String> {
    let mut file = None;
    let mut query = None;
    let mut blocking = false;

    let mut args = env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "-q" | "--query" => query = Some(args.next().ok_or("Missing value for --query")?),
            "--blocking" => blocking = true,
            "-h" | "--help" => return Ok(None),
            other if other.starts_with('-') => return Err(format!("Unknown arg: {other}")),
            _ if file.is_none() => file = Some(PathBuf::from(a)),
            _ => return Err(format!("Unexpected argument: {a}")),
        }
    }

    let file = file.ok_or("Missing input file")?;
    Ok(Some(Args {
        file,
        query,
        blocking,
    }))
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let source = match tokio::fs::read_to_string(&args.file).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {e}", args.file.display());
            return ExitCode::FAILURE;
        }
    };

    let mut ctx = LoaderContext {
        query: args.query,
        ..LoaderContext::default()
    };
    let result = if args.blocking {
        tokio::task::block_in_place(|| ctx.run_blocking(&source))
    } else {
        ctx.run(&source).await
    };

    match result {
        Ok(code) => {
            println!("{code}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
