//! Folder size CLI (foldersize) - Main binary entry point

use foldersize::cli::args::{Command, ScanArgs, SizeArgs, parse_args};
use foldersize::cli::output::{write_json, write_skipped, write_text};
use foldersize::services::aggregate::{SizeAggregator, WalkAggregator, heaviest};
use foldersize::services::format::format_size;
use foldersize::{Error, ScanOptions, ScanProgress, ScanService, SizeBasis};
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process;
use std::str::FromStr;
use std::sync::Arc;

const EXIT_OK: i32 = 0;
const EXIT_USAGE: i32 = 2;
const EXIT_PARTIAL: i32 = 3;
const EXIT_FAILURE: i32 = 4;

fn main() {
    // Initialize logger (controlled by RUST_LOG environment variable)
    // Example: RUST_LOG=debug foldersize scan /path
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return;
    }

    match args[1].as_str() {
        "--help" | "-h" => {
            print_help();
            return;
        }
        "--version" | "-v" => {
            print_version();
            return;
        }
        _ => {}
    }

    let cli_args = match parse_args(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Use --help for usage information");
            process::exit(EXIT_USAGE);
        }
    };

    let exit_code = match &cli_args.command {
        Command::Scan(scan_args) => handle_scan(scan_args),
        Command::Size(size_args) => handle_size(size_args),
    };

    process::exit(exit_code);
}

fn parse_basis(label: &str) -> Option<SizeBasis> {
    match SizeBasis::from_str(label) {
        Ok(basis) => Some(basis),
        Err(err) => {
            eprintln!("Error: {err}. Use 'logical' or 'physical'");
            None
        }
    }
}

fn handle_scan(args: &ScanArgs) -> i32 {
    let Some(basis) = parse_basis(&args.basis) else {
        return EXIT_USAGE;
    };

    let mut opts = ScanOptions {
        basis,
        ..ScanOptions::default()
    };

    if !args.quiet {
        opts.progress_notifier = Some(Arc::new(|progress: &ScanProgress| {
            eprintln!(
                "[{}/{}] {} ({} so far)",
                progress.processed,
                progress.total,
                progress.path,
                format_size(progress.bytes)
            );
        }));
        eprintln!("Scanning: {}", args.path);
    }

    let mut service = ScanService::with_options(opts);
    let (skipped, mut exit_code) = match service.scan(&args.path) {
        Ok(report) => {
            let code = if report.skipped.is_empty() {
                EXIT_OK
            } else {
                EXIT_PARTIAL
            };
            (report.skipped, code)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            match e {
                Error::Listing { .. } => return EXIT_USAGE,
                Error::Aggregation { skipped, .. } | Error::Cancelled { skipped, .. } => {
                    (skipped, EXIT_PARTIAL)
                }
                _ => return EXIT_FAILURE,
            }
        }
    };

    if args.sort {
        service.order_by_heavy_item();
    }

    let analysis = service.analysis();
    let items = match args.top {
        Some(k) if args.sort => heaviest(analysis.items.as_slice(), Some(k)),
        Some(k) => analysis.items.iter().take(k).cloned().collect(),
        None => analysis.items.clone(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = if args.json {
        write_json(&mut out, analysis, &items)
    } else {
        write_text(&mut out, analysis, &items, stdout.is_terminal()).map_err(Error::from)
    };

    if let Err(e) = written.and_then(|()| out.flush().map_err(Error::from)) {
        eprintln!("Error: Failed to write output: {e}");
        exit_code = EXIT_FAILURE;
    }

    if !args.quiet
        && let Err(e) = write_skipped(&mut io::stderr(), &skipped)
    {
        log::warn!("Failed to report skipped entries: {e}");
    }

    exit_code
}

fn handle_size(args: &SizeArgs) -> i32 {
    let Some(basis) = parse_basis(&args.basis) else {
        return EXIT_USAGE;
    };

    let aggregator = WalkAggregator::new(basis);
    match aggregator.compute_totals(Path::new(&args.path)) {
        Ok(totals) => {
            println!(
                "{}\t{} ({} bytes, {} files, {} folders)",
                args.path,
                format_size(totals.bytes),
                totals.bytes,
                totals.files,
                totals.folders
            );
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_FAILURE
        }
    }
}

fn print_help() {
    println!("Folder size CLI (foldersize) - Measure the immediate children of a directory");
    println!();
    println!("USAGE:");
    println!("    foldersize scan <PATH> [OPTIONS]");
    println!("    foldersize size <PATH> [--basis <TYPE>]");
    println!();
    println!("COMMANDS:");
    println!("    scan      List every entry of PATH with its cumulative size");
    println!("    size      Print the total size of PATH and everything beneath it");
    println!();
    println!("GLOBAL OPTIONS:");
    println!("    -h, --help                 Show this help message");
    println!("    -v, --version              Show version information");
    println!();
    println!("SCAN OPTIONS:");
    println!("    --basis <TYPE>            Size basis: logical (default) or physical");
    println!("    --top <K>                 Show only the K heaviest entries");
    println!("    --no-sort                 Keep listing order instead of heaviest first");
    println!("    --json                    Emit machine-readable output");
    println!("    --quiet                   Suppress progress and skipped-entry reports");
    println!();
    println!("EXIT CODES:");
    println!("    0  success");
    println!("    2  usage error or directory cannot be listed");
    println!("    3  partial result (entries skipped or scan aborted)");
    println!("    4  other failure");
    println!();
    println!("EXAMPLES:");
    println!("    foldersize scan ~/Downloads --top 10");
    println!("    foldersize scan /var --basis physical --json");
    println!("    RUST_LOG=debug foldersize size /usr/share");
}

fn print_version() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_DATE: &str = env!("GIT_DATE");
    const BUILD_TARGET: &str = env!("BUILD_TARGET");

    println!("foldersize {VERSION}");
    println!("Commit: {GIT_HASH} ({GIT_DATE})");
    println!("Target: {BUILD_TARGET}");

    #[cfg(debug_assertions)]
    println!("Build: debug");
    #[cfg(not(debug_assertions))]
    println!("Build: release");
}
