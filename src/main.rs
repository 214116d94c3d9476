//! snag - interactive download client for the snag file service.
//!
//! All console interaction lives here. The protocol state machines in the
//! library never touch a terminal; this binary feeds them prompts, an
//! overwrite decision closure, and a progress bar observer.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use snag::logger::{Logger, NoopLogger, TextLogger};
use snag::progress::TransferBar;
use snag::protocol::DEFAULT_PORT;
use snag::session::Session;
use snag::transfer::FetchOutcome;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Interactive download client for the snag file service"
)]
struct Args {
    /// Server hostname (prompted for when omitted)
    host: Option<String>,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Directory downloads are written into
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Overwrite existing local files without asking
    #[arg(short = 'y', long)]
    yes: bool,

    /// Append one line per session event to this file
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Set up Ctrl-C handler
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted by user. Exiting (Ctrl-C)...");
        std::process::exit(130);
    })
    .context("setting Ctrl-C handler")?;

    let args = Args::parse();

    // Choose logger once; NoopLogger costs nothing afterwards
    let logger: Arc<dyn Logger> = match args.log_file {
        Some(ref p) => match TextLogger::new(p) {
            Ok(l) => Arc::new(l),
            Err(_) => Arc::new(NoopLogger),
        },
        None => Arc::new(NoopLogger),
    };

    let host = match args.host.clone() {
        Some(h) => h,
        None => prompt("Server hostname: ")?.unwrap_or_default(),
    };
    if host.is_empty() {
        anyhow::bail!("no hostname entered");
    }

    // Connect and greeting failures are the only fatal ones; everything
    // past this point reports and returns to the menu.
    let session = Session::connect(&host, args.port)
        .with_context(|| format!("connecting to {}:{}", host, args.port))?;
    logger.connected(&host, args.port);
    println!("Server says: {}", session.greeting());

    run_menu(session, &args, logger.as_ref())
}

/// Print `text`, flush, then read one trimmed input line. `None` means
/// stdin reached end of file.
fn prompt(text: &str) -> Result<Option<String>> {
    print!("{text}");
    io::stdout().flush().context("flushing stdout")?;
    let mut line = String::new();
    let n = io::stdin().read_line(&mut line).context("reading stdin")?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Overwrite decision handed to the transfer core. With `--yes` every
/// existing file is replaced without asking.
fn overwrite_prompt(auto_yes: bool) -> impl FnMut(&str) -> bool {
    move |name| {
        if auto_yes {
            return true;
        }
        match prompt(&format!("File '{name}' already exists. Overwrite? (y/n): ")) {
            Ok(Some(answer)) => matches!(answer.chars().next(), Some('y' | 'Y')),
            _ => false,
        }
    }
}

fn run_menu(mut session: Session, args: &Args, logger: &dyn Logger) -> Result<()> {
    loop {
        println!();
        println!("==== File Download Client ====");
        println!("1) List files on server");
        println!("2) Download a file");
        println!("3) Download all files");
        println!("4) Quit");
        let choice = match prompt("Choice: ")? {
            Some(c) => c,
            // stdin closed; dropping the session closes the connection
            None => return Ok(()),
        };

        match choice.as_str() {
            "1" => show_listing(&mut session, logger),
            "2" => {
                let name = match prompt("Enter filename to download: ")? {
                    Some(n) => n,
                    None => return Ok(()),
                };
                if name.is_empty() {
                    println!("No filename entered.");
                    continue;
                }
                fetch_one(&mut session, &name, args, logger);
            }
            "3" => fetch_all(&mut session, args, logger),
            "4" => {
                logger.quit();
                if let Some(farewell) = session.quit() {
                    println!("Server says: {farewell}");
                }
                return Ok(());
            }
            _ => println!("Invalid choice."),
        }
    }
}

fn show_listing(session: &mut Session, logger: &dyn Logger) {
    let listing = match session.refresh_listing() {
        Ok(l) => l,
        Err(e) => {
            eprintln!("LIST failed: {e}");
            logger.error("list", &e.to_string());
            return;
        }
    };

    println!();
    println!("Files on server:");
    println!("{:<8}  {:<40}", "Size", "Name");
    println!("---------------------------------------------------------------");
    for entry in listing.entries() {
        println!("{:<8}  {:<40}", entry.size, entry.name);
    }
    for raw in listing.unparsed() {
        println!("???  {raw}");
    }
    if listing.is_empty() {
        println!("(no files)");
    }
    if listing.truncated() {
        println!(
            "(listing truncated: server sent {} entries, keeping the first {})",
            listing.total(),
            listing.entries().len()
        );
    }
    logger.listing(listing.total(), listing.entries().len());
}

fn fetch_one(session: &mut Session, name: &str, args: &Args, logger: &dyn Logger) {
    let mut confirm = overwrite_prompt(args.yes);
    let mut bar = TransferBar::new();
    match session.fetch(name, &args.output, &mut confirm, &mut bar) {
        Ok(FetchOutcome::Transferred(bytes)) => logger.fetched(name, bytes),
        Ok(FetchOutcome::Skipped) => {
            println!("Skipping download of {name}.");
            logger.skipped(name);
        }
        Err(e) => {
            eprintln!("Download of {name} failed: {e}");
            logger.error("fetch", &e.to_string());
        }
    }
}

fn fetch_all(session: &mut Session, args: &Args, logger: &dyn Logger) {
    if !session.listing().is_some_and(|l| !l.is_empty()) {
        println!("You need to list files first.");
        return;
    }

    let mut confirm = overwrite_prompt(args.yes);
    let mut bar = TransferBar::new();
    let reports = session.fetch_all(&args.output, &mut confirm, &mut bar);

    let mut transferred = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;
    for report in &reports {
        match &report.result {
            Ok(FetchOutcome::Transferred(bytes)) => {
                transferred += 1;
                logger.fetched(&report.name, *bytes);
            }
            Ok(FetchOutcome::Skipped) => {
                skipped += 1;
                println!("Skipping download of {}.", report.name);
                logger.skipped(&report.name);
            }
            Err(e) => {
                failed += 1;
                eprintln!("Download of {} failed: {e}", report.name);
                logger.error("fetch-all", &e.to_string());
            }
        }
    }
    println!("Done: {transferred} transferred, {skipped} skipped, {failed} failed.");
}
