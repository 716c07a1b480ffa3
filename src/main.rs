//! Trip Settlement CLI
//!
//! Reads a trip ledger CSV and prints one report as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- ledger.csv settlements --today 2026-10-14 > settlements.csv
//! ```
//!
//! Reports: `balances`, `settlements` (default), `categories`, `summary`.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use chrono::{Local, NaiveDate};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;
use trip_settlement::ledger::parse_date;
use trip_settlement::{read_ledger, EngineError, ReportKind, Result, SettlementEngine};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

struct Args {
    ledger: String,
    report: ReportKind,
    today: NaiveDate,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut positional = Vec::new();
    let mut today = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--today" {
            let value = iter
                .next()
                .ok_or_else(|| EngineError::MissingOptionValue(arg.clone()))?;
            let date = parse_date(value).ok_or_else(|| EngineError::InvalidDate(value.clone()))?;
            today = Some(date);
        } else {
            positional.push(arg.as_str());
        }
    }

    let ledger = positional.first().ok_or(EngineError::MissingArgument)?.to_string();
    let report = match positional.get(1) {
        Some(name) => name.parse()?,
        None => ReportKind::default(),
    };

    Ok(Args {
        ledger,
        report,
        today: today.unwrap_or_else(|| Local::now().date_naive()),
    })
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let args = parse_args(&args)?;

    let file = File::open(&args.ledger)?;
    let trip = read_ledger(BufReader::new(file))?;

    let report = SettlementEngine::new().run(&trip, args.today);

    let stdout = io::stdout();
    let handle = stdout.lock();
    report.write_csv(args.report, handle)?;

    Ok(())
}
