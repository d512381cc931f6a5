use clap::{ArgAction, Parser, ValueEnum};
use log::{LevelFilter, info, warn};
use microloan::application::ledger::LoanLedger;
use microloan::domain::event::LedgerEvent;
use microloan::domain::loan::LoanTerms;
use microloan::error::{self, LedgerError};
use microloan::interfaces::csv::event_reader::EventReader;
use microloan::interfaces::csv::loan_writer::LoanWriter;
use miette::{IntoDiagnostic, Result, WrapErr};
use rust_decimal::Decimal;
use simple_logger::SimpleLogger;
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Repayment script CSV file with `type, amount` rows.
    /// Without it, opens week 1 and pays one installment.
    events: Option<PathBuf>,

    /// Amount borrowed
    #[arg(long, default_value = "5000000", allow_negative_numbers = true)]
    principal: Decimal,

    /// Flat interest rate as a fraction (0.10 is 10%)
    #[arg(long, default_value = "0.10", allow_negative_numbers = true)]
    rate: Decimal,

    /// Term length in weeks
    #[arg(long, default_value_t = 50)]
    weeks: u32,

    #[arg(long, default_value_t = 1)]
    loan_id: u32,

    /// Also print the week-by-week schedule (CSV output only)
    #[arg(long)]
    schedule: bool,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Stop at the first rejected event instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    SimpleLogger::new().with_level(level).init().into_diagnostic()?;

    let terms = LoanTerms {
        principal: cli.principal,
        interest_rate: cli.rate,
        total_weeks: cli.weeks,
    };
    let mut ledger = LoanLedger::open(cli.loan_id, terms).into_diagnostic()?;

    let events: Box<dyn Iterator<Item = error::Result<LedgerEvent>>> = match &cli.events {
        Some(path) => {
            let file = File::open(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("cannot open {}", path.display()))?;
            Box::new(EventReader::new(file).events())
        }
        None => Box::new(
            [LedgerEvent::advance(), LedgerEvent::pay_due()]
                .into_iter()
                .map(Ok::<_, LedgerError>),
        ),
    };

    // Process events
    let mut rejected = 0;
    for (index, event_result) in events.enumerate() {
        let row = index + 1;
        let outcome = event_result.and_then(|event| ledger.process_event(event));
        if let Err(e) = outcome {
            if cli.strict {
                return Err(e)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("event {row} rejected"));
            }
            warn!("Skipping event {}: {}", row, e);
            rejected += 1;
        }
    }
    info!("Replay finished with {} rejected events", rejected);

    // Output final state
    let stdout = io::stdout();
    let mut writer = LoanWriter::new(stdout.lock());
    match cli.format {
        Format::Csv => {
            writer.write_summary(&ledger.summary()).into_diagnostic()?;
            if cli.schedule {
                writer.write_schedule(ledger.loan()).into_diagnostic()?;
            }
        }
        Format::Json => writer.write_json(ledger.loan()).into_diagnostic()?,
    }

    Ok(())
}
