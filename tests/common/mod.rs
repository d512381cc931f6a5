#![allow(dead_code)]

use microloan::domain::loan::{Loan, LoanTerms};
use rust_decimal_macros::dec;
use std::io::{Error, Write};
use tempfile::NamedTempFile;

/// The reference loan: 5,000,000 at 10% over 50 weeks.
pub fn reference_loan() -> Loan {
    Loan::new(
        1,
        LoanTerms {
            principal: dec!(5000000),
            interest_rate: dec!(0.10),
            total_weeks: 50,
        },
    )
    .expect("reference terms are valid")
}

/// Writes a repayment script with the given `type, amount` rows.
pub fn write_events(rows: &[&str]) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "type, amount")?;
    for row in rows {
        writeln!(file, "{}", row)?;
    }
    file.flush()?;
    Ok(file)
}
