use crate::application::ledger::LoanSummary;
use crate::domain::loan::Loan;
use crate::error::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct ScheduleRow {
    week: u32,
    due: Decimal,
    paid: bool,
    paid_at: Option<DateTime<Utc>>,
}

/// Writes loan reports as CSV.
pub struct LoanWriter<W: Write> {
    writer: W,
}

impl<W: Write> LoanWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes a header and a single summary row.
    pub fn write_summary(&mut self, summary: &LoanSummary) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(&mut self.writer);
        wtr.serialize(summary)?;
        wtr.flush()?;
        Ok(())
    }

    /// Writes one row per week of the term, paid or not.
    pub fn write_schedule(&mut self, loan: &Loan) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(&mut self.writer);
        for installment in loan.schedule() {
            wtr.serialize(ScheduleRow {
                week: installment.week,
                due: installment.due.value().normalize(),
                paid: installment.payment.is_some(),
                paid_at: installment.payment.map(|payment| payment.paid_at),
            })?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Writes the whole loan, payments included, as pretty-printed JSON.
    pub fn write_json(&mut self, loan: &Loan) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, loan)?;
        writeln!(self.writer)?;
        Ok(())
    }
}
