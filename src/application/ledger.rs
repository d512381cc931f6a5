use crate::domain::event::{LedgerEvent, LedgerEventType};
use crate::domain::loan::{Loan, LoanStatus, LoanTerms};
use crate::domain::money::Money;
use crate::error::Result;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::Serialize;

/// What an accepted event did to the loan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventOutcome {
    Advanced { week: u32 },
    Paid { week: u32, amount: Money },
}

/// Reporting snapshot of a loan.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct LoanSummary {
    pub loan: u32,
    pub week: u32,
    pub total_weeks: u32,
    pub total_amount: Decimal,
    pub weekly_installment: Decimal,
    pub outstanding: Decimal,
    pub paid_weeks: usize,
    pub missed_weeks: usize,
    pub delinquent: bool,
    pub status: LoanStatus,
}

/// Drives a single loan through a sequence of ledger events.
///
/// The ledger owns its `Loan`; mutations go through `&mut self`, so there is
/// never more than one writer at a time.
pub struct LoanLedger {
    loan: Loan,
}

impl LoanLedger {
    /// Originates a new loan and wraps it in a ledger.
    pub fn open(id: u32, terms: LoanTerms) -> Result<Self> {
        let loan = Loan::new(id, terms)?;
        info!(
            "Opened loan {}: total {} over {} weeks, installment {}",
            loan.id(),
            loan.total_amount(),
            loan.total_weeks(),
            loan.weekly_installment()
        );
        Ok(Self::from_loan(loan))
    }

    pub fn from_loan(loan: Loan) -> Self {
        Self { loan }
    }

    /// Applies one event to the loan.
    ///
    /// Rejected events leave the loan unchanged and hand the error back to the
    /// caller, who decides whether to carry on.
    pub fn process_event(&mut self, event: LedgerEvent) -> Result<EventOutcome> {
        let result = match event.r#type {
            LedgerEventType::Advance => self
                .loan
                .advance_week()
                .map(|()| EventOutcome::Advanced {
                    week: self.loan.current_week(),
                }),
            LedgerEventType::Pay => {
                let amount = event
                    .amount
                    .map(Money::new)
                    .unwrap_or_else(|| self.amount_due());
                self.loan
                    .record_payment(amount)
                    .map(|week| EventOutcome::Paid { week, amount })
            }
        };

        match &result {
            Ok(EventOutcome::Advanced { week }) => {
                debug!("Loan {}: opened week {}", self.loan.id(), week);
            }
            Ok(EventOutcome::Paid { week, amount }) => {
                debug!(
                    "Loan {}: paid {} for week {}, outstanding {}",
                    self.loan.id(),
                    amount,
                    week,
                    self.loan.outstanding()
                );
            }
            Err(e) => {
                warn!("Loan {}: rejected {:?}: {}", self.loan.id(), event.r#type, e);
            }
        }
        result
    }

    /// Installment owed by the oldest unpaid week, or the regular installment
    /// when every opened week is paid.
    pub fn amount_due(&self) -> Money {
        self.loan
            .oldest_unpaid_week()
            .and_then(|week| self.loan.installment_due(week))
            .unwrap_or(self.loan.weekly_installment())
    }

    pub fn loan(&self) -> &Loan {
        &self.loan
    }

    pub fn summary(&self) -> LoanSummary {
        let loan = &self.loan;
        LoanSummary {
            loan: loan.id(),
            week: loan.current_week(),
            total_weeks: loan.total_weeks(),
            total_amount: loan.total_amount().value().normalize(),
            weekly_installment: loan.weekly_installment().value().normalize(),
            outstanding: loan.outstanding().value().normalize(),
            paid_weeks: loan.paid_weeks(),
            missed_weeks: loan.missed_weeks(),
            delinquent: loan.is_delinquent(),
            status: loan.status(),
        }
    }

    /// Consumes the ledger and returns the final state of the loan.
    pub fn into_loan(self) -> Loan {
        self.loan
    }
}
