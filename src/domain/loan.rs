use super::money::{InterestRate, Money};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Consecutive unpaid weeks, counted back from the current week, that make a loan delinquent.
const DELINQUENCY_STREAK: usize = 2;

/// Terms a loan is originated with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    pub principal: Decimal,
    pub interest_rate: Decimal,
    pub total_weeks: u32,
}

/// A single recorded weekly payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub week: u32,
    pub amount: Money,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// No billing week has been opened yet.
    Pending,
    Current,
    Delinquent,
    /// Every week of the term is open and paid.
    Settled,
}

/// One row of the repayment schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Installment<'a> {
    pub week: u32,
    pub due: Money,
    pub payment: Option<&'a Payment>,
}

/// A fixed-term loan repaid in weekly installments.
///
/// The loan is the only owner of its financial state. Every mutating operation
/// either succeeds and keeps `outstanding == total_amount - sum(payments)`, or
/// fails and leaves the loan untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loan {
    id: u32,
    principal: Money,
    interest_rate: InterestRate,
    total_amount: Money,
    weekly_installment: Money,
    final_installment: Money,
    outstanding: Money,
    total_weeks: u32,
    current_week: u32,
    start_date: DateTime<Utc>,
    /// Recorded payments keyed by week; a week is paid iff it has an entry.
    payments: BTreeMap<u32, Payment>,
}

impl Loan {
    /// Originates a loan.
    ///
    /// The weekly installment is `total_amount / total_weeks` truncated to the
    /// smallest currency unit. The last week absorbs whatever the truncation left
    /// over, so the installments always add up to `total_amount`.
    pub fn new(id: u32, terms: LoanTerms) -> Result<Self> {
        let principal = Money::new(terms.principal);
        if !principal.is_positive() {
            return Err(LedgerError::InvalidTerms(
                "Principal must be positive".to_string(),
            ));
        }
        if terms.total_weeks == 0 {
            return Err(LedgerError::InvalidTerms(
                "Term must be at least one week".to_string(),
            ));
        }
        let interest_rate = InterestRate::try_from(terms.interest_rate)?;

        let total_amount = interest_rate
            .apply_to(principal)
            .ok_or_else(|| LedgerError::InvalidTerms("Total amount overflows".to_string()))?;
        let weekly_installment = total_amount
            .share_of(terms.total_weeks)
            .filter(Money::is_positive)
            .ok_or_else(|| {
                LedgerError::InvalidTerms(
                    "Weekly installment is below the smallest currency unit".to_string(),
                )
            })?;
        let final_installment = weekly_installment
            .checked_times(terms.total_weeks - 1)
            .map(|scheduled| total_amount - scheduled)
            .ok_or_else(|| LedgerError::InvalidTerms("Schedule overflows".to_string()))?;

        Ok(Self {
            id,
            principal,
            interest_rate,
            total_amount,
            weekly_installment,
            final_installment,
            outstanding: total_amount,
            total_weeks: terms.total_weeks,
            current_week: 0,
            start_date: Utc::now(),
            payments: BTreeMap::new(),
        })
    }

    /// Opens the next billing week.
    pub fn advance_week(&mut self) -> Result<()> {
        if self.current_week >= self.total_weeks {
            return Err(LedgerError::TermExceeded {
                total_weeks: self.total_weeks,
            });
        }
        self.current_week += 1;
        Ok(())
    }

    /// Records a payment against the oldest unpaid week, stamped with the current time.
    ///
    /// Returns the week the payment was applied to.
    pub fn record_payment(&mut self, amount: Money) -> Result<u32> {
        self.record_payment_at(amount, Utc::now())
    }

    /// Same as [`Loan::record_payment`] with an explicit timestamp.
    pub fn record_payment_at(&mut self, amount: Money, paid_at: DateTime<Utc>) -> Result<u32> {
        let target = self.oldest_unpaid_week();
        let expected = target
            .and_then(|week| self.installment_due(week))
            .unwrap_or(self.weekly_installment);
        if amount != expected {
            return Err(LedgerError::InvalidAmount {
                expected: expected.value(),
                actual: amount.value(),
            });
        }

        let week = target.ok_or(LedgerError::NoUnpaidWeeks)?;
        self.payments.insert(
            week,
            Payment {
                week,
                amount,
                paid_at,
            },
        );
        self.outstanding -= amount;
        Ok(week)
    }

    pub fn outstanding(&self) -> Money {
        self.outstanding
    }

    /// True when the two most recent opened weeks are both unpaid.
    ///
    /// Only the unpaid run leading back from the current week counts; a paid week
    /// ends the scan, so older gaps are ignored.
    pub fn is_delinquent(&self) -> bool {
        (1..=self.current_week)
            .rev()
            .take_while(|week| !self.is_paid(*week))
            .take(DELINQUENCY_STREAK)
            .count()
            >= DELINQUENCY_STREAK
    }

    /// Amount due for `week`, or `None` outside the term.
    pub fn installment_due(&self, week: u32) -> Option<Money> {
        match week {
            0 => None,
            w if w < self.total_weeks => Some(self.weekly_installment),
            w if w == self.total_weeks => Some(self.final_installment),
            _ => None,
        }
    }

    pub fn oldest_unpaid_week(&self) -> Option<u32> {
        (1..=self.current_week).find(|week| !self.is_paid(*week))
    }

    pub fn is_paid(&self, week: u32) -> bool {
        self.payment(week).is_some()
    }

    pub fn payment(&self, week: u32) -> Option<&Payment> {
        self.payments.get(&week)
    }

    pub fn paid_weeks(&self) -> usize {
        self.payments.len()
    }

    /// Opened weeks that have no payment yet.
    pub fn missed_weeks(&self) -> usize {
        (1..=self.current_week)
            .filter(|week| !self.is_paid(*week))
            .count()
    }

    pub fn total_paid(&self) -> Money {
        self.payments
            .values()
            .fold(Money::ZERO, |acc, payment| acc + payment.amount)
    }

    pub fn is_settled(&self) -> bool {
        self.current_week == self.total_weeks && self.paid_weeks() == self.total_weeks as usize
    }

    pub fn status(&self) -> LoanStatus {
        if self.is_settled() {
            LoanStatus::Settled
        } else if self.current_week == 0 {
            LoanStatus::Pending
        } else if self.is_delinquent() {
            LoanStatus::Delinquent
        } else {
            LoanStatus::Current
        }
    }

    /// The full repayment schedule, week 1 first.
    pub fn schedule(&self) -> impl Iterator<Item = Installment<'_>> {
        (1..=self.total_weeks).filter_map(move |week| {
            Some(Installment {
                week,
                due: self.installment_due(week)?,
                payment: self.payment(week),
            })
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn interest_rate(&self) -> InterestRate {
        self.interest_rate
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn weekly_installment(&self) -> Money {
        self.weekly_installment
    }

    pub fn total_weeks(&self) -> u32 {
        self.total_weeks
    }

    pub fn current_week(&self) -> u32 {
        self.current_week
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }
}
