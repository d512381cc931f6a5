//! Application layer orchestrating the loan ledger.
//!
//! `LoanLedger` is the entry point for replaying repayment events against a
//! single loan and for producing its reporting summary.

pub mod ledger;
