mod common;

use microloan::application::ledger::{EventOutcome, LoanLedger};
use microloan::domain::event::LedgerEvent;
use microloan::domain::loan::{LoanStatus, LoanTerms};
use microloan::domain::money::Money;
use microloan::error::LedgerError;
use rust_decimal_macros::dec;

#[test]
fn test_reference_scenario() {
    let mut loan = common::reference_loan();
    assert_eq!(loan.total_amount(), Money::new(dec!(5500000)));
    assert_eq!(loan.weekly_installment(), Money::new(dec!(110000)));
    assert_eq!(loan.outstanding(), loan.total_amount());

    loan.advance_week().unwrap();
    loan.record_payment(Money::new(dec!(110000))).unwrap();
    assert_eq!(loan.outstanding(), Money::new(dec!(5390000)));

    assert!(matches!(
        loan.record_payment(Money::new(dec!(110000))),
        Err(LedgerError::NoUnpaidWeeks)
    ));
    assert_eq!(loan.outstanding(), Money::new(dec!(5390000)));
}

#[test]
fn test_outstanding_tracks_payment_count() {
    let mut loan = common::reference_loan();
    let installment = loan.weekly_installment();

    for paid in 1..=20u32 {
        loan.advance_week().unwrap();
        loan.record_payment(installment).unwrap();
        let expected = loan.total_amount() - installment.checked_times(paid).unwrap();
        assert_eq!(loan.outstanding(), expected);
        assert_eq!(loan.outstanding(), loan.total_amount() - loan.total_paid());
    }
}

#[test]
fn test_catch_up_order_through_ledger() {
    let mut ledger = LoanLedger::from_loan(common::reference_loan());
    ledger.process_event(LedgerEvent::advance()).unwrap();
    ledger.process_event(LedgerEvent::pay(dec!(110000))).unwrap();
    for _ in 0..3 {
        ledger.process_event(LedgerEvent::advance()).unwrap();
    }
    assert_eq!(ledger.loan().oldest_unpaid_week(), Some(2));

    let weeks: Vec<u32> = (0..3)
        .map(|_| match ledger.process_event(LedgerEvent::pay(dec!(110000))) {
            Ok(EventOutcome::Paid { week, .. }) => week,
            other => panic!("unexpected outcome: {:?}", other),
        })
        .collect();
    assert_eq!(weeks, vec![2, 3, 4]);
    assert_eq!(ledger.loan().missed_weeks(), 0);
}

#[test]
fn test_delinquency_and_recovery() {
    let mut loan = common::reference_loan();
    loan.advance_week().unwrap();
    loan.record_payment(loan.weekly_installment()).unwrap();
    loan.advance_week().unwrap();
    loan.advance_week().unwrap();
    assert!(loan.is_delinquent());
    assert_eq!(loan.status(), LoanStatus::Delinquent);

    loan.record_payment(loan.weekly_installment()).unwrap();
    loan.record_payment(loan.weekly_installment()).unwrap();
    assert!(!loan.is_delinquent());
    assert_eq!(loan.status(), LoanStatus::Current);
}

#[test]
fn test_term_limit_and_settlement() {
    let mut ledger = LoanLedger::open(
        2,
        LoanTerms {
            principal: dec!(1000),
            interest_rate: dec!(0.2),
            total_weeks: 4,
        },
    )
    .unwrap();

    for _ in 0..4 {
        ledger.process_event(LedgerEvent::advance()).unwrap();
    }
    assert!(matches!(
        ledger.process_event(LedgerEvent::advance()),
        Err(LedgerError::TermExceeded { total_weeks: 4 })
    ));

    for _ in 0..4 {
        ledger.process_event(LedgerEvent::pay(dec!(300))).unwrap();
    }
    let loan = ledger.into_loan();
    assert!(loan.is_settled());
    assert_eq!(loan.outstanding(), Money::ZERO);
    assert_eq!(loan.status(), LoanStatus::Settled);
}
