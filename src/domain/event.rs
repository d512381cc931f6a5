use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum LedgerEventType {
    /// Opens the next billing week.
    Advance,
    /// Pays the oldest unpaid week.
    Pay,
}

/// A single step of a repayment script.
///
/// `amount` only matters for payments; a payment without one settles whatever
/// installment is currently due.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct LedgerEvent {
    pub r#type: LedgerEventType,
    pub amount: Option<Decimal>,
}

impl LedgerEvent {
    pub fn advance() -> Self {
        Self {
            r#type: LedgerEventType::Advance,
            amount: None,
        }
    }

    pub fn pay(amount: Decimal) -> Self {
        Self {
            r#type: LedgerEventType::Pay,
            amount: Some(amount),
        }
    }

    pub fn pay_due() -> Self {
        Self {
            r#type: LedgerEventType::Pay,
            amount: None,
        }
    }
}
