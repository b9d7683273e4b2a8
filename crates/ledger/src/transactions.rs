//! Transaction primitives.
//!
//! A `Transaction` is one line of the account history. The list on the
//! `User` snapshot is insertion-ordered, most recent first; the `date`
//! field is a display string (`dd/mm/yyyy`) and is never re-sorted.

use serde::{Deserialize, Serialize};

use crate::{LedgerError, Money};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            other => Err(LedgerError::KeyNotFound(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// Extra information attached to transfer-originated transactions.
///
/// Plain account movements (card payments, salary, direct debits) carry
/// no details; only the transfer engine fills this in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDetails {
    pub reason: String,
    pub recipient_name: String,
    pub recipient_iban: String,
    pub sender_name: String,
    pub sender_iban: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_email: Option<String>,
}

/// One entry of the account history.
///
/// `kind` is redundant with the sign of `amount` but stays the
/// authoritative value for display; constructors set both consistently.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub description: String,
    pub date: String,
    pub amount: Money,
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<TransferDetails>,
}

impl Transaction {
    /// Seed entry without details, used by the default snapshot.
    pub(crate) fn seed(id: &str, description: &str, date: &str, amount_cents: i64) -> Self {
        let amount = Money::new(amount_cents);
        Self {
            id: Some(id.to_string()),
            description: description.to_string(),
            date: date.to_string(),
            amount,
            kind: if amount.is_negative() {
                TransactionKind::Debit
            } else {
                TransactionKind::Credit
            },
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_as_str() {
        for kind in [TransactionKind::Credit, TransactionKind::Debit] {
            assert_eq!(TransactionKind::try_from(kind.as_str()).unwrap(), kind);
        }
        assert!(TransactionKind::try_from("wire").is_err());
    }

    #[test]
    fn seed_sets_kind_from_sign() {
        let debit = Transaction::seed("tx-1", "Achat", "25/07/2024", -4999);
        assert_eq!(debit.kind, TransactionKind::Debit);
        let credit = Transaction::seed("tx-2", "Salaire", "25/07/2024", 215_000);
        assert_eq!(credit.kind, TransactionKind::Credit);
    }
}
