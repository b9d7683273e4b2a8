//! The funds-transfer engine.
//!
//! Transfers follow a two-phase protocol: [`TransferEngine::initiate`]
//! validates the request against the current snapshot and returns a
//! [`PendingTransfer`]; nothing moves until an explicit confirmation
//! calls [`TransferEngine::execute`]. The first submit never mutates a
//! balance.
//!
//! The engine also owns the beneficiary list. Beneficiaries are
//! session-local by design: seeded with three defaults, extensible
//! in-memory, never persisted with the `User` snapshot.

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    LedgerError, LedgerResult, Money, User,
    transactions::{Transaction, TransactionKind, TransferDetails},
};

/// Name + IBAN pair a transfer can be addressed to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub name: String,
    pub iban: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    /// "Ponctuel": executes immediately against the ledger.
    #[default]
    Immediate,
    /// "Programmé": accepted and acknowledged, no ledger effect.
    Scheduled,
    /// "Permanent": accepted and acknowledged, no ledger effect.
    Recurring,
}

impl TransferKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "ponctuel",
            Self::Scheduled => "programme",
            Self::Recurring => "permanent",
        }
    }
}

impl TryFrom<&str> for TransferKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "ponctuel" => Ok(Self::Immediate),
            "programme" => Ok(Self::Scheduled),
            "permanent" => Ok(Self::Recurring),
            other => Err(LedgerError::KeyNotFound(format!(
                "invalid transfer kind: {other}"
            ))),
        }
    }
}

/// A validated transfer waiting for its confirmation step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTransfer {
    pub beneficiary: Beneficiary,
    pub amount: Money,
    pub kind: TransferKind,
    pub reason: Option<String>,
    pub notify_email: Option<String>,
}

/// Result of confirming a [`PendingTransfer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Immediate transfer applied: the caller persists `user` and owns
    /// the receipt/notification side effects.
    Executed {
        user: User,
        transaction: Transaction,
    },
    /// Scheduled and recurring orders are acknowledged only; the
    /// ledger is untouched.
    Acknowledged { kind: TransferKind },
}

/// Validates and executes funds transfers against a `User` snapshot.
pub struct TransferEngine {
    beneficiaries: Vec<Beneficiary>,
}

impl Default for TransferEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferEngine {
    /// Engine seeded with the default beneficiaries.
    #[must_use]
    pub fn new() -> Self {
        Self {
            beneficiaries: vec![
                Beneficiary {
                    name: "Alice Martin".to_string(),
                    iban: "FR7630004000050000123456789".to_string(),
                },
                Beneficiary {
                    name: "Propriétaire Logement".to_string(),
                    iban: "FR7630003000010000987654321".to_string(),
                },
                Beneficiary {
                    name: "Paul Durand".to_string(),
                    iban: "FR7630002000030000543210987".to_string(),
                },
            ],
        }
    }

    #[must_use]
    pub fn beneficiaries(&self) -> &[Beneficiary] {
        &self.beneficiaries
    }

    /// Adds a session-local beneficiary.
    pub fn add_beneficiary(&mut self, name: &str, iban: &str) -> LedgerResult<&Beneficiary> {
        let name = name.trim();
        let iban = iban.trim();
        if name.is_empty() || iban.is_empty() {
            return Err(LedgerError::InvalidBeneficiary(
                "name and IBAN are required".to_string(),
            ));
        }
        if self.beneficiaries.iter().any(|b| b.iban == iban) {
            return Err(LedgerError::ExistingKey(iban.to_string()));
        }

        self.beneficiaries.push(Beneficiary {
            name: name.to_string(),
            iban: iban.to_string(),
        });
        Ok(&self.beneficiaries[self.beneficiaries.len() - 1])
    }

    /// Validates a transfer request against the current snapshot.
    ///
    /// Rules run in order and fail fast: known beneficiary, amount
    /// parses and is `> 0`, amount does not exceed the checking-account
    /// balance (the debit account is always `courant`), notification
    /// email has a plausible shape when given. On success nothing is
    /// mutated yet; the returned [`PendingTransfer`] goes through
    /// [`execute`](Self::execute) after user confirmation.
    pub fn initiate(
        &self,
        user: &User,
        beneficiary_iban: &str,
        amount: &str,
        kind: TransferKind,
        reason: Option<&str>,
        notify_email: Option<&str>,
    ) -> LedgerResult<PendingTransfer> {
        let beneficiary = self
            .beneficiaries
            .iter()
            .find(|b| b.iban == beneficiary_iban)
            .ok_or_else(|| LedgerError::UnknownBeneficiary(beneficiary_iban.to_string()))?;

        let amount: Money = amount.parse()?;
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }

        let balance = user.accounts.courant.balance;
        if amount > balance {
            return Err(LedgerError::InsufficientFunds(format!(
                "balance is {balance}, requested {amount}"
            )));
        }

        let notify_email = match notify_email.map(str::trim).filter(|e| !e.is_empty()) {
            None => None,
            Some(email) => {
                if !has_email_shape(email) {
                    return Err(LedgerError::InvalidEmail(email.to_string()));
                }
                Some(email.to_string())
            }
        };

        Ok(PendingTransfer {
            beneficiary: beneficiary.clone(),
            amount,
            kind,
            reason: reason
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            notify_email,
        })
    }

    /// Confirms a pending transfer.
    ///
    /// Only the immediate kind touches the ledger: the checking-account
    /// balance drops by the amount and a new debit transaction is
    /// prepended (most-recent-first order, no re-sorting). The updated
    /// snapshot is returned, not persisted; the caller saves it and
    /// then fires the receipt side effects.
    #[must_use]
    pub fn execute(&self, user: &User, pending: &PendingTransfer) -> TransferOutcome {
        if pending.kind != TransferKind::Immediate {
            tracing::info!(
                kind = pending.kind.as_str(),
                "transfer order acknowledged without ledger effect"
            );
            return TransferOutcome::Acknowledged { kind: pending.kind };
        }

        let now = Local::now();
        let transaction = Transaction {
            // Unique within a session; same-instant collisions accepted.
            id: Some(format!("TX-{}", Utc::now().timestamp_millis())),
            description: format!("Virement à {}", pending.beneficiary.name),
            date: now.format("%d/%m/%Y").to_string(),
            amount: -pending.amount,
            kind: TransactionKind::Debit,
            details: Some(TransferDetails {
                reason: pending
                    .reason
                    .clone()
                    .unwrap_or_else(|| "Non spécifié".to_string()),
                recipient_name: pending.beneficiary.name.clone(),
                recipient_iban: pending.beneficiary.iban.clone(),
                sender_name: user.name.clone(),
                sender_iban: user
                    .accounts
                    .courant
                    .iban
                    .clone()
                    .unwrap_or_else(|| "N/A".to_string()),
                recipient_email: pending.notify_email.clone(),
            }),
        };

        let mut updated = user.clone();
        updated.accounts.courant.balance -= pending.amount;
        updated.transactions.insert(0, transaction.clone());

        tracing::info!(
            amount = %pending.amount,
            recipient = %pending.beneficiary.name,
            "transfer executed"
        );
        TransferOutcome::Executed {
            user: updated,
            transaction,
        }
    }
}

/// Minimal email-shape check, equivalent to `\S+@\S+\.\S+`.
fn has_email_shape(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((head, tail)) => !head.is_empty() && !tail.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::default_user;

    const ALICE_IBAN: &str = "FR7630004000050000123456789";

    fn pending(engine: &TransferEngine, user: &User, amount: &str) -> PendingTransfer {
        engine
            .initiate(user, ALICE_IBAN, amount, TransferKind::Immediate, None, None)
            .unwrap()
    }

    #[test]
    fn initiate_rejects_unknown_beneficiary_first() {
        let engine = TransferEngine::new();
        let user = default_user();

        // Amount is garbage too, but the beneficiary rule wins.
        let err = engine
            .initiate(&user, "FR00", "nope", TransferKind::Immediate, None, None)
            .unwrap_err();
        assert_eq!(err, LedgerError::UnknownBeneficiary("FR00".to_string()));
    }

    #[test]
    fn initiate_rejects_non_positive_amounts() {
        let engine = TransferEngine::new();
        let user = default_user();

        assert!(matches!(
            engine.initiate(&user, ALICE_IBAN, "0", TransferKind::Immediate, None, None),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            engine.initiate(&user, ALICE_IBAN, "-5", TransferKind::Immediate, None, None),
            Err(LedgerError::InvalidAmount(_))
        ));
        // Smallest representable positive amount passes.
        assert_eq!(pending(&engine, &user, "0.01").amount, Money::new(1));
    }

    #[test]
    fn initiate_allows_exactly_the_balance_and_not_a_cent_more() {
        let engine = TransferEngine::new();
        let user = default_user();

        assert_eq!(
            pending(&engine, &user, "2560545.22").amount,
            user.accounts.courant.balance
        );
        assert!(matches!(
            engine.initiate(
                &user,
                ALICE_IBAN,
                "2560545.23",
                TransferKind::Immediate,
                None,
                None
            ),
            Err(LedgerError::InsufficientFunds(_))
        ));
    }

    #[test]
    fn initiate_checks_email_shape_last() {
        let engine = TransferEngine::new();
        let user = default_user();

        let err = engine
            .initiate(
                &user,
                ALICE_IBAN,
                "10",
                TransferKind::Immediate,
                None,
                Some("not-an-email"),
            )
            .unwrap_err();
        assert_eq!(err, LedgerError::InvalidEmail("not-an-email".to_string()));

        // Empty email means "no notification", not an error.
        assert!(
            engine
                .initiate(
                    &user,
                    ALICE_IBAN,
                    "10",
                    TransferKind::Immediate,
                    None,
                    Some("  ")
                )
                .is_ok()
        );
    }

    #[test]
    fn initiate_does_not_mutate_anything() {
        let engine = TransferEngine::new();
        let user = default_user();
        let before = user.clone();

        let _ = pending(&engine, &user, "500");
        assert_eq!(user, before);
    }

    #[test]
    fn execute_debits_balance_and_prepends_transaction() {
        let engine = TransferEngine::new();
        let user = default_user();
        let pending = engine
            .initiate(
                &user,
                ALICE_IBAN,
                "500",
                TransferKind::Immediate,
                Some("Loyer"),
                None,
            )
            .unwrap();

        let TransferOutcome::Executed {
            user: updated,
            transaction,
        } = engine.execute(&user, &pending)
        else {
            panic!("immediate transfer must execute");
        };

        assert_eq!(
            updated.accounts.courant.balance,
            user.accounts.courant.balance - Money::new(50_000)
        );
        assert_eq!(updated.transactions[0], transaction);
        assert_eq!(updated.transactions.len(), user.transactions.len() + 1);
        assert_eq!(transaction.amount, Money::new(-50_000));
        assert_eq!(transaction.kind, TransactionKind::Debit);

        let details = transaction.details.as_ref().unwrap();
        assert_eq!(details.reason, "Loyer");
        assert_eq!(details.recipient_name, "Alice Martin");
        assert_eq!(details.sender_name, user.name);
    }

    #[test]
    fn execute_defaults_the_reason() {
        let engine = TransferEngine::new();
        let user = default_user();
        let pending = engine
            .initiate(
                &user,
                ALICE_IBAN,
                "10",
                TransferKind::Immediate,
                Some("   "),
                None,
            )
            .unwrap();

        let TransferOutcome::Executed { transaction, .. } = engine.execute(&user, &pending) else {
            panic!("immediate transfer must execute");
        };
        assert_eq!(transaction.details.unwrap().reason, "Non spécifié");
    }

    #[test]
    fn scheduled_and_recurring_only_acknowledge() {
        let engine = TransferEngine::new();
        let user = default_user();

        for kind in [TransferKind::Scheduled, TransferKind::Recurring] {
            let pending = engine
                .initiate(&user, ALICE_IBAN, "500", kind, None, None)
                .unwrap();
            assert_eq!(
                engine.execute(&user, &pending),
                TransferOutcome::Acknowledged { kind }
            );
        }
    }

    #[test]
    fn beneficiaries_are_session_local_and_extensible() {
        let mut engine = TransferEngine::new();
        assert_eq!(engine.beneficiaries().len(), 3);

        engine.add_beneficiary("Chloé Petit", "FR7630001000011111111111111").unwrap();
        assert_eq!(engine.beneficiaries().len(), 4);

        assert_eq!(
            engine.add_beneficiary(" ", "FR76"),
            Err(LedgerError::InvalidBeneficiary(
                "name and IBAN are required".to_string()
            ))
        );
        assert!(matches!(
            engine.add_beneficiary("Alice encore", ALICE_IBAN),
            Err(LedgerError::ExistingKey(_))
        ));
    }
}
