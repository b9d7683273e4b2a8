//! The `User` snapshot: the single customer record the whole
//! application reads and replaces.
//!
//! There is exactly one user per store. Every mutation (transfer, card
//! control) produces a whole new snapshot which the caller persists via
//! [`LedgerStore::save`]; no partial-field update exists.
//!
//! [`LedgerStore::save`]: crate::LedgerStore::save

use serde::{Deserialize, Serialize};

use crate::{
    Money,
    cards::{Card, CardKind, CardLimits, Limit},
    transactions::Transaction,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub balance: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
}

/// The two fixed accounts of the retail offer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accounts {
    pub courant: Account,
    pub livret_a: Account,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login identifier (the "client id").
    pub id: String,
    pub secret_code: String,
    pub name: String,
    pub accounts: Accounts,
    pub cards: Vec<Card>,
    pub transactions: Vec<Transaction>,
}

impl User {
    /// Plain string comparison against the stored record. This is a
    /// simulated bank: no hashing, no rate limiting.
    #[must_use]
    pub fn verify_credentials(&self, client_id: &str, secret_code: &str) -> bool {
        client_id == self.id && secret_code == self.secret_code
    }
}

/// The built-in snapshot used on first load and after a corrupted read.
#[must_use]
pub fn default_user() -> User {
    User {
        id: "2812199920".to_string(),
        secret_code: "668877".to_string(),
        name: "Philip Leroux".to_string(),
        accounts: Accounts {
            courant: Account {
                name: "Compte Courant".to_string(),
                balance: Money::new(256_054_522),
                iban: Some("FR76 1020 7001 2345 6789 0123 456".to_string()),
            },
            livret_a: Account {
                name: "Livret A".to_string(),
                balance: Money::new(1_205_021),
                iban: Some("FR76 1020 7001 9876 5432 1098 765".to_string()),
            },
        },
        cards: vec![
            Card {
                id: "card-1".to_string(),
                kind: CardKind::VisaPremier,
                number: "4978 **** **** 8821".to_string(),
                expiry: "12/26".to_string(),
                holder_name: "Philip Leroux".to_string(),
                pin: Some("1234".to_string()),
                limits: CardLimits {
                    payment: Limit::new(300_000, 500_000),
                    withdrawal: Limit::new(100_000, 200_000),
                },
                contactless: true,
                online_payment: true,
                foreign_payment: false,
                blocked: false,
            },
            Card {
                id: "card-2".to_string(),
                kind: CardKind::MastercardGold,
                number: "5578 **** **** 1234".to_string(),
                expiry: "08/25".to_string(),
                holder_name: "Philip Leroux".to_string(),
                pin: Some("5678".to_string()),
                limits: CardLimits {
                    payment: Limit::new(500_000, 1_000_000),
                    withdrawal: Limit::new(200_000, 300_000),
                },
                contactless: true,
                online_payment: true,
                foreign_payment: true,
                blocked: false,
            },
        ],
        transactions: vec![
            Transaction::seed("tx-default-1", "Achat en ligne Amazon", "25/07/2024", -4999),
            Transaction::seed(
                "tx-default-2",
                "Virement entrant - Salaire",
                "25/07/2024",
                215_000,
            ),
            Transaction::seed("tx-default-3", "Prélèvement Spotify", "24/07/2024", -1099),
            Transaction::seed(
                "tx-default-4",
                "Restaurant 'Le Gourmet'",
                "22/07/2024",
                -8550,
            ),
            Transaction::seed("tx-default-5", "Remboursement ami", "21/07/2024", 3000),
            Transaction::seed("tx-default-6", "Courses alimentaires", "20/07/2024", -12_430),
        ],
    }
}
