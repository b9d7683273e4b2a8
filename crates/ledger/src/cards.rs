//! Payment cards and the card control operations.
//!
//! Controls follow the read-validate-replace pattern of the transfer
//! engine: each operation takes the current `User` snapshot and returns
//! a new one with exactly one card changed, leaving persistence to the
//! caller.

use serde::{Deserialize, Serialize};

use crate::{LedgerError, LedgerResult, Money, User};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    #[serde(rename = "Visa Premier")]
    VisaPremier,
    #[serde(rename = "Mastercard Gold")]
    MastercardGold,
}

impl CardKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VisaPremier => "Visa Premier",
            Self::MastercardGold => "Mastercard Gold",
        }
    }
}

/// One adjustable ceiling: `current` moves, `max` is fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    pub current: Money,
    pub max: Money,
}

impl Limit {
    pub const fn new(current_cents: i64, max_cents: i64) -> Self {
        Self {
            current: Money::new(current_cents),
            max: Money::new(max_cents),
        }
    }

    /// Clamps `current` into `[0, max]`, keeping `max` untouched.
    fn clamped(self) -> Self {
        Self {
            current: self.current.clamp(Money::ZERO, self.max),
            max: self.max,
        }
    }
}

/// Independent payment and withdrawal ceilings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardLimits {
    pub payment: Limit,
    pub withdrawal: Limit,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub kind: CardKind,
    /// Masked number, e.g. `4978 **** **** 8821`.
    pub number: String,
    pub expiry: String,
    pub holder_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
    pub limits: CardLimits,
    pub contactless: bool,
    pub online_payment: bool,
    pub foreign_payment: bool,
    /// Set once by [`set_lock`]; there is no unlock operation
    /// ("l'opposition est définitive").
    #[serde(default)]
    pub blocked: bool,
}

fn card_position(user: &User, card_id: &str) -> LedgerResult<usize> {
    user.cards
        .iter()
        .position(|card| card.id == card_id)
        .ok_or_else(|| LedgerError::KeyNotFound(card_id.to_string()))
}

/// Replaces the limits of one card, leaving every other card untouched.
///
/// Both `current` values are clamped into `[0, max]`; the UI slider
/// already enforces the range, the core enforces it again.
pub fn set_limits(user: &User, card_id: &str, new_limits: CardLimits) -> LedgerResult<User> {
    let index = card_position(user, card_id)?;

    let mut updated = user.clone();
    updated.cards[index].limits = CardLimits {
        payment: new_limits.payment.clamped(),
        withdrawal: new_limits.withdrawal.clamped(),
    };
    Ok(updated)
}

/// Blocks a card for good ("faire opposition").
///
/// The operation is irreversible within the model: no unlock exists,
/// and blocking an already blocked card is an error.
pub fn set_lock(user: &User, card_id: &str) -> LedgerResult<User> {
    let index = card_position(user, card_id)?;
    if user.cards[index].blocked {
        return Err(LedgerError::CardBlocked(card_id.to_string()));
    }

    let mut updated = user.clone();
    updated.cards[index].blocked = true;
    Ok(updated)
}

/// Read-only PIN disclosure, gated on the user's secret code.
pub fn reveal_pin<'a>(user: &'a User, card_id: &str, secret_code: &str) -> LedgerResult<&'a str> {
    if secret_code != user.secret_code {
        return Err(LedgerError::AccessDenied("wrong secret code".to_string()));
    }
    let index = card_position(user, card_id)?;
    user.cards[index]
        .pin
        .as_deref()
        .ok_or_else(|| LedgerError::KeyNotFound(format!("no PIN on file for {card_id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::default_user;

    #[test]
    fn set_limits_touches_only_the_target_card() {
        let user = default_user();
        let before_other = user.cards[1].clone();

        let updated = set_limits(
            &user,
            "card-1",
            CardLimits {
                payment: Limit::new(150_000, 500_000),
                withdrawal: Limit::new(50_000, 200_000),
            },
        )
        .unwrap();

        assert_eq!(updated.cards[0].limits.payment.current, Money::new(150_000));
        assert_eq!(updated.cards[1], before_other);
        // Everything else on the target card is untouched.
        assert_eq!(updated.cards[0].number, user.cards[0].number);
    }

    #[test]
    fn set_limits_clamps_into_bounds() {
        let user = default_user();
        let max = user.cards[0].limits.payment.max;

        let updated = set_limits(
            &user,
            "card-1",
            CardLimits {
                payment: Limit {
                    current: max + Money::new(100_000),
                    max,
                },
                withdrawal: Limit {
                    current: Money::new(-1),
                    max: user.cards[0].limits.withdrawal.max,
                },
            },
        )
        .unwrap();

        assert_eq!(updated.cards[0].limits.payment.current, max);
        assert_eq!(updated.cards[0].limits.withdrawal.current, Money::ZERO);
    }

    #[test]
    fn set_lock_is_definitive() {
        let user = default_user();
        let locked = set_lock(&user, "card-2").unwrap();
        assert!(locked.cards[1].blocked);
        assert!(!locked.cards[0].blocked);
        assert_eq!(
            set_lock(&locked, "card-2"),
            Err(LedgerError::CardBlocked("card-2".to_string()))
        );
    }

    #[test]
    fn reveal_pin_requires_secret_code() {
        let user = default_user();
        assert_eq!(reveal_pin(&user, "card-1", &user.secret_code), Ok("1234"));
        assert_eq!(
            reveal_pin(&user, "card-1", "000000"),
            Err(LedgerError::AccessDenied("wrong secret code".to_string()))
        );
    }

    #[test]
    fn unknown_card_is_reported() {
        let user = default_user();
        assert_eq!(
            set_lock(&user, "card-9"),
            Err(LedgerError::KeyNotFound("card-9".to_string()))
        );
    }
}
