//! Monetary amount.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A strictly positive amount, in the smallest currency unit.
///
/// Non-positive amounts are rejected at construction with
/// [`DomainError::InvalidAmount`], so every `Amount` in the system is valid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u64")]
pub struct Amount(u64);

impl Amount {
    pub fn new(value: i64) -> DomainResult<Self> {
        if value <= 0 {
            return Err(DomainError::InvalidAmount(value));
        }
        Ok(Self(value as u64))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl TryFrom<i64> for Amount {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for u64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl core::fmt::Display for Amount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn positive_amount_is_accepted() {
        assert_eq!(Amount::new(100).unwrap().value(), 100);
    }

    #[test]
    fn zero_is_rejected() {
        assert_eq!(Amount::new(0), Err(DomainError::InvalidAmount(0)));
    }

    #[test]
    fn deserializing_negative_amount_fails() {
        let parsed: Result<Amount, _> = serde_json::from_str("-5");
        assert!(parsed.is_err());
    }

    proptest! {
        #[test]
        fn non_positive_amounts_never_construct(value in i64::MIN..=0i64) {
            prop_assert_eq!(Amount::new(value), Err(DomainError::InvalidAmount(value)));
        }

        #[test]
        fn positive_amounts_keep_their_value(value in 1i64..=i64::MAX) {
            prop_assert_eq!(Amount::new(value).unwrap().value(), value as u64);
        }
    }
}
