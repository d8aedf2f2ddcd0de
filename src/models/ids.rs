//! Strongly-typed integer ID wrappers for all entity types
//!
//! Ids are handed out by the repository that owns the entity. Newtype
//! wrappers keep ids of different entities from being mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw id value
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Get the raw id value
            pub const fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            /// Accepts both `42` and the prefixed display form
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                let s = s.strip_prefix('#').unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(TransactionId, "txn-");
define_id!(BudgetId, "bud-");
define_id!(GoalId, "goal-");
define_id!(BillId, "bill-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(TransactionId::new(12).to_string(), "txn-12");
        assert_eq!(BillId::new(3).to_string(), "bill-3");
    }

    #[test]
    fn test_id_parse_accepts_prefixed_and_bare() {
        assert_eq!("txn-7".parse::<TransactionId>().unwrap(), TransactionId::new(7));
        assert_eq!("7".parse::<TransactionId>().unwrap(), TransactionId::new(7));
        assert_eq!("#7".parse::<GoalId>().unwrap(), GoalId::new(7));
        assert!("txn-x".parse::<TransactionId>().is_err());
    }

    #[test]
    fn test_id_ordering_follows_value() {
        assert!(BudgetId::new(2) < BudgetId::new(10));
    }

    #[test]
    fn test_id_serializes_as_plain_integer() {
        let json = serde_json::to_string(&GoalId::new(5)).unwrap();
        assert_eq!(json, "5");
        let back: GoalId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, GoalId::new(5));
    }
}
