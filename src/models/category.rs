//! Transaction categories
//!
//! A fixed enumeration of spending and income purposes. Which categories a
//! transaction may carry depends on whether it is income or an expense.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::transaction::TransactionKind;

/// The purpose of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transportation,
    Entertainment,
    Shopping,
    Utilities,
    Healthcare,
    Education,
    Savings,
    Salary,
    Freelance,
    Investment,
    Other,
}

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Category; 12] = [
        Category::Food,
        Category::Transportation,
        Category::Entertainment,
        Category::Shopping,
        Category::Utilities,
        Category::Healthcare,
        Category::Education,
        Category::Savings,
        Category::Salary,
        Category::Freelance,
        Category::Investment,
        Category::Other,
    ];

    /// Categories offered for expenses
    pub const EXPENSE: [Category; 8] = [
        Category::Food,
        Category::Transportation,
        Category::Entertainment,
        Category::Shopping,
        Category::Utilities,
        Category::Healthcare,
        Category::Education,
        Category::Other,
    ];

    /// Categories offered for income
    pub const INCOME: [Category; 4] = [
        Category::Salary,
        Category::Freelance,
        Category::Investment,
        Category::Other,
    ];

    /// The serialized, lowercase key
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transportation => "transportation",
            Self::Entertainment => "entertainment",
            Self::Shopping => "shopping",
            Self::Utilities => "utilities",
            Self::Healthcare => "healthcare",
            Self::Education => "education",
            Self::Savings => "savings",
            Self::Salary => "salary",
            Self::Freelance => "freelance",
            Self::Investment => "investment",
            Self::Other => "other",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Food => "Food & Dining",
            Self::Transportation => "Transportation",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Utilities => "Bills & Utilities",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Savings => "Savings",
            Self::Salary => "Salary",
            Self::Freelance => "Freelance",
            Self::Investment => "Investment",
            Self::Other => "Other",
        }
    }

    /// Whether this category may be used for the given transaction kind
    pub fn allowed_for(&self, kind: TransactionKind) -> bool {
        match kind {
            TransactionKind::Expense => Self::EXPENSE.contains(self),
            TransactionKind::Income => Self::INCOME.contains(self),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when a category name is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Matches either the key ("utilities") or the label ("Bills & Utilities"),
    /// ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == needle || c.label().to_lowercase() == needle)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_and_label() {
        assert_eq!("food".parse::<Category>().unwrap(), Category::Food);
        assert_eq!("FOOD".parse::<Category>().unwrap(), Category::Food);
        assert_eq!(
            "Bills & Utilities".parse::<Category>().unwrap(),
            Category::Utilities
        );
        assert!("groceries".parse::<Category>().is_err());
    }

    #[test]
    fn test_allowed_for_kind() {
        assert!(Category::Food.allowed_for(TransactionKind::Expense));
        assert!(!Category::Food.allowed_for(TransactionKind::Income));
        assert!(Category::Salary.allowed_for(TransactionKind::Income));
        assert!(!Category::Salary.allowed_for(TransactionKind::Expense));
        assert!(Category::Other.allowed_for(TransactionKind::Income));
        assert!(Category::Other.allowed_for(TransactionKind::Expense));
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Transportation).unwrap();
        assert_eq!(json, "\"transportation\"");
    }

    #[test]
    fn test_every_key_round_trips_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }
}
