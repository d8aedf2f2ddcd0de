//! Keyword-based transaction categorization
//!
//! Imported bank descriptions such as `"STARBUCKS COFFEE #1234"` are matched
//! against an ordered rule table. The first rule with a keyword occurring in
//! the uppercased description decides the category; when nothing matches the
//! result is [`Category::Other`].
//!
//! The table is plain data so it can be tested on its own and replaced from
//! settings.

use serde::{Deserialize, Serialize};

use crate::models::Category;

/// One row of the rule table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    /// Build a rule; keywords are uppercased and blank ones dropped
    pub fn new<I, S>(category: Category, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            category,
            keywords: keywords
                .into_iter()
                .map(Into::into)
                .map(|k| k.trim().to_uppercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Whether any keyword occurs in an already uppercased description
    fn matches(&self, upper: &str) -> bool {
        self.keywords.iter().any(|k| upper.contains(k.as_str()))
    }
}

/// Built-in rule table, in priority order
pub fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(
            Category::Food,
            [
                "STARBUCKS",
                "COFFEE",
                "CAFE",
                "RESTAURANT",
                "MCDONALD",
                "CHIPOTLE",
                "PIZZA",
                "BURGER",
                "GROCERY",
                "WHOLE FOODS",
                "TRADER JOE",
                "SAFEWAY",
                "KROGER",
                "DOORDASH",
                "GRUBHUB",
                "UBER EATS",
            ],
        ),
        CategoryRule::new(
            Category::Transportation,
            [
                "UBER", "LYFT", "SHELL", "CHEVRON", "EXXON", "GAS STATION", "PARKING", "METRO",
                "TRANSIT", "AIRLINE", "TOLL",
            ],
        ),
        CategoryRule::new(
            Category::Entertainment,
            [
                "NETFLIX",
                "SPOTIFY",
                "HULU",
                "DISNEY",
                "CINEMA",
                "MOVIE",
                "THEATER",
                "STEAM",
                "TICKETMASTER",
            ],
        ),
        CategoryRule::new(
            Category::Shopping,
            ["AMAZON", "TARGET", "WALMART", "BEST BUY", "COSTCO", "EBAY", "IKEA"],
        ),
        CategoryRule::new(
            Category::Utilities,
            [
                "ELECTRIC", "WATER", "INTERNET", "COMCAST", "VERIZON", "AT&T", "UTILITY", "PG&E",
            ],
        ),
        CategoryRule::new(
            Category::Healthcare,
            ["PHARMACY", "CVS", "WALGREENS", "CLINIC", "HOSPITAL", "DENTAL", "MEDICAL"],
        ),
        CategoryRule::new(
            Category::Education,
            ["TUITION", "UNIVERSITY", "COURSERA", "UDEMY", "BOOKSTORE"],
        ),
        CategoryRule::new(
            Category::Salary,
            ["PAYROLL", "SALARY", "DIRECT DEP"],
        ),
        CategoryRule::new(Category::Freelance, ["UPWORK", "FIVERR", "INVOICE"]),
        CategoryRule::new(
            Category::Investment,
            ["DIVIDEND", "INTEREST PAYMENT", "BROKERAGE"],
        ),
    ]
}

/// An ordered rule table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<CategoryRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl RuleSet {
    /// Use `rules` in the given order; keywords are normalized again so rules
    /// deserialized from settings behave like built-in ones
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|r| CategoryRule::new(r.category, r.keywords))
                .collect(),
        }
    }

    /// The configured replacement table, or the built-in one
    pub fn from_settings(rules: Option<&[CategoryRule]>) -> Self {
        match rules {
            Some(rules) => Self::new(rules.to_vec()),
            None => Self::default(),
        }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Category of the first rule matching `description`, else `Other`
    pub fn classify(&self, description: &str) -> Category {
        let upper = description.to_uppercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&upper))
            .map(|rule| rule.category)
            .unwrap_or(Category::Other)
    }
}

/// Classify with the built-in table
pub fn classify(description: &str) -> Category {
    RuleSet::default().classify(description)
}
