//! Category kinds, the starter set seeded for new accounts, and color rules.

use serde::{Deserialize, Serialize};

/// Color assigned when a category is created without one.
pub const DEFAULT_COLOR: &str = "#000000";

/// Direction of the money a category classifies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Money going out.
    #[default]
    Expense,
    /// Money coming in.
    Income,
}

impl CategoryType {
    /// Returns the wire/storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl std::fmt::Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            _ => Err(format!("\"{s}\" is not a valid choice.")),
        }
    }
}

/// A category every new account starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultCategory {
    /// Category name.
    pub name: &'static str,
    /// Category kind.
    pub kind: CategoryType,
    /// Display color.
    pub color: &'static str,
}

/// Starter categories, created with get-or-create semantics on registration.
pub const DEFAULT_CATEGORIES: [DefaultCategory; 5] = [
    DefaultCategory {
        name: "Food",
        kind: CategoryType::Expense,
        color: "#FF7043",
    },
    DefaultCategory {
        name: "Transportation",
        kind: CategoryType::Expense,
        color: "#4FC3F7",
    },
    DefaultCategory {
        name: "Utilities",
        kind: CategoryType::Expense,
        color: "#9E9E9E",
    },
    DefaultCategory {
        name: "Entertainment",
        kind: CategoryType::Expense,
        color: "#BA68C8",
    },
    DefaultCategory {
        name: "Income",
        kind: CategoryType::Income,
        color: "#66BB6A",
    },
];

/// Returns true for `#RRGGBB` hex colors.
#[must_use]
pub fn is_valid_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color.chars().skip(1).all(|c| c.is_ascii_hexdigit())
}
