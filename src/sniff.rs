//! Heuristic column detection.
//!
//! Ad hoc sales exports never agree on header names, so each dashboard
//! section finds its column by keyword: the first header whose lowercased
//! name contains one of the role's keywords wins. A role with no match is
//! reported, and its section is skipped downstream.

use serde::Serialize;

/// The five column roles the dashboard knows how to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Payment,
    Delivery,
    Category,
    City,
    Price,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Payment,
        Role::Delivery,
        Role::Category,
        Role::City,
        Role::Price,
    ];

    /// Substrings that mark a header as belonging to this role.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Role::Payment => &["payment", "pay"],
            Role::Delivery => &["deliver", "ship", "time"],
            Role::Category => &["product", "category", "item"],
            Role::City => &["city", "location", "address"],
            Role::Price => &["price", "amount", "cost", "total"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Payment => "payment method",
            Role::Delivery => "delivery status",
            Role::Category => "product category",
            Role::City => "city",
            Role::Price => "price",
        }
    }
}

/// Result of sniffing one header list: the matched column index per role.
#[derive(Debug, Default, Clone)]
pub struct SniffedColumns {
    pub payment: Option<usize>,
    pub delivery: Option<usize>,
    pub category: Option<usize>,
    pub city: Option<usize>,
    pub price: Option<usize>,
}

impl SniffedColumns {
    pub fn get(&self, role: Role) -> Option<usize> {
        match role {
            Role::Payment => self.payment,
            Role::Delivery => self.delivery,
            Role::Category => self.category,
            Role::City => self.city,
            Role::Price => self.price,
        }
    }

    /// Roles that found no column, in declaration order.
    pub fn missing(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.get(*role).is_none())
            .collect()
    }

    /// Every role a given column satisfies (one column may serve several).
    pub fn roles_for(&self, idx: usize) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.get(*role) == Some(idx))
            .collect()
    }
}

fn find_column(columns: &[String], role: Role) -> Option<usize> {
    columns.iter().position(|name| {
        let lowered = name.to_lowercase();
        role.keywords().iter().any(|kw| lowered.contains(kw))
    })
}

/// Detects all roles over a header list. Deterministic: first match in
/// column order per role, roles resolved independently.
pub fn sniff_columns(columns: &[String]) -> SniffedColumns {
    SniffedColumns {
        payment: find_column(columns, Role::Payment),
        delivery: find_column(columns, Role::Delivery),
        category: find_column(columns, Role::Category),
        city: find_column(columns, Role::City),
        price: find_column(columns, Role::Price),
    }
}
