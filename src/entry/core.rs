//! Defines the core data models for diary entries.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::user::UserID;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of an entry, assigned by the store when the entry is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
pub struct EntryId(DatabaseId);

impl EntryId {
    /// Create a new entry ID.
    pub fn new(id: DatabaseId) -> Self {
        Self(id)
    }

    /// Cast the entry ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// What an entry was spent on or earned from.
///
/// Variants are declared in the order used for sorting and for the summary's
/// category breakdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Groceries and eating out.
    Food,
    /// Public transport, fuel, parking.
    Transport,
    /// Going out, subscriptions, hobbies.
    Entertainment,
    /// Power, water, internet, phone.
    Utilities,
    /// Wages and other pay.
    Salary,
    /// Doctors, dentists, medicine.
    Healthcare,
    /// Clothes, electronics, household goods.
    Shopping,
    /// Fees, courses, books.
    Education,
    /// Anything that does not fit the other categories.
    Other,
}

impl Category {
    /// Every category.
    pub const ALL: [Category; 9] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Utilities,
        Category::Salary,
        Category::Healthcare,
        Category::Shopping,
        Category::Education,
        Category::Other,
    ];

    /// The lowercase name used on the wire and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Entertainment => "entertainment",
            Category::Utilities => "utilities",
            Category::Salary => "salary",
            Category::Healthcare => "healthcare",
            Category::Shopping => "shopping",
            Category::Education => "education",
            Category::Other => "other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error returned when parsing an unknown category or entry type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant;

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or(UnknownVariant)
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::Other(format!("invalid category {value:?}").into()))
    }
}

/// Whether money was earned or spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Money earned. Stored with a positive amount.
    Income,
    /// Money spent. Stored with a negative amount.
    Expense,
}

impl EntryType {
    /// The lowercase name used on the wire and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
        }
    }

    /// Give `amount` the sign that belongs to this type, keeping its magnitude.
    ///
    /// The sign of `amount` itself is ignored.
    pub fn signed_amount(self, amount: Decimal) -> Decimal {
        match self {
            EntryType::Income => amount.abs(),
            EntryType::Expense => -amount.abs(),
        }
    }
}

impl Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(EntryType::Income),
            "expense" => Ok(EntryType::Expense),
            _ => Err(UnknownVariant),
        }
    }
}

impl ToSql for EntryType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for EntryType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::Other(format!("invalid entry type {value:?}").into()))
    }
}

/// A dated income or expense recorded by a user.
///
/// Entries are created through [crate::EntryService::create], which enforces
/// that `amount` is positive for income and negative for expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// The ID of the entry.
    pub id: EntryId,
    /// The user that owns the entry.
    #[serde(rename = "userId")]
    pub owner_id: UserID,
    /// When the money moved.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// What the entry was for.
    pub description: String,
    /// What the entry was spent on or earned from.
    pub category: Category,
    /// Whether the entry is income or an expense.
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// The signed amount: positive for income, negative for expenses.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// When the entry was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the entry was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Entry {
    /// The fields of the entry a user can change.
    pub fn to_new_entry(&self) -> NewEntry {
        NewEntry {
            date: self.date,
            description: self.description.clone(),
            category: self.category,
            entry_type: self.entry_type,
            amount: self.amount,
        }
    }
}

/// A validated entry that is ready to be stored.
///
/// Use [crate::normalize_entry] to create one from client input.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    /// When the money moved, in UTC at millisecond precision.
    pub date: OffsetDateTime,
    /// A trimmed, non-empty description of at most 200 characters.
    pub description: String,
    /// What the entry was spent on or earned from.
    pub category: Category,
    /// Whether the entry is income or an expense.
    pub entry_type: EntryType,
    /// A non-zero amount whose sign matches `entry_type`.
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    use crate::{
        UserID,
        entry::{Category, Entry, EntryId, EntryType},
    };

    #[test]
    fn category_names_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse(), Ok(category));
        }

        assert!("groceries".parse::<Category>().is_err());
        assert!("Food".parse::<Category>().is_err());
    }

    #[test]
    fn signed_amount_ignores_input_sign() {
        assert_eq!(EntryType::Expense.signed_amount(dec!(5)), dec!(-5));
        assert_eq!(EntryType::Expense.signed_amount(dec!(-5)), dec!(-5));
        assert_eq!(EntryType::Income.signed_amount(dec!(-2000)), dec!(2000));
        assert_eq!(EntryType::Income.signed_amount(dec!(2000)), dec!(2000));
    }

    #[test]
    fn entry_serializes_with_camel_case_names() {
        let entry = Entry {
            id: EntryId::new(7),
            owner_id: UserID::new(3),
            date: datetime!(2025-01-15 08:00:00 UTC),
            description: "Coffee".to_owned(),
            category: Category::Food,
            entry_type: EntryType::Expense,
            amount: dec!(-5.25),
            created_at: datetime!(2025-01-15 08:01:00 UTC),
            updated_at: datetime!(2025-01-15 08:02:00 UTC),
        };

        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "userId": 3,
                "date": "2025-01-15T08:00:00Z",
                "description": "Coffee",
                "category": "food",
                "type": "expense",
                "amount": -5.25,
                "createdAt": "2025-01-15T08:01:00Z",
                "updatedAt": "2025-01-15T08:02:00Z",
            })
        );
    }
}
