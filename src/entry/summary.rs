//! Aggregates a user's entries into totals and a per-category breakdown.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::entry::{Category, Entry, EntryType};

/// The income, expenses and net total for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    /// The sum of income in the category.
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    /// The sum of expenses in the category, as a positive number.
    #[serde(with = "rust_decimal::serde::float")]
    pub expense: Decimal,
    /// `income - expense`.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// An overview of a user's finances.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The sum of all income.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    /// The sum of all expenses, as a positive number.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
    /// `total_income - total_expenses`.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    /// The number of entries summarized.
    pub entries_count: usize,
    /// Totals for each category that has at least one entry.
    pub category_breakdown: BTreeMap<Category, CategoryTotals>,
}

/// Summarize `entries` in a single pass.
///
/// Amounts are added by magnitude, so the result does not depend on whether
/// the stored amounts are signed. Decimal addition is exact, so the order of
/// `entries` does not change the totals either.
pub fn summarize<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Summary {
    let mut summary = Summary::default();

    for entry in entries {
        let amount = entry.amount.abs();
        let totals = summary.category_breakdown.entry(entry.category).or_default();

        match entry.entry_type {
            EntryType::Income => {
                summary.total_income += amount;
                totals.income += amount;
            }
            EntryType::Expense => {
                summary.total_expenses += amount;
                totals.expense += amount;
            }
        }

        totals.total = totals.income - totals.expense;
        summary.entries_count += 1;
    }

    summary.balance = summary.total_income - summary.total_expenses;

    summary
}
