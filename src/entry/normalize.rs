//! Validation of client input and the sign convention for stored amounts.
//!
//! Everything in this module is a pure function of its arguments: the current
//! time is passed in by the caller.

use rust_decimal::Decimal;
use serde::Deserialize;
use time::OffsetDateTime;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    Error,
    entry::{Category, EntryType, NewEntry},
    timestamp::parse_timestamp,
};

/// The maximum number of characters in an entry description.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

/// The largest amount, by magnitude, that an entry can hold.
///
/// Keeps the sum of every entry a user could store well inside [Decimal::MAX].
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// The fields of an entry as sent by a client.
///
/// Every field is optional so that missing fields are reported with a helpful
/// message rather than a deserialization error. The same form is used for
/// creating entries, where most fields are required, and for partial updates.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EntryForm {
    /// What the entry was for.
    pub description: Option<String>,
    /// One of the [Category] names.
    pub category: Option<String>,
    /// The amount of money. The sign is ignored.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    /// Either "income" or "expense".
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    /// An RFC 3339 timestamp or a `YYYY-MM-DD` date.
    pub date: Option<String>,
}

/// Validate a create request and convert it into a [NewEntry].
///
/// The stored amount is negative for expenses and positive for income, whatever
/// the sign of the submitted amount. If `form` has no date, `now` is used.
///
/// # Errors
/// Returns [Error::Validation] if a required field is missing or empty, if a
/// field has an invalid value, or if the amount is zero.
pub fn normalize_entry(form: EntryForm, now: OffsetDateTime) -> Result<NewEntry, Error> {
    let description = match form.description {
        Some(description) => parse_description(&description)?,
        None => return Err(missing("Description")),
    };
    let category = match form.category {
        Some(category) => parse_category(&category)?,
        None => return Err(missing("Category")),
    };
    let entry_type = match form.entry_type {
        Some(entry_type) => parse_entry_type(&entry_type)?,
        None => return Err(missing("Type")),
    };
    let amount = match form.amount {
        Some(amount) => parse_amount(amount)?,
        None => return Err(missing("Amount")),
    };
    let date = parse_optional_date(form.date.as_deref())?.unwrap_or(now);

    Ok(NewEntry {
        date,
        description,
        category,
        entry_type,
        amount: entry_type.signed_amount(amount),
    })
}

/// A validated partial update to an entry.
///
/// Fields that are `None` are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    /// The new date.
    pub date: Option<OffsetDateTime>,
    /// The new description.
    pub description: Option<String>,
    /// The new category.
    pub category: Option<Category>,
    /// The new entry type.
    pub entry_type: Option<EntryType>,
    /// The new amount. Only the magnitude is kept.
    pub amount: Option<Decimal>,
}

impl EntryPatch {
    /// Validate the fields that are present in `form`.
    ///
    /// Present fields follow the same rules as [normalize_entry]. An empty
    /// date string is treated as absent.
    ///
    /// # Errors
    /// Returns [Error::Validation] if any present field is invalid.
    pub fn from_form(form: EntryForm) -> Result<Self, Error> {
        Ok(Self {
            date: parse_optional_date(form.date.as_deref())?,
            description: form
                .description
                .as_deref()
                .map(parse_description)
                .transpose()?,
            category: form.category.as_deref().map(parse_category).transpose()?,
            entry_type: form
                .entry_type
                .as_deref()
                .map(parse_entry_type)
                .transpose()?,
            amount: form.amount.map(parse_amount).transpose()?,
        })
    }

    /// Apply the patch to `current`.
    ///
    /// If either the amount or the type is changed, the sign of the amount is
    /// derived again from the resulting type. Otherwise the stored amount is
    /// kept as is.
    pub fn apply(self, current: NewEntry) -> NewEntry {
        let entry_type = self.entry_type.unwrap_or(current.entry_type);

        let amount = if self.amount.is_some() || self.entry_type.is_some() {
            entry_type.signed_amount(self.amount.unwrap_or(current.amount))
        } else {
            current.amount
        };

        NewEntry {
            date: self.date.unwrap_or(current.date),
            description: self.description.unwrap_or(current.description),
            category: self.category.unwrap_or(current.category),
            entry_type,
            amount,
        }
    }
}

fn missing(field_name: &str) -> Error {
    Error::Validation(format!("{field_name} is required"))
}

fn parse_description(description: &str) -> Result<String, Error> {
    let description = description.trim();

    if description.is_empty() {
        return Err(missing("Description"));
    }

    if description.graphemes(true).count() > MAX_DESCRIPTION_LENGTH {
        return Err(Error::Validation(format!(
            "Description cannot exceed {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }

    Ok(description.to_owned())
}

fn parse_category(category: &str) -> Result<Category, Error> {
    if category.is_empty() {
        return Err(missing("Category"));
    }

    category
        .parse()
        .map_err(|_| Error::Validation(format!("Invalid category \"{category}\"")))
}

fn parse_entry_type(entry_type: &str) -> Result<EntryType, Error> {
    if entry_type.is_empty() {
        return Err(missing("Type"));
    }

    entry_type
        .parse()
        .map_err(|_| Error::Validation("Type must be either income or expense".to_owned()))
}

fn parse_amount(amount: Decimal) -> Result<Decimal, Error> {
    if amount.is_zero() {
        return Err(Error::Validation("Amount cannot be zero".to_owned()));
    }

    if amount.abs() > Decimal::from(MAX_AMOUNT) {
        return Err(Error::Validation(format!(
            "Amount cannot exceed {MAX_AMOUNT}"
        )));
    }

    Ok(amount.normalize())
}

fn parse_optional_date(date: Option<&str>) -> Result<Option<OffsetDateTime>, Error> {
    match date {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => parse_timestamp(text)
            .map(Some)
            .ok_or_else(|| Error::Validation(format!("Invalid date \"{text}\""))),
    }
}
