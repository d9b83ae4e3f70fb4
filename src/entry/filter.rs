//! Builds the predicate used to select a user's entries.

use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error,
    entry::{Category, EntryType},
    timestamp::parse_timestamp,
    user::UserID,
};

/// The optional filters a client can pass as query parameters when listing
/// entries.
///
/// Empty values are treated the same as absent ones.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFilterParams {
    /// Exclude entries dated before this timestamp or date.
    pub start_date: Option<String>,
    /// Exclude entries dated after this timestamp or date.
    pub end_date: Option<String>,
    /// Only include entries in this category.
    pub category: Option<String>,
    /// Only include entries of this type.
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
}

/// Selects entries owned by one user.
///
/// A `None` field places no restriction on that dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFilter {
    /// Only entries owned by this user are selected.
    pub owner_id: UserID,
    /// Entries dated before this are excluded.
    pub start_date: Option<OffsetDateTime>,
    /// Entries dated after this are excluded.
    pub end_date: Option<OffsetDateTime>,
    /// Only entries in this category are selected.
    pub category: Option<Category>,
    /// Only entries of this type are selected.
    pub entry_type: Option<EntryType>,
}

impl EntryFilter {
    /// Select every entry owned by `owner_id`.
    pub fn for_owner(owner_id: UserID) -> Self {
        Self {
            owner_id,
            start_date: None,
            end_date: None,
            category: None,
            entry_type: None,
        }
    }

    /// Build a filter for `owner_id` from query parameters.
    ///
    /// # Errors
    /// Returns [Error::Validation] if a date cannot be parsed or if the
    /// category or type is not a known value.
    pub fn from_params(owner_id: UserID, params: EntryFilterParams) -> Result<Self, Error> {
        let start_date = non_empty(params.start_date)
            .map(|text| parse_date_param("startDate", &text))
            .transpose()?;
        let end_date = non_empty(params.end_date)
            .map(|text| parse_date_param("endDate", &text))
            .transpose()?;
        let category = non_empty(params.category)
            .map(|text| {
                text.parse::<Category>()
                    .map_err(|_| Error::Validation(format!("Invalid category \"{text}\"")))
            })
            .transpose()?;
        let entry_type = non_empty(params.entry_type)
            .map(|text| {
                text.parse::<EntryType>().map_err(|_| {
                    Error::Validation("Type must be either income or expense".to_owned())
                })
            })
            .transpose()?;

        Ok(Self {
            owner_id,
            start_date,
            end_date,
            category,
            entry_type,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn parse_date_param(name: &str, text: &str) -> Result<OffsetDateTime, Error> {
    parse_timestamp(text).ok_or_else(|| Error::Validation(format!("Invalid {name} \"{text}\"")))
}

/// The order to sort entries by date in an [EntryQuery].
///
/// Entries with the same date are always kept in the order they were created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Most recent first.
    Descending,
}

/// Defines how entries should be fetched from [crate::EntryStore::find_many].
#[derive(Debug, Clone, PartialEq)]
pub struct EntryQuery {
    /// Which entries to select.
    pub filter: EntryFilter,
    /// Orders entries by date in the order `sort_date`. None returns entries in the
    /// order they are stored.
    pub sort_date: Option<SortOrder>,
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{
        Error, UserID,
        entry::{Category, EntryFilter, EntryFilterParams, EntryType},
    };

    #[test]
    fn no_params_only_restricts_owner() {
        let owner_id = UserID::new(42);

        let filter = EntryFilter::from_params(owner_id, EntryFilterParams::default()).unwrap();

        assert_eq!(filter, EntryFilter::for_owner(owner_id));
    }

    #[test]
    fn empty_params_are_ignored() {
        let owner_id = UserID::new(42);
        let params = EntryFilterParams {
            start_date: Some(String::new()),
            end_date: Some(" ".to_owned()),
            category: Some(String::new()),
            entry_type: Some(String::new()),
        };

        let filter = EntryFilter::from_params(owner_id, params).unwrap();

        assert_eq!(filter, EntryFilter::for_owner(owner_id));
    }

    #[test]
    fn parses_all_params() {
        let params = EntryFilterParams {
            start_date: Some("2025-01-01".to_owned()),
            end_date: Some("2025-01-31T23:59:59Z".to_owned()),
            category: Some("food".to_owned()),
            entry_type: Some("expense".to_owned()),
        };

        let filter = EntryFilter::from_params(UserID::new(1), params).unwrap();

        assert_eq!(filter.start_date, Some(datetime!(2025-01-01 00:00:00 UTC)));
        assert_eq!(filter.end_date, Some(datetime!(2025-01-31 23:59:59 UTC)));
        assert_eq!(filter.category, Some(Category::Food));
        assert_eq!(filter.entry_type, Some(EntryType::Expense));
    }

    #[test]
    fn rejects_invalid_params() {
        let cases = [
            EntryFilterParams {
                start_date: Some("not a date".to_owned()),
                ..Default::default()
            },
            EntryFilterParams {
                end_date: Some("2025-02-30".to_owned()),
                ..Default::default()
            },
            EntryFilterParams {
                category: Some("rent".to_owned()),
                ..Default::default()
            },
            EntryFilterParams {
                entry_type: Some("both".to_owned()),
                ..Default::default()
            },
        ];

        for params in cases {
            assert!(matches!(
                EntryFilter::from_params(UserID::new(1), params),
                Err(Error::Validation(_))
            ));
        }
    }
}
