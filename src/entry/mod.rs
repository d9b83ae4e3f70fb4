//! Diary entries: validation, filtering, summaries, storage and the REST endpoints.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod filter;
mod list_endpoint;
mod normalize;
mod service;
mod sqlite;
mod state;
mod store;
mod summary;
mod summary_endpoint;

pub use core::{Category, DatabaseId, Entry, EntryId, EntryType, NewEntry, UnknownVariant};
pub use create_endpoint::create_entry_endpoint;
pub use delete_endpoint::delete_entry_endpoint;
pub use edit_endpoint::edit_entry_endpoint;
pub use filter::{EntryFilter, EntryFilterParams, EntryQuery, SortOrder};
pub use list_endpoint::{get_entry_endpoint, list_entries_endpoint};
pub use normalize::{EntryForm, EntryPatch, MAX_AMOUNT, MAX_DESCRIPTION_LENGTH, normalize_entry};
pub use service::EntryService;
pub use sqlite::{SQLiteEntryStore, create_entry_table};
pub use state::EntryState;
pub use store::EntryStore;
pub use summary::{CategoryTotals, Summary, summarize};
pub use summary_endpoint::get_summary_endpoint;
