//! Defines the entry store trait.

use crate::{
    Error,
    entry::{Entry, EntryId, EntryQuery, NewEntry},
    user::UserID,
};

/// Handles the persistence of entries.
///
/// Every lookup is keyed by both the entry ID and the owner, so an entry owned
/// by another user behaves exactly like one that does not exist.
pub trait EntryStore {
    /// Store a new entry for `owner_id`, assigning its ID and audit timestamps.
    fn insert(&self, owner_id: UserID, entry: NewEntry) -> Result<Entry, Error>;

    /// Retrieve the entry `id` if it is owned by `owner_id`.
    fn find_one(&self, owner_id: UserID, id: EntryId) -> Result<Option<Entry>, Error>;

    /// Retrieve entries in the way defined by `query`.
    fn find_many(&self, query: &EntryQuery) -> Result<Vec<Entry>, Error>;

    /// Replace the entry `id` owned by `owner_id` with the result of `update`.
    ///
    /// `update` receives the current state of the entry. Reading and writing
    /// happen atomically, so concurrent updates to one entry never interleave.
    /// Returns `None` if there is no such entry.
    fn find_one_and_update<F>(
        &self,
        owner_id: UserID,
        id: EntryId,
        update: F,
    ) -> Result<Option<Entry>, Error>
    where
        F: FnOnce(&Entry) -> NewEntry;

    /// Delete the entry `id` owned by `owner_id` and return it, or `None` if
    /// there is no such entry.
    fn find_one_and_delete(&self, owner_id: UserID, id: EntryId) -> Result<Option<Entry>, Error>;

    /// Whether the store can currently be reached.
    fn is_connected(&self) -> bool;
}
