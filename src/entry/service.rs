//! Owner-scoped operations on diary entries.

use crate::{
    Error,
    entry::{
        Entry, EntryFilter, EntryFilterParams, EntryForm, EntryId, EntryPatch, EntryQuery,
        EntryStore, SortOrder, Summary, normalize_entry, summarize,
    },
    timestamp,
    user::UserID,
};

/// Validates client input and runs it against an [EntryStore].
///
/// Every operation acts only on entries owned by the given user.
#[derive(Debug, Clone)]
pub struct EntryService<S> {
    store: S,
}

impl<S> EntryService<S>
where
    S: EntryStore,
{
    /// Create a service backed by `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate `form` and store it as a new entry for `owner_id`.
    ///
    /// # Errors
    /// Returns [Error::Validation] if `form` is invalid, or a store error.
    pub fn create(&self, owner_id: UserID, form: EntryForm) -> Result<Entry, Error> {
        let entry = normalize_entry(form, timestamp::now())?;

        self.store.insert(owner_id, entry)
    }

    /// The entries owned by `owner_id` that match `params`, most recent first.
    ///
    /// # Errors
    /// Returns [Error::Validation] if `params` is invalid, or a store error.
    pub fn list(&self, owner_id: UserID, params: EntryFilterParams) -> Result<Vec<Entry>, Error> {
        let filter = EntryFilter::from_params(owner_id, params)?;

        self.store.find_many(&EntryQuery {
            filter,
            sort_date: Some(SortOrder::Descending),
        })
    }

    /// Get the entry `id` owned by `owner_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the entry does not exist or belongs to
    /// another user.
    pub fn get(&self, owner_id: UserID, id: EntryId) -> Result<Entry, Error> {
        self.store.find_one(owner_id, id)?.ok_or(Error::NotFound)
    }

    /// Apply the fields present in `form` to the entry `id` owned by `owner_id`.
    ///
    /// # Errors
    /// Returns [Error::Validation] if a present field is invalid, and
    /// [Error::NotFound] if the entry does not exist or belongs to another user.
    pub fn update(&self, owner_id: UserID, id: EntryId, form: EntryForm) -> Result<Entry, Error> {
        let patch = EntryPatch::from_form(form)?;

        self.store
            .find_one_and_update(owner_id, id, |current| patch.apply(current.to_new_entry()))?
            .ok_or(Error::NotFound)
    }

    /// Delete the entry `id` owned by `owner_id`, returning the deleted entry.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the entry does not exist or belongs to
    /// another user.
    pub fn delete(&self, owner_id: UserID, id: EntryId) -> Result<Entry, Error> {
        self.store
            .find_one_and_delete(owner_id, id)?
            .ok_or(Error::NotFound)
    }

    /// Summarize every entry owned by `owner_id`.
    ///
    /// # Errors
    /// Returns a store error if the entries cannot be read.
    pub fn summary(&self, owner_id: UserID) -> Result<Summary, Error> {
        let entries = self.store.find_many(&EntryQuery {
            filter: EntryFilter::for_owner(owner_id),
            sort_date: Some(SortOrder::Descending),
        })?;

        Ok(summarize(&entries))
    }

    /// Whether the underlying store can be reached.
    pub fn is_store_connected(&self) -> bool {
        self.store.is_connected()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::{
        Error, PasswordHash, UserID,
        db::initialize,
        entry::{
            Category, EntryFilterParams, EntryForm, EntryId, EntryService, EntryType,
            SQLiteEntryStore,
        },
        user::create_user,
    };

    fn get_test_service() -> (EntryService<SQLiteEntryStore>, UserID, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let alice = create_user(
            "alice@example.com",
            PasswordHash::from_stored("hash".to_owned()),
            &connection,
        )
        .unwrap();
        let bob = create_user(
            "bob@example.com",
            PasswordHash::from_stored("hash".to_owned()),
            &connection,
        )
        .unwrap();
        let store = SQLiteEntryStore::new(Arc::new(Mutex::new(connection)));

        (EntryService::new(store), alice.id, bob.id)
    }

    fn form(description: &str, category: &str, entry_type: &str, amount: Decimal) -> EntryForm {
        EntryForm {
            description: Some(description.to_owned()),
            category: Some(category.to_owned()),
            amount: Some(amount),
            entry_type: Some(entry_type.to_owned()),
            date: None,
        }
    }

    #[test]
    fn create_stores_signed_amount() {
        let (service, alice, _) = get_test_service();

        let entry = service
            .create(alice, form("  Coffee  ", "food", "expense", dec!(5)))
            .unwrap();

        assert_eq!(entry.description, "Coffee");
        assert_eq!(entry.amount, dec!(-5));
        assert_eq!(entry.category, Category::Food);
        assert_eq!(entry.entry_type, EntryType::Expense);
        assert_eq!(entry.owner_id, alice);
        assert_eq!(service.get(alice, entry.id), Ok(entry));
    }

    #[test]
    fn create_rejects_invalid_form() {
        let (service, alice, _) = get_test_service();

        let result = service.create(alice, form("Coffee", "food", "expense", dec!(0)));

        assert_eq!(
            result,
            Err(Error::Validation("Amount cannot be zero".to_owned()))
        );
        assert_eq!(
            service.list(alice, EntryFilterParams::default()),
            Ok(Vec::new())
        );
    }

    #[test]
    fn list_only_returns_own_entries() {
        let (service, alice, bob) = get_test_service();
        let coffee = service
            .create(alice, form("Coffee", "food", "expense", dec!(5)))
            .unwrap();
        service
            .create(bob, form("Bus", "transport", "expense", dec!(3)))
            .unwrap();

        let entries = service.list(alice, EntryFilterParams::default()).unwrap();

        assert_eq!(entries, vec![coffee]);
    }

    #[test]
    fn list_rejects_invalid_filter() {
        let (service, alice, _) = get_test_service();

        let result = service.list(
            alice,
            EntryFilterParams {
                category: Some("rent".to_owned()),
                ..Default::default()
            },
        );

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn other_users_entries_are_not_found() {
        let (service, alice, bob) = get_test_service();
        let entry = service
            .create(alice, form("Coffee", "food", "expense", dec!(5)))
            .unwrap();

        assert_eq!(service.get(bob, entry.id), Err(Error::NotFound));
        assert_eq!(
            service.update(bob, entry.id, EntryForm::default()),
            Err(Error::NotFound)
        );
        assert_eq!(service.delete(bob, entry.id), Err(Error::NotFound));
        assert_eq!(service.get(alice, entry.id), Ok(entry));
    }

    #[test]
    fn update_type_flips_sign() {
        let (service, alice, _) = get_test_service();
        let entry = service
            .create(alice, form("Refund", "shopping", "expense", dec!(20)))
            .unwrap();

        let updated = service
            .update(
                alice,
                entry.id,
                EntryForm {
                    entry_type: Some("income".to_owned()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.entry_type, EntryType::Income);
        assert_eq!(updated.amount, dec!(20));
        assert_eq!(updated.description, "Refund");
        assert_eq!(updated.created_at, entry.created_at);
    }

    #[test]
    fn update_validates_before_lookup() {
        let (service, alice, _) = get_test_service();

        let result = service.update(
            alice,
            EntryId::new(999),
            EntryForm {
                amount: Some(dec!(0)),
                ..Default::default()
            },
        );

        assert_eq!(
            result,
            Err(Error::Validation("Amount cannot be zero".to_owned()))
        );
    }

    #[test]
    fn delete_returns_entry_then_not_found() {
        let (service, alice, _) = get_test_service();
        let entry = service
            .create(alice, form("Coffee", "food", "expense", dec!(5)))
            .unwrap();

        assert_eq!(service.delete(alice, entry.id), Ok(entry.clone()));
        assert_eq!(service.delete(alice, entry.id), Err(Error::NotFound));
        assert_eq!(service.get(alice, entry.id), Err(Error::NotFound));
    }

    #[test]
    fn summary_covers_only_own_entries() {
        let (service, alice, bob) = get_test_service();
        service
            .create(alice, form("Coffee", "food", "expense", dec!(5)))
            .unwrap();
        service
            .create(alice, form("Pay", "salary", "income", dec!(2000)))
            .unwrap();
        service
            .create(bob, form("Rent", "utilities", "expense", dec!(900)))
            .unwrap();

        let summary = service.summary(alice).unwrap();

        assert_eq!(summary.total_income, dec!(2000));
        assert_eq!(summary.total_expenses, dec!(5));
        assert_eq!(summary.balance, dec!(1995));
        assert_eq!(summary.entries_count, 2);
        assert!(!summary.category_breakdown.contains_key(&Category::Utilities));
    }

    #[test]
    fn store_is_connected() {
        let (service, _, _) = get_test_service();

        assert!(service.is_store_connected());
    }
}
