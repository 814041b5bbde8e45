pub mod models;
pub mod seed;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

use models::{
    Autopay, CardLimits, CardSettings, CreditCard, DebitCard, Transaction, User, VirtualCard,
};

/// Every entity table, guarded together by one lock in [`MemoryStore`]
#[derive(Default)]
pub struct Tables {
    users: HashMap<String, User>,
    tokens: HashMap<String, String>,
    credit_cards: HashMap<String, CreditCard>,
    debit_cards: HashMap<String, DebitCard>,
    virtual_cards: HashMap<String, VirtualCard>,
    autopays: HashMap<String, Autopay>,
    card_limits: HashMap<String, CardLimits>,
    card_settings: HashMap<String, CardSettings>,
    transactions: HashMap<String, Vec<Transaction>>,
}

/// An entity kind with its own keyed table
pub trait Record: Clone + Send + Sync + 'static {
    fn key(&self) -> &str;
    fn table(tables: &Tables) -> &HashMap<String, Self>;
    fn table_mut(tables: &mut Tables) -> &mut HashMap<String, Self>;
}

/// An entity that belongs to exactly one user
pub trait Owned {
    fn owner(&self) -> &str;
}

macro_rules! record {
    ($ty:ty, $table:ident, $key:ident) => {
        impl Record for $ty {
            fn key(&self) -> &str {
                &self.$key
            }

            fn table(tables: &Tables) -> &HashMap<String, Self> {
                &tables.$table
            }

            fn table_mut(tables: &mut Tables) -> &mut HashMap<String, Self> {
                &mut tables.$table
            }
        }
    };
}

macro_rules! owned {
    ($($ty:ty),+) => {
        $(impl Owned for $ty {
            fn owner(&self) -> &str {
                &self.user_id
            }
        })+
    };
}

record!(User, users, user_id);
record!(CreditCard, credit_cards, id);
record!(DebitCard, debit_cards, id);
record!(VirtualCard, virtual_cards, id);
record!(Autopay, autopays, card_id);
record!(CardLimits, card_limits, card_id);
record!(CardSettings, card_settings, user_id);

owned!(CreditCard, DebitCard, VirtualCard);

/// In-memory entity store.
///
/// All tables share a single reader/writer lock: listings and lookups proceed
/// concurrently, every write is exclusive. Each method holds the lock for
/// exactly one call, so a lookup followed by a write is not atomic.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: Record>(&self, key: &str) -> Option<T> {
        T::table(&self.inner.read()).get(key).cloned()
    }

    pub fn list_by_user<T: Record + Owned>(&self, user_id: &str) -> Vec<T> {
        T::table(&self.inner.read())
            .values()
            .filter(|record| record.owner() == user_id)
            .cloned()
            .collect()
    }

    /// Insert or fully overwrite the record stored under its key
    pub fn put<T: Record>(&self, record: T) {
        let mut tables = self.inner.write();
        T::table_mut(&mut tables).insert(record.key().to_string(), record);
    }

    /// Returns whether a record was removed
    pub fn delete<T: Record>(&self, key: &str) -> bool {
        T::table_mut(&mut self.inner.write()).remove(key).is_some()
    }

    /// Return the stored record, creating and persisting `init()` when absent
    pub fn get_or_insert_with<T: Record>(&self, key: &str, init: impl FnOnce() -> T) -> T {
        if let Some(found) = self.get::<T>(key) {
            return found;
        }
        let mut tables = self.inner.write();
        T::table_mut(&mut tables)
            .entry(key.to_string())
            .or_insert_with(init)
            .clone()
    }

    /// Read-modify-write under one write lock, starting from `init()` when
    /// nothing is stored yet. The result is always persisted.
    pub fn modify<T: Record>(
        &self,
        key: &str,
        init: impl FnOnce() -> T,
        apply: impl FnOnce(&mut T),
    ) -> T {
        let mut tables = self.inner.write();
        let record = T::table_mut(&mut tables)
            .entry(key.to_string())
            .or_insert_with(init);
        apply(&mut *record);
        record.clone()
    }

    /// Resolve a bearer token to the user currently holding it.
    ///
    /// Tokens superseded by a later login stay in the index but no longer
    /// match the user's current token, so they resolve to `None`.
    pub fn user_by_token(&self, token: &str) -> Option<User> {
        let tables = self.inner.read();
        let user_id = tables.tokens.get(token)?;
        tables
            .users
            .get(user_id)
            .filter(|user| user.token.as_deref() == Some(token))
            .cloned()
    }

    /// Make `token` the user's only live session token
    pub fn bind_session(
        &self,
        user_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Option<User> {
        let mut tables = self.inner.write();
        let user = tables.users.get_mut(user_id)?;
        user.token = Some(token.to_string());
        user.expiry_date = Some(expires_at);
        let snapshot = user.clone();
        tables.tokens.insert(token.to_string(), user_id.to_string());
        Some(snapshot)
    }

    pub fn append_transaction(&self, transaction: Transaction) {
        self.inner
            .write()
            .transactions
            .entry(transaction.card_id.clone())
            .or_default()
            .push(transaction);
    }

    /// Transactions for a card in insertion order
    pub fn transactions_for_card(&self, card_id: &str) -> Vec<Transaction> {
        self.inner
            .read()
            .transactions
            .get(card_id)
            .cloned()
            .unwrap_or_default()
    }
}
