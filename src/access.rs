use crate::{
    auth::Caller,
    error::{ApiError, ApiResult},
    store::{
        MemoryStore, Owned,
        models::{CardKind, CreditCard, DebitCard, VirtualCard},
    },
};

/// Outcome of an ownership check
#[derive(Debug, PartialEq)]
pub enum Access<T> {
    Allow(T),
    NotFound,
    Forbidden,
}

impl<T: Owned> Access<T> {
    pub fn check(found: Option<T>, caller: &Caller) -> Self {
        match found {
            None => Access::NotFound,
            Some(resource) if resource.owner() == caller.user_id => Access::Allow(resource),
            Some(_) => Access::Forbidden,
        }
    }
}

impl<T> Access<T> {
    /// `what` names the resource in the not-found message
    pub fn into_result(self, what: &str) -> ApiResult<T> {
        match self {
            Access::Allow(resource) => Ok(resource),
            Access::NotFound => Err(ApiError::not_found(what)),
            Access::Forbidden => Err(ApiError::Forbidden),
        }
    }
}

/// Ownership-checked lookup of one record
pub fn authorize<T: Owned>(found: Option<T>, caller: &Caller, what: &str) -> ApiResult<T> {
    Access::check(found, caller).into_result(what)
}

/// Where a bare card id lives and who owns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardOwner {
    pub kind: CardKind,
    pub user_id: String,
}

impl Owned for CardOwner {
    fn owner(&self) -> &str {
        &self.user_id
    }
}

/// Probe credit, then debit, then virtual cards for `card_id`
pub fn locate_card(store: &MemoryStore, card_id: &str) -> Option<CardOwner> {
    CardKind::PROBE_ORDER.into_iter().find_map(|kind| {
        let user_id = match kind {
            CardKind::Credit => store.get::<CreditCard>(card_id)?.user_id,
            CardKind::Debit => store.get::<DebitCard>(card_id)?.user_id,
            CardKind::Virtual => store.get::<VirtualCard>(card_id)?.user_id,
        };
        Some(CardOwner { kind, user_id })
    })
}

/// Ownership check for a card of any kind
pub fn authorize_any_card(store: &MemoryStore, card_id: &str, caller: &Caller) -> ApiResult<CardOwner> {
    authorize(locate_card(store, card_id), caller, "Card")
}
