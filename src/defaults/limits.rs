//! Transaction limits with read-time defaults.
//!
//! A card has no limits record until one of the update paths writes it.
//! Reads of a missing record return the fixed baseline below; reads of a
//! stored record backfill missing ids and max limits. Nothing synthesized on
//! read is written back.

use serde::Serialize;
use uuid::Uuid;

use crate::store::{
    MemoryStore,
    models::{CardLimits, TransactionLimit},
};

pub const ATM_WITHDRAWAL: &str = "ATM Cash Withdrawal";
pub const ONLINE: &str = "Online";
pub const POINT_OF_SALE: &str = "Merchant Outlets (POS)";
pub const CONTACTLESS: &str = "Contactless";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitScope {
    Domestic,
    International,
}

impl LimitScope {
    fn as_str(&self) -> &'static str {
        match self {
            LimitScope::Domestic => "domestic",
            LimitScope::International => "international",
        }
    }
}

/// Limits as returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitsView {
    pub card_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domestic_limits: Vec<TransactionLimit>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub international_limits: Vec<TransactionLimit>,
}

fn entry(limit_type: &str, is_enabled: bool, current_limit: f64, max_limit: f64) -> TransactionLimit {
    TransactionLimit {
        id: String::new(),
        limit_type: limit_type.to_string(),
        is_enabled,
        current_limit,
        max_limit,
        can_set_limit: true,
    }
}

/// Limits every card starts with
pub fn baseline(card_id: &str) -> CardLimits {
    CardLimits {
        card_id: card_id.to_string(),
        domestic_limits: vec![
            entry(ATM_WITHDRAWAL, true, 50_000.0, 100_000.0),
            entry(ONLINE, true, 200_000.0, 500_000.0),
            entry(POINT_OF_SALE, true, 150_000.0, 300_000.0),
            entry(CONTACTLESS, true, 5_000.0, 10_000.0),
        ],
        international_limits: vec![
            entry(ATM_WITHDRAWAL, false, 0.0, 50_000.0),
            entry(ONLINE, true, 100_000.0, 200_000.0),
            entry(POINT_OF_SALE, false, 0.0, 100_000.0),
            entry(CONTACTLESS, false, 0.0, 5_000.0),
        ],
    }
}

/// Stable id for an entry that was stored without one
fn synthesized_id(card_id: &str, scope: LimitScope, position: usize) -> String {
    let name = format!("{card_id}/{}/{position}", scope.as_str());
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
}

fn backfill(card_id: &str, scope: LimitScope, entries: Vec<TransactionLimit>) -> Vec<TransactionLimit> {
    entries
        .into_iter()
        .enumerate()
        .map(|(position, mut limit)| {
            if limit.id.is_empty() {
                limit.id = synthesized_id(card_id, scope, position);
            }
            if limit.max_limit == 0.0 {
                limit.max_limit = limit.current_limit;
            }
            limit.can_set_limit = true;
            limit
        })
        .collect()
}

/// Complete view of a card's limits, from the stored record or the baseline
pub fn view(card_id: &str, stored: Option<CardLimits>) -> LimitsView {
    let limits = stored.unwrap_or_else(|| baseline(card_id));
    LimitsView {
        card_id: card_id.to_string(),
        domestic_limits: backfill(card_id, LimitScope::Domestic, limits.domestic_limits),
        international_limits: backfill(card_id, LimitScope::International, limits.international_limits),
    }
}

pub fn read_limits(store: &MemoryStore, card_id: &str) -> LimitsView {
    view(card_id, store.get::<CardLimits>(card_id))
}

/// Replace one half of the stored limits, keeping the other half as it was
pub fn replace_scope(
    store: &MemoryStore,
    card_id: &str,
    scope: LimitScope,
    entries: Vec<TransactionLimit>,
) -> CardLimits {
    store.modify(
        card_id,
        || CardLimits {
            card_id: card_id.to_string(),
            ..Default::default()
        },
        |limits| match scope {
            LimitScope::Domestic => limits.domestic_limits = entries,
            LimitScope::International => limits.international_limits = entries,
        },
    )
}

/// Overwrite both halves at once
pub fn replace_all(store: &MemoryStore, card_id: &str, mut limits: CardLimits) -> CardLimits {
    limits.card_id = card_id.to_string();
    store.put(limits.clone());
    limits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(entries: &[TransactionLimit]) -> Vec<(&str, bool, f64, f64)> {
        entries
            .iter()
            .map(|l| (l.limit_type.as_str(), l.is_enabled, l.current_limit, l.max_limit))
            .collect()
    }

    #[test]
    fn test_default_limits_values() {
        let store = MemoryStore::new();
        let view = read_limits(&store, "card-1");

        assert_eq!(
            summary(&view.domestic_limits),
            vec![
                (ATM_WITHDRAWAL, true, 50_000.0, 100_000.0),
                (ONLINE, true, 200_000.0, 500_000.0),
                (POINT_OF_SALE, true, 150_000.0, 300_000.0),
                (CONTACTLESS, true, 5_000.0, 10_000.0),
            ]
        );
        assert_eq!(
            summary(&view.international_limits),
            vec![
                (ATM_WITHDRAWAL, false, 0.0, 50_000.0),
                (ONLINE, true, 100_000.0, 200_000.0),
                (POINT_OF_SALE, false, 0.0, 100_000.0),
                (CONTACTLESS, false, 0.0, 5_000.0),
            ]
        );
        assert!(view.domestic_limits.iter().all(|l| l.can_set_limit && !l.id.is_empty()));
    }

    #[test]
    fn test_default_read_is_idempotent_and_not_persisted() {
        let store = MemoryStore::new();
        let first = read_limits(&store, "card-1");
        let second = read_limits(&store, "card-1");
        assert_eq!(first, second);
        assert!(store.get::<CardLimits>("card-1").is_none());
    }

    #[test]
    fn test_backfill_ids_and_max() {
        let stored = CardLimits {
            card_id: "card-1".to_string(),
            domestic_limits: vec![
                TransactionLimit {
                    id: "keep-me".to_string(),
                    limit_type: ONLINE.to_string(),
                    is_enabled: true,
                    current_limit: 10.0,
                    max_limit: 20.0,
                    can_set_limit: false,
                },
                TransactionLimit {
                    id: String::new(),
                    limit_type: CONTACTLESS.to_string(),
                    is_enabled: true,
                    current_limit: 300.0,
                    max_limit: 0.0,
                    can_set_limit: false,
                },
            ],
            international_limits: vec![],
        };
        let limits = view("card-1", Some(stored));

        assert_eq!(limits.domestic_limits[0].id, "keep-me");
        assert_eq!(limits.domestic_limits[0].max_limit, 20.0);
        assert!(!limits.domestic_limits[1].id.is_empty());
        assert_eq!(limits.domestic_limits[1].max_limit, 300.0);
        assert!(limits.domestic_limits.iter().all(|l| l.can_set_limit));
        assert!(limits.international_limits.is_empty());
    }

    #[test]
    fn test_backfill_does_not_write_back() {
        let store = MemoryStore::new();
        let entries = vec![entry(ONLINE, true, 10.0, 0.0)];
        replace_scope(&store, "card-1", LimitScope::Domestic, entries.clone());

        let view = read_limits(&store, "card-1");
        assert_eq!(view.domestic_limits[0].max_limit, 10.0);
        assert_eq!(store.get::<CardLimits>("card-1").unwrap().domestic_limits, entries);
    }

    #[test]
    fn test_replace_scope_keeps_other_half() {
        let store = MemoryStore::new();
        let domestic = vec![entry(ATM_WITHDRAWAL, true, 1.0, 2.0)];
        let international = vec![entry(ONLINE, false, 3.0, 4.0)];

        replace_scope(&store, "card-1", LimitScope::Domestic, domestic.clone());
        let stored = replace_scope(&store, "card-1", LimitScope::International, international.clone());
        assert_eq!(stored.domestic_limits, domestic);
        assert_eq!(stored.international_limits, international);

        let replacement = vec![entry(CONTACTLESS, true, 5.0, 6.0)];
        let stored = replace_scope(&store, "card-1", LimitScope::Domestic, replacement.clone());
        assert_eq!(stored.domestic_limits, replacement);
        assert_eq!(stored.international_limits, international);
    }

    #[test]
    fn test_first_scope_write_leaves_other_half_empty() {
        let store = MemoryStore::new();
        replace_scope(&store, "card-1", LimitScope::International, vec![entry(ONLINE, true, 1.0, 1.0)]);
        let view = read_limits(&store, "card-1");
        assert!(view.domestic_limits.is_empty());
        assert_eq!(view.international_limits.len(), 1);
    }

    #[test]
    fn test_replace_all_tags_card() {
        let store = MemoryStore::new();
        let stored = replace_all(&store, "card-9", baseline(""));
        assert_eq!(stored.card_id, "card-9");
        assert_eq!(store.get::<CardLimits>("card-9").unwrap(), stored);
    }
}
