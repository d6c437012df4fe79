//! In-memory list reconciliation after writes.
//!
//! List views hold a snapshot per level; after a successful mutation
//! the snapshot is reconciled by id rather than rebuilt ad hoc, so
//! duplicate completion events are harmless.

use uuid::Uuid;

use crate::models::{Measurement, Pole, Region, Well};

/// Anything addressable by record id.
pub trait Keyed {
    fn key(&self) -> Uuid;
}

macro_rules! impl_keyed {
    ($($t:ty),*) => {
        $(impl Keyed for $t {
            fn key(&self) -> Uuid {
                self.id
            }
        })*
    };
}

impl_keyed!(Region, Pole, Well, Measurement);

/// Replace the element with the same id, if present. Returns whether
/// a replacement happened. Applying the same update twice leaves the
/// list unchanged after the first application.
pub fn replace_by_id<T: Keyed>(list: &mut [T], updated: T) -> bool {
    match list.iter_mut().find(|item| item.key() == updated.key()) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}

/// Insert, or replace the element with the same id.
pub fn upsert_by_id<T: Keyed + Clone>(list: &mut Vec<T>, item: T) {
    if !replace_by_id(list, item.clone()) {
        list.push(item);
    }
}

/// Remove the element with the given id, if present.
pub fn remove_by_id<T: Keyed>(list: &mut Vec<T>, id: Uuid) -> bool {
    let before = list.len();
    list.retain(|item| item.key() != id);
    list.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn region(name: &str) -> Region {
        Region {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            created_by: "alice".into(),
            updated_by: "alice".into(),
            is_password_protected: false,
            protecting_secret: None,
            protected_at: None,
            protected_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn replace_is_idempotent() {
        let a = region("a");
        let b = region("b");
        let mut list = vec![a.clone(), b];

        let mut edited = a.clone();
        edited.name = "a2".into();

        assert!(replace_by_id(&mut list, edited.clone()));
        assert_eq!(list[0].name, "a2");
        assert_eq!(list.len(), 2);

        // Duplicate event: no further change.
        assert!(replace_by_id(&mut list, edited));
        assert_eq!(list[0].name, "a2");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn replace_misses_unknown_id() {
        let mut list = vec![region("a")];
        assert!(!replace_by_id(&mut list, region("stranger")));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn upsert_inserts_then_replaces() {
        let mut list: Vec<Region> = Vec::new();
        let a = region("a");
        upsert_by_id(&mut list, a.clone());
        assert_eq!(list.len(), 1);

        let mut edited = a;
        edited.name = "renamed".into();
        upsert_by_id(&mut list, edited);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "renamed");
    }

    #[test]
    fn remove_is_idempotent() {
        let a = region("a");
        let mut list = vec![a.clone(), region("b")];

        assert!(remove_by_id(&mut list, a.id));
        assert_eq!(list.len(), 1);
        assert!(!remove_by_id(&mut list, a.id));
        assert_eq!(list.len(), 1);
    }
}
