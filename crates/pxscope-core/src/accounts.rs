use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::store::Overlay;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccountRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            account: None,
            avatar: None,
            refresh_token: None,
            extra: Map::new(),
        }
    }

    /// Overwrites every field `update` carries; fields it lacks are kept.
    fn merge_from(&mut self, update: AccountRecord) {
        let AccountRecord {
            id: _,
            name,
            account,
            avatar,
            refresh_token,
            extra,
        } = update;

        if name.is_some() {
            self.name = name;
        }
        if account.is_some() {
            self.account = account;
        }
        if avatar.is_some() {
            self.avatar = avatar;
        }
        if refresh_token.is_some() {
            self.refresh_token = refresh_token;
        }
        self.extra.extend(extra);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountUpsert {
    Merged,
    Appended,
}

/// Saved accounts, unique by `id`, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountBook {
    records: Vec<AccountRecord>,
}

impl AccountBook {
    pub fn records(&self) -> &[AccountRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&AccountRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn upsert(&mut self, record: AccountRecord) -> AccountUpsert {
        match self.records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => {
                existing.merge_from(record);
                AccountUpsert::Merged
            }
            None => {
                self.records.push(record);
                AccountUpsert::Appended
            }
        }
    }
}

impl Overlay for AccountBook {
    fn overlay(&mut self, value: Value) {
        let Value::Array(items) = value else {
            return;
        };

        for item in items {
            match serde_json::from_value::<AccountRecord>(item) {
                Ok(record) => {
                    self.upsert(record);
                }
                Err(error) => log::debug!("skipping persisted account: {error}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn named(id: &str, name: &str) -> AccountRecord {
        AccountRecord {
            name: Some(name.to_string()),
            ..AccountRecord::new(id)
        }
    }

    #[test]
    fn upsert_with_known_id_merges_in_place() {
        let mut book = AccountBook::default();
        book.upsert(AccountRecord {
            avatar: Some("a.png".to_string()),
            ..named("11", "old")
        });
        book.upsert(named("22", "other"));

        let outcome = book.upsert(AccountRecord {
            refresh_token: Some("token".to_string()),
            ..named("11", "new")
        });

        assert_eq!(outcome, AccountUpsert::Merged);
        assert_eq!(book.len(), 2);
        let merged = book.get("11").expect("account 11 should exist");
        assert_eq!(merged.name.as_deref(), Some("new"));
        assert_eq!(merged.avatar.as_deref(), Some("a.png"));
        assert_eq!(merged.refresh_token.as_deref(), Some("token"));
        assert_eq!(book.records()[0].id, "11");
    }

    #[test]
    fn upsert_with_new_id_appends() {
        let mut book = AccountBook::default();
        book.upsert(named("11", "first"));

        assert_eq!(book.upsert(named("12", "second")), AccountUpsert::Appended);
        assert_eq!(book.len(), 2);
        assert_eq!(book.records()[1].id, "12");
    }

    #[test]
    fn overlay_deduplicates_and_skips_broken_entries() {
        let mut book = AccountBook::default();
        book.overlay(json!([
            { "id": "1", "name": "a", "premium": true },
            { "name": "no id" },
            { "id": "1", "account": "a@example.com" },
        ]));

        assert_eq!(book.len(), 1);
        let record = book.get("1").expect("account 1 should exist");
        assert_eq!(record.name.as_deref(), Some("a"));
        assert_eq!(record.account.as_deref(), Some("a@example.com"));
        assert_eq!(record.extra.get("premium"), Some(&json!(true)));
    }

    #[test]
    fn book_serializes_as_a_plain_list() {
        let mut book = AccountBook::default();
        book.upsert(named("7", "seven"));
        assert_eq!(
            serde_json::to_value(&book).expect("book should serialize"),
            json!([{ "id": "7", "name": "seven" }])
        );
    }
}
