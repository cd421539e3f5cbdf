//! Loader interface and the in-memory cache-backed implementation.
//!
//! The engine never loads data. When a fetch hits a deferred association
//! it asks the loader, and the loader either answers from the cache or
//! reports the concrete [`DataReq`] inside `NotLoaded`. The host then
//! satisfies the requests (batched, async, however it likes), fills the
//! cache, and re-invokes the engine with the same inputs.

use std::collections::BTreeMap;
use std::fmt;

use maxim_core::{Record, Value};
use serde_json::json;

use crate::result::Outcome;

/// Request kind passed for deferred associations. Hosts may define more
/// kinds; the engine forwards them unchanged.
pub const ASSOC: &str = "assoc";

/// A single data request: enough for a host to know what to load.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DataReq {
    pub kind: String,
    pub type_tag: String,
    /// The container record's `id` field, when it has one.
    pub id: Option<Value>,
    pub key: String,
}

impl DataReq {
    pub fn new(
        kind: impl Into<String>,
        type_tag: impl Into<String>,
        key: impl Into<String>,
    ) -> DataReq {
        DataReq {
            kind: kind.into(),
            type_tag: type_tag.into(),
            id: None,
            key: key.into(),
        }
    }

    pub fn with_id(mut self, id: Value) -> DataReq {
        self.id = Some(id);
        self
    }

    /// The request for an association field on a record.
    pub fn assoc(container: &Record, key: &str) -> DataReq {
        DataReq {
            kind: ASSOC.to_string(),
            type_tag: container.type_tag.clone(),
            id: container.field("id").cloned(),
            key: key.to_string(),
        }
    }

    /// Render for hosts shipping requests to their batch loader.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "kind": self.kind,
            "type": self.type_tag,
            "id": self.id.as_ref().map(maxim_core::value_to_json),
            "key": self.key,
        })
    }
}

impl fmt::Display for DataReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} {}[{:?}].{}", self.kind, self.type_tag, id, self.key),
            None => write!(f, "{} {}.{}", self.kind, self.type_tag, self.key),
        }
    }
}

/// Resolver for deferred data.
///
/// Implementations read from the cache the host populated; they must not
/// block. A miss returns `NotLoaded` with the concrete request; a failure
/// in the backing store surfaces as `EvalError::Loader`.
pub trait Loader {
    fn lookup(&self, cache: &DataCache, kind: &str, container: &Record, key: &str)
        -> Outcome<Value>;
}

/// Host-populated store of satisfied data requests.
///
/// The engine only reads from it, through a loader; it never writes.
#[derive(Debug, Clone, Default)]
pub struct DataCache {
    entries: BTreeMap<DataReq, Value>,
}

impl DataCache {
    pub fn new() -> DataCache {
        DataCache::default()
    }

    pub fn insert(&mut self, req: DataReq, value: Value) {
        self.entries.insert(req, value);
    }

    pub fn get(&self, req: &DataReq) -> Option<&Value> {
        self.entries.get(req)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The loader every test and most bootstrapping hosts use: resolve
/// straight from the cache, report a miss as the request itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheLoader;

impl Loader for CacheLoader {
    fn lookup(
        &self,
        cache: &DataCache,
        kind: &str,
        container: &Record,
        key: &str,
    ) -> Outcome<Value> {
        let req = DataReq {
            kind: kind.to_string(),
            type_tag: container.type_tag.clone(),
            id: container.field("id").cloned(),
            key: key.to_string(),
        };
        match cache.get(&req) {
            Some(value) => Outcome::Ok(value.clone()),
            None => Outcome::NotLoaded(vec![req]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner_record() -> Record {
        Record::new("document")
            .with("id", Value::Int(5))
            .with("owner", Value::Deferred)
    }

    #[test]
    fn cache_miss_reports_the_request() {
        let cache = DataCache::new();
        let rec = owner_record();
        let result = CacheLoader.lookup(&cache, ASSOC, &rec, "owner");
        assert_eq!(
            result,
            Outcome::NotLoaded(vec![DataReq::assoc(&rec, "owner")])
        );
    }

    #[test]
    fn cache_hit_resolves() {
        let rec = owner_record();
        let mut cache = DataCache::new();
        cache.insert(
            DataReq::assoc(&rec, "owner"),
            Value::Text("ada".to_string()),
        );
        let result = CacheLoader.lookup(&cache, ASSOC, &rec, "owner");
        assert_eq!(result, Outcome::Ok(Value::Text("ada".to_string())));
    }

    #[test]
    fn req_display() {
        let rec = owner_record();
        let req = DataReq::assoc(&rec, "owner");
        assert_eq!(req.to_string(), "assoc document[Int(5)].owner");
    }

    #[test]
    fn req_to_json() {
        let req = DataReq::new(ASSOC, "document", "owner").with_id(Value::Int(5));
        let rendered = req.to_json();
        assert_eq!(rendered["kind"], "assoc");
        assert_eq!(rendered["type"], "document");
        assert_eq!(rendered["id"], json!(5));
        assert_eq!(rendered["key"], "owner");
    }
}
