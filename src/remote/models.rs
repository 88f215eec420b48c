//! Models for the remote resource API.
//!
//! The remote exposes three flat JSON collections. Records arrive untyped
//! and are validated later by the sync mapper, so the model here is a thin
//! wrapper over a string-keyed JSON object plus typed field accessors.

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// Resource kinds
// =============================================================================

/// One of the three mirrored resource collections.
///
/// The order of the variants is the required full-sync order: albums
/// reference users and photos reference albums, so a later kind must not be
/// ingested before the earlier kind has been committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Users,
    Albums,
    Photos,
}

impl ResourceKind {
    /// All kinds in the order a full sync must process them.
    pub fn in_sync_order() -> [ResourceKind; 3] {
        [ResourceKind::Users, ResourceKind::Albums, ResourceKind::Photos]
    }

    /// Endpoint path segment on the remote API.
    pub fn endpoint(&self) -> &'static str {
        match self {
            ResourceKind::Users => "users",
            ResourceKind::Albums => "albums",
            ResourceKind::Photos => "photos",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "users" => Ok(ResourceKind::Users),
            "albums" => Ok(ResourceKind::Albums),
            "photos" => Ok(ResourceKind::Photos),
            other => Err(format!(
                "unknown resource kind '{}' (expected users, albums or photos)",
                other
            )),
        }
    }
}

// =============================================================================
// Raw records
// =============================================================================

/// An untyped record as received from the remote, prior to validation.
#[derive(Clone, Debug, PartialEq)]
pub struct RawRecord {
    fields: Map<String, Value>,
}

impl RawRecord {
    /// Wrap a JSON value, which must be an object. Non-object values have no
    /// usable fields and are dropped at the transport boundary.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(RawRecord { fields }),
            _ => None,
        }
    }

    /// Integer field accessor. Non-numeric values read as absent.
    pub fn integer(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(Value::as_i64)
    }

    /// String field accessor. Non-string values read as absent.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Nested object field accessor.
    pub fn nested(&self, key: &str) -> Option<RawRecord> {
        match self.fields.get(key) {
            Some(Value::Object(fields)) => Some(RawRecord {
                fields: fields.clone(),
            }),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(fields: Map<String, Value>) -> Self {
        RawRecord { fields }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Terminal failure while fetching one resource collection.
///
/// A transport error is fatal to that kind's sync only; it never causes
/// partial writes because nothing is staged before the fetch completes.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be performed (connection refused, timeout, ...).
    #[error("request for {kind} failed: {message}")]
    Connect { kind: ResourceKind, message: String },

    /// The endpoint answered with a non-success HTTP status.
    #[error("{kind} endpoint returned HTTP {status}")]
    Status { kind: ResourceKind, status: u16 },

    /// The response body was not a JSON array.
    #[error("failed to decode {kind} response: {message}")]
    Decode { kind: ResourceKind, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sync_order() {
        assert_eq!(
            ResourceKind::in_sync_order(),
            [
                ResourceKind::Users,
                ResourceKind::Albums,
                ResourceKind::Photos
            ]
        );
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("users".parse(), Ok(ResourceKind::Users));
        assert_eq!("ALBUMS".parse(), Ok(ResourceKind::Albums));
        assert_eq!("photos".parse(), Ok(ResourceKind::Photos));
        assert!("tracks".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_raw_record_accessors() {
        let record = RawRecord::from_value(json!({
            "id": 7,
            "name": "Kurtis Weissnat",
            "company": { "catchPhrase": "Ergonomic zero tolerance" },
            "popularity": "high"
        }))
        .unwrap();

        assert_eq!(record.integer("id"), Some(7));
        assert_eq!(record.string("name"), Some("Kurtis Weissnat"));
        assert_eq!(record.integer("missing"), None);
        // Wrongly-typed fields read as absent
        assert_eq!(record.integer("name"), None);
        assert_eq!(record.string("id"), None);

        let company = record.nested("company").unwrap();
        assert_eq!(company.string("catchPhrase"), Some("Ergonomic zero tolerance"));
        assert_eq!(record.nested("popularity"), None);
    }

    #[test]
    fn test_raw_record_rejects_non_objects() {
        assert!(RawRecord::from_value(json!([1, 2, 3])).is_none());
        assert!(RawRecord::from_value(json!("users")).is_none());
        assert!(RawRecord::from_value(json!(null)).is_none());
    }
}
