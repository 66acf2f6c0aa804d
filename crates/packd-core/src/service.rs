// ABOUTME: StoreService composes both stores with an injected source resolver.
// ABOUTME: Hosts hold one service per process instead of subclassing their server type.

use serde_json::Value;
use thiserror::Error;

use crate::store::{NamedStore, UnnamedStore};

/// The external source-identifier derivation failed. Propagated to the
/// caller untouched; the store never retries.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("source resolution failed: {0}")]
pub struct ResolveError(pub String);

/// Derives the identity string for the caller of a record operation.
/// The host HTTP layer implements this (conceptually: base URL joined with
/// the request path); the store treats the result as an opaque key that
/// `by_source` queries match against.
pub trait SourceResolver {
    fn resolve(&self) -> Result<String, ResolveError>;
}

/// A resolver that always returns the same identity. Useful for hosts with
/// a single ingress point and for tests.
#[derive(Debug, Clone)]
pub struct StaticResolver(pub String);

impl SourceResolver for StaticResolver {
    fn resolve(&self) -> Result<String, ResolveError> {
        Ok(self.0.clone())
    }
}

/// Owns the two stores plus the resolver. Performs no internal locking: a
/// host dispatching requests concurrently must serialize mutating calls
/// (and any read that must observe them) through its own lock.
pub struct StoreService<R: SourceResolver> {
    resolver: R,
    pub named: NamedStore,
    pub unnamed: UnnamedStore,
}

impl<R: SourceResolver> StoreService<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            named: NamedStore::new(),
            unnamed: UnnamedStore::new(),
        }
    }

    /// Resolve the caller identity and append the payload as a packet.
    /// Returns the new packet's index. A resolver failure leaves the store
    /// unchanged.
    pub fn record(&mut self, data: Value) -> Result<usize, ResolveError> {
        let source = self.resolver.resolve()?;
        Ok(self.unnamed.append(source, data))
    }

    /// Replace both stores with freshly decoded state, e.g. after a
    /// snapshot load.
    pub fn replace(&mut self, named: NamedStore, unnamed: UnnamedStore) {
        self.named = named;
        self.unnamed = unnamed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FailingResolver;

    impl SourceResolver for FailingResolver {
        fn resolve(&self) -> Result<String, ResolveError> {
            Err(ResolveError("no active request".to_string()))
        }
    }

    #[test]
    fn record_appends_with_resolved_source() {
        let mut service = StoreService::new(StaticResolver("host/api/ingest".to_string()));

        let index = service.record(json!({"a": 1})).unwrap();
        assert_eq!(index, 0);

        let packet = service.unnamed.get(0).unwrap();
        assert_eq!(packet.source(), "host/api/ingest");
        assert_eq!(packet.data(), &json!({"a": 1}));
    }

    #[test]
    fn resolver_failure_propagates_and_stores_nothing() {
        let mut service = StoreService::new(FailingResolver);

        let err = service.record(json!({"a": 1})).unwrap_err();
        assert_eq!(err, ResolveError("no active request".to_string()));
        assert!(service.unnamed.is_empty());
    }

    #[test]
    fn replace_swaps_both_stores() {
        let mut service = StoreService::new(StaticResolver("host".to_string()));
        service.record(json!({"old": true})).unwrap();
        service.named.upsert("old", json!(1));

        let mut named = NamedStore::new();
        named.upsert("new", json!(2));
        let mut unnamed = UnnamedStore::new();
        unnamed.append("other", json!({"new": true}));

        service.replace(named, unnamed);

        assert!(service.named.get("old").is_err());
        assert_eq!(service.named.get("new").unwrap(), &json!(2));
        assert_eq!(service.unnamed.len(), 1);
        assert_eq!(service.unnamed.get(0).unwrap().source(), "other");
    }
}
