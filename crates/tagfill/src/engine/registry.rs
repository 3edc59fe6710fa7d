//! Provider registry binding placeholder keys to resolvers.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::warn;

use crate::engine::context::ResolutionContext;
use crate::engine::error::ProviderError;
use crate::types::{ProviderKey, Value};

/// A placeholder value provider.
///
/// A provider is a pure function of (context, arguments). `Ok(None)` means
/// the value is absent for this context (e.g. the subject has no such
/// stat); errors and panics are caught at the engine boundary and treated
/// the same way. Providers must be fast and synchronous — anything that
/// blocks belongs off the resolution path, behind a pre-computed value.
///
/// Closures with the matching signature implement `Provider` directly:
///
/// ```
/// use tagfill::{Provider, ProviderError, ResolutionContext, Value};
///
/// let uptime = |_: &ResolutionContext<'_>, _: &[String]| -> Result<Option<Value>, ProviderError> {
///     Ok(Some(Value::Number(1312)))
/// };
/// let _: &dyn Provider = &uptime;
/// ```
pub trait Provider: Send + Sync {
    /// Produce the value for one token, or `None` when absent.
    fn resolve(
        &self,
        ctx: &ResolutionContext<'_>,
        args: &[String],
    ) -> Result<Option<Value>, ProviderError>;
}

impl<F> Provider for F
where
    F: Fn(&ResolutionContext<'_>, &[String]) -> Result<Option<Value>, ProviderError>
        + Send
        + Sync,
{
    fn resolve(
        &self,
        ctx: &ResolutionContext<'_>,
        args: &[String],
    ) -> Result<Option<Value>, ProviderError> {
        self(ctx, args)
    }
}

/// Process-wide mapping from placeholder keys to providers.
///
/// Registrations may happen while other threads resolve: the map is
/// sharded, so lookups never observe a partially constructed entry and
/// never wait on writers beyond a short bounded critical section. Lookups
/// hand out a cloned `Arc`, so a resolution already past its lookup keeps
/// its provider alive even if the key is unregistered underneath it.
///
/// # Example
///
/// ```
/// use tagfill::{ProviderKey, ProviderRegistry, Value};
///
/// let registry = ProviderRegistry::new();
/// registry.register_value(ProviderKey::namespaced("player", "name"), "Ash");
/// assert!(registry.contains(&ProviderKey::namespaced("player", "name")));
///
/// registry.unregister(&ProviderKey::namespaced("player", "name"));
/// assert!(registry.is_empty());
/// ```
#[derive(Default)]
pub struct ProviderRegistry {
    providers: DashMap<ProviderKey, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under a key, replacing any existing one.
    ///
    /// Returns `true` when a previous registration was replaced; the
    /// collision is also logged, since it usually means two features fight
    /// over a key (legitimate during plugin reload, worth noticing
    /// otherwise). Last writer wins.
    pub fn register(&self, key: ProviderKey, provider: impl Provider + 'static) -> bool {
        let replaced = self
            .providers
            .insert(key.clone(), Arc::new(provider))
            .is_some();
        if replaced {
            warn!(key = %key, "provider registration replaced an existing provider");
        }
        replaced
    }

    /// Register a closure that cannot fail.
    pub fn register_fn<F>(&self, key: ProviderKey, f: F) -> bool
    where
        F: Fn(&ResolutionContext<'_>, &[String]) -> Option<Value> + Send + Sync + 'static,
    {
        self.register(
            key,
            move |ctx: &ResolutionContext<'_>, args: &[String]| -> Result<Option<Value>, ProviderError> {
                Ok(f(ctx, args))
            },
        )
    }

    /// Register a constant value.
    pub fn register_value(&self, key: ProviderKey, value: impl Into<Value>) -> bool {
        let value = value.into();
        self.register(
            key,
            move |_: &ResolutionContext<'_>, _: &[String]| -> Result<Option<Value>, ProviderError> {
                Ok(Some(value.clone()))
            },
        )
    }

    /// Remove a registration. Returns `true` if the key was present.
    ///
    /// In-flight resolutions that already looked the provider up finish
    /// with it; subsequent lookups see the key as absent.
    pub fn unregister(&self, key: &ProviderKey) -> bool {
        self.providers.remove(key).is_some()
    }

    /// Remove every provider in a namespace, as a feature does on teardown.
    /// Returns how many registrations were removed.
    pub fn unregister_namespace(&self, namespace: &str) -> usize {
        let keys: Vec<ProviderKey> = self
            .providers
            .iter()
            .filter(|entry| entry.key().namespace() == Some(namespace))
            .map(|entry| entry.key().clone())
            .collect();
        keys.into_iter()
            .filter(|key| self.providers.remove(key).is_some())
            .count()
    }

    /// Look up the provider for a key; absence is not an error.
    pub fn lookup(&self, key: &ProviderKey) -> Option<Arc<dyn Provider>> {
        self.providers.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Whether a provider is registered for the key.
    pub fn contains(&self, key: &ProviderKey) -> bool {
        self.providers.contains_key(key)
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the registry has no providers.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Snapshot of the registered keys, for diagnostics and suggestions.
    pub fn keys(&self) -> Vec<ProviderKey> {
        self.providers
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }
}
