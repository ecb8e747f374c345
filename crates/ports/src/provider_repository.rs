//! Provider Repository Port

use async_trait::async_trait;
use slotbook_core::{Provider, ProviderId, Result};

/// Listing filter; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderFilter {
    pub category: Option<String>,
    pub specialty: Option<String>,
}

impl ProviderFilter {
    /// Case-insensitive exact match on every set field.
    pub fn matches(&self, provider: &Provider) -> bool {
        let same = |wanted: &Option<String>, actual: Option<&str>| match wanted {
            None => true,
            Some(w) => actual.is_some_and(|a| a.eq_ignore_ascii_case(w.trim())),
        };
        same(&self.category, Some(provider.category.as_str()))
            && same(&self.specialty, provider.specialty.as_deref())
    }
}

#[async_trait]
pub trait ProviderRepository: Send + Sync {
    /// Stores a newly created provider
    async fn save_provider(&self, provider: &Provider) -> Result<()>;

    /// Overwrites an existing provider; never inserts.
    ///
    /// Returns `false` when the provider no longer exists.
    async fn update_provider(&self, provider: &Provider) -> Result<bool>;

    async fn get_provider(&self, id: &ProviderId) -> Result<Option<Provider>>;

    /// No ordering is guaranteed
    async fn list_providers(&self, filter: &ProviderFilter) -> Result<Vec<Provider>>;

    /// Returns the removed provider, or `None` when no provider had this id
    async fn delete_provider(&self, id: &ProviderId) -> Result<Option<Provider>>;
}
