//! Provider entity
//!
//! A provider is anything a client can book: a doctor, a salon, a workshop.
//! It offers an ordered list of slot labels (`"09:00"`, `"morning"`, ...)
//! that bookings reference by value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ids::{ProviderId, UserId};
use crate::validation::{RequiredFields, non_blank};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    pub category: String,
    pub specialty: Option<String>,
    pub slots: Vec<String>,
    pub avatar: Option<String>,
    /// Account notified about bookings made with this provider.
    pub owner_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Provider {
    /// Whether `slot` may be booked with this provider.
    ///
    /// Providers that declare no slots accept any label.
    pub fn offers_slot(&self, slot: &str) -> bool {
        self.slots.is_empty() || self.slots.iter().any(|s| s == slot)
    }

    /// Merges the present fields of `patch` into this provider.
    pub fn apply(&mut self, patch: ProviderPatch) -> Result<()> {
        let mut required = RequiredFields::default();
        let name = patch.name.map(|n| required.take("name", Some(n)));
        let category = patch.category.map(|c| required.take("category", Some(c)));
        required.finish()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(specialty) = patch.specialty {
            self.specialty = non_blank(Some(specialty));
        }
        if let Some(slots) = patch.slots {
            self.slots = normalize_slots(slots);
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = non_blank(Some(avatar));
        }
        if let Some(owner_id) = patch.owner_id {
            self.owner_id = Some(owner_id);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn summary(&self) -> ProviderSummary {
        ProviderSummary {
            id: self.id,
            name: self.name.clone(),
            category: self.category.clone(),
            specialty: self.specialty.clone(),
        }
    }
}

/// Attributes for a new provider, as received from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProvider {
    pub name: Option<String>,
    pub category: Option<String>,
    pub specialty: Option<String>,
    pub slots: Option<Vec<String>>,
    pub avatar: Option<String>,
    pub owner_id: Option<UserId>,
}

impl NewProvider {
    pub fn into_provider(self) -> Result<Provider> {
        let mut required = RequiredFields::default();
        let name = required.take("name", self.name);
        let category = required.take("category", self.category);
        required.finish()?;

        let now = Utc::now();
        Ok(Provider {
            id: ProviderId::new(),
            name,
            category,
            specialty: non_blank(self.specialty),
            slots: normalize_slots(self.slots.unwrap_or_default()),
            avatar: non_blank(self.avatar),
            owner_id: self.owner_id,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub specialty: Option<String>,
    pub slots: Option<Vec<String>>,
    pub avatar: Option<String>,
    pub owner_id: Option<UserId>,
}

/// Compact provider view embedded in booking listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub id: ProviderId,
    pub name: String,
    pub category: String,
    pub specialty: Option<String>,
}

fn normalize_slots(slots: Vec<String>) -> Vec<String> {
    slots
        .into_iter()
        .filter_map(|s| non_blank(Some(s)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;

    fn dr_a() -> Provider {
        NewProvider {
            name: Some("Dr. A".into()),
            category: Some("Medical".into()),
            ..Default::default()
        }
        .into_provider()
        .unwrap()
    }

    #[test]
    fn test_create_provider_with_required_fields() {
        let provider = dr_a();
        assert_eq!(provider.name, "Dr. A");
        assert_eq!(provider.category, "Medical");
        assert!(provider.slots.is_empty());
        assert!(provider.specialty.is_none());
        assert_eq!(provider.created_at, provider.updated_at);
    }

    #[test]
    fn test_create_provider_rejects_missing_category() {
        let err = NewProvider {
            name: Some("Dr. A".into()),
            category: Some("  ".into()),
            ..Default::default()
        }
        .into_provider()
        .unwrap_err();

        assert_eq!(
            err,
            DomainError::Validation("missing required fields: category".into())
        );
    }

    #[test]
    fn test_slots_are_trimmed_and_blank_labels_dropped() {
        let provider = NewProvider {
            name: Some("Clinic".into()),
            category: Some("Medical".into()),
            slots: Some(vec![" 09:00".into(), "".into(), "10:00 ".into()]),
            ..Default::default()
        }
        .into_provider()
        .unwrap();

        assert_eq!(provider.slots, vec!["09:00", "10:00"]);
        assert!(provider.offers_slot("09:00"));
        assert!(!provider.offers_slot("11:00"));
    }

    #[test]
    fn test_provider_without_slots_offers_any_label() {
        assert!(dr_a().offers_slot("whenever"));
    }

    #[test]
    fn test_apply_merges_only_present_fields() {
        let mut provider = dr_a();
        provider
            .apply(ProviderPatch {
                specialty: Some("Cardiology".into()),
                slots: Some(vec!["08:00".into()]),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(provider.name, "Dr. A");
        assert_eq!(provider.specialty.as_deref(), Some("Cardiology"));
        assert_eq!(provider.slots, vec!["08:00"]);
    }

    #[test]
    fn test_apply_rejects_blank_name_and_leaves_provider_unchanged() {
        let mut provider = dr_a();
        let before = provider.clone();
        let err = provider
            .apply(ProviderPatch {
                name: Some(" ".into()),
                specialty: Some("Cardiology".into()),
                ..Default::default()
            })
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(provider, before);
    }
}
