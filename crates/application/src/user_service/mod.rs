//! Application Service for user records

use slotbook_core::{DomainError, NewUser, Result, UserAccount, UserId};
use slotbook_ports::UserRepository;
use std::sync::Arc;
use tracing::info;

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Fails with `Conflict` when the email is already registered.
    pub async fn register_user(&self, attributes: NewUser) -> Result<UserAccount> {
        let account = attributes.into_account()?;
        self.user_repo.create_user(&account).await?;

        info!(user_id = %account.id, role = account.role.as_str(), "User registered");
        Ok(account)
    }

    pub async fn get_user(&self, id: &str) -> Result<UserAccount> {
        let not_found = || DomainError::NotFound("user not found".to_string());
        let id = UserId::parse(id).ok_or_else(not_found)?;
        self.user_repo.get_user(&id).await?.ok_or_else(not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotbook_adapters::InMemoryUserRepository;
    use slotbook_core::UserRole;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryUserRepository::new()))
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let service = service();
        let account = service
            .register_user(NewUser {
                name: Some("Dr. A".into()),
                email: Some(" Dr.A@Clinic.com ".into()),
                role: Some(UserRole::Provider),
            })
            .await
            .unwrap();

        assert_eq!(account.email, "dr.a@clinic.com");
        assert_eq!(account.role, UserRole::Provider);
        assert_eq!(service.get_user(&account.id.to_string()).await.unwrap(), account);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let service = service();
        let jane = NewUser {
            name: Some("Jane".into()),
            email: Some("jane@x.com".into()),
            role: None,
        };
        service.register_user(jane.clone()).await.unwrap();

        let err = service
            .register_user(NewUser {
                email: Some("JANE@x.com".into()),
                ..jane
            })
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_invalid_input_and_unknown_ids() {
        let service = service();

        let err = service
            .register_user(NewUser {
                name: Some("Jane".into()),
                email: Some("not-an-email".into()),
                role: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        assert!(service.get_user("abc").await.unwrap_err().is_not_found());
        assert!(
            service
                .get_user(&UserId::new().to_string())
                .await
                .unwrap_err()
                .is_not_found()
        );
    }
}
