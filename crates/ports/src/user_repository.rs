//! User Repository Port

use async_trait::async_trait;
use slotbook_core::{Result, UserAccount, UserId};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DomainError::Conflict` when the email is already taken
    async fn create_user(&self, user: &UserAccount) -> Result<()>;

    async fn get_user(&self, id: &UserId) -> Result<Option<UserAccount>>;

    /// `email` must already be normalized
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>>;
}
