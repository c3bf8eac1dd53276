use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::social_accounts::SocialAccountEntity;

#[automock]
#[async_trait]
pub trait SocialAccountRepository {
    /// Active accounts of the owner on any of `platforms`.
    async fn list_connected(
        &self,
        owner_id: Uuid,
        platforms: Vec<String>,
    ) -> Result<Vec<SocialAccountEntity>>;
}
