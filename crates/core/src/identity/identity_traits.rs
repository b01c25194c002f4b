use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::identity_model::{FundingSource, GitIdentity, NewUser, User};
use crate::Result;

/// Trait defining the contract for user and git-identity storage.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn find_user(&self, user_id: &str) -> Result<User>;
    fn find_user_by_git_email(&self, git_email: &str) -> Result<Option<String>>;
    /// Ids of users whose `invited_by` points at the given user.
    fn invited_user_ids(&self, inviter_id: &str) -> Result<Vec<String>>;
    async fn insert_user(&self, new_user: NewUser, now: DateTime<Utc>) -> Result<User>;
    async fn link_git_identity(
        &self,
        git_email: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<GitIdentity>;
}

/// Trait defining the contract for identity operations.
#[async_trait]
pub trait IdentityServiceTrait: Send + Sync {
    /// Resolves who pays for a sponsor's settlement. This is the only place
    /// that knows about the delegation policy.
    fn resolve_funding_source(&self, sponsor_id: &str) -> Result<FundingSource>;

    /// The linked account for a git email, if any.
    fn resolve_contributor(&self, git_email: &str) -> Result<Option<String>>;

    /// All sponsor identities whose spending draws from this user's pool:
    /// the user themselves plus everyone they invited. Committed-spend sums
    /// must aggregate over these, because contribution rows keep the
    /// original sponsor identity while the money comes from here.
    fn funding_pool_members(&self, paying_user_id: &str) -> Result<Vec<String>>;

    async fn create_user(&self, new_user: NewUser, now: DateTime<Utc>) -> Result<User>;

    async fn link_git_identity(
        &self,
        git_email: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<GitIdentity>;
}
