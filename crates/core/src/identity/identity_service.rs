use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;

use super::identity_model::{FundingSource, GitIdentity, NewUser, User};
use super::identity_traits::{IdentityServiceTrait, UserRepositoryTrait};
use crate::Result;

/// Service for accounts, git-identity links and the delegation policy.
pub struct IdentityService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl IdentityService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl IdentityServiceTrait for IdentityService {
    fn resolve_funding_source(&self, sponsor_id: &str) -> Result<FundingSource> {
        let sponsor = self.repository.find_user(sponsor_id)?;
        let paying_user_id = match sponsor.invited_by {
            Some(inviter_id) => {
                // one level only: the inviter pays, the inviter's own
                // inviter does not
                let inviter = self.repository.find_user(&inviter_id)?;
                debug!(
                    "sponsor {} draws from inviting user {}",
                    sponsor_id, inviter.id
                );
                inviter.id
            }
            None => sponsor.id,
        };
        Ok(FundingSource {
            sponsor_id: sponsor_id.to_string(),
            paying_user_id,
        })
    }

    fn resolve_contributor(&self, git_email: &str) -> Result<Option<String>> {
        self.repository.find_user_by_git_email(git_email)
    }

    fn funding_pool_members(&self, paying_user_id: &str) -> Result<Vec<String>> {
        let mut members = vec![paying_user_id.to_string()];
        members.extend(self.repository.invited_user_ids(paying_user_id)?);
        Ok(members)
    }

    async fn create_user(&self, new_user: NewUser, now: DateTime<Utc>) -> Result<User> {
        self.repository.insert_user(new_user, now).await
    }

    async fn link_git_identity(
        &self,
        git_email: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<GitIdentity> {
        self.repository.link_git_identity(git_email, user_id, now).await
    }
}
