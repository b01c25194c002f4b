use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use fairshare_core::errors::DatabaseError;
use fairshare_core::identity::{GitIdentity, NewUser, User, UserRepositoryTrait};
use fairshare_core::Result;

use super::model::{GitIdentityDB, UserDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{git_identities, users};

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn find_user(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        let row = users::table
            .find(user_id)
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {} not found", user_id)))?;
        Ok(User::from(row))
    }

    fn find_user_by_git_email(&self, email: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        git_identities::table
            .filter(git_identities::git_email.eq(email))
            .select(git_identities::user_id)
            .first::<String>(&mut conn)
            .optional()
            .map_err(|e| StorageError::from(e).into())
    }

    fn invited_user_ids(&self, inviter_id: &str) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        users::table
            .filter(users::invited_by.eq(inviter_id))
            .select(users::id)
            .order(users::id.asc())
            .load::<String>(&mut conn)
            .map_err(|e| StorageError::from(e).into())
    }

    async fn insert_user(&self, new_user: NewUser, now: DateTime<Utc>) -> Result<User> {
        self.writer
            .exec(move |conn| -> Result<User> {
                let row = UserDB {
                    id: new_user.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                    invited_by: new_user.invited_by,
                    created_at: now.naive_utc(),
                };
                diesel::insert_into(users::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(User::from(row))
            })
            .await
    }

    async fn link_git_identity(
        &self,
        email: &str,
        user: &str,
        now: DateTime<Utc>,
    ) -> Result<GitIdentity> {
        let email = email.to_string();
        let user = user.to_string();
        self.writer
            .exec(move |conn| -> Result<GitIdentity> {
                let row = GitIdentityDB {
                    git_email: email,
                    user_id: user,
                    created_at: now.naive_utc(),
                };
                diesel::insert_into(git_identities::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(GitIdentity::from(row))
            })
            .await
    }
}
