//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.
//!
//! Ports return `anyhow::Result` at the infrastructure boundary; the API
//! layer converts failures into the `AppError` taxonomy. "Not found" is
//! modelled as `Ok(None)` / `Ok(false)` so adapters never have to invent
//! domain errors.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Category, EngagementReport, Post, Reply, SiteSettings, Toggle, User,
};

/// Data persistence contract for posts, replies, and their engagement sets.
///
/// Mutations are single atomic statements on the store side (membership
/// insert/delete, in-database toggles and increments), never read-modify-write
/// of a whole record. Cascading deletes run inside one transaction.
#[async_trait]
pub trait PostRepo: Send + Sync {
    // Post lifecycle
    async fn create_post(&self, post: &Post) -> anyhow::Result<()>;
    async fn get_post(&self, id: Uuid) -> anyhow::Result<Option<Post>>;
    async fn list_posts(
        &self,
        category: Option<Category>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Post>>;
    async fn update_content(&self, id: Uuid, title: &str, body: &str) -> anyhow::Result<bool>;
    async fn update_taxonomy(
        &self,
        id: Uuid,
        category: Category,
        tags: &[String],
    ) -> anyhow::Result<bool>;
    /// Deletes the post, its replies, and all attached membership sets.
    async fn delete_post(&self, id: Uuid) -> anyhow::Result<bool>;

    // Moderation state
    async fn toggle_pinned(&self, id: Uuid) -> anyhow::Result<Option<bool>>;
    async fn toggle_locked(&self, id: Uuid) -> anyhow::Result<Option<bool>>;
    async fn toggle_solution(&self, id: Uuid) -> anyhow::Result<Option<bool>>;
    /// Marks the post for review, bumps the flag counter, and records the
    /// latest reporter's reason in a single statement.
    async fn flag_post(&self, id: Uuid, report: &str) -> anyhow::Result<bool>;
    /// Clears `flagged_for_review`, `flag_count`, and `moderation_report`
    /// in a single statement.
    async fn approve_post(&self, id: Uuid) -> anyhow::Result<bool>;

    // Engagement
    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> anyhow::Result<Toggle>;
    async fn toggle_thank(&self, post_id: Uuid, user_id: Uuid) -> anyhow::Result<Toggle>;
    async fn toggle_reply_like(&self, reply_id: Uuid, user_id: Uuid) -> anyhow::Result<Toggle>;
    async fn record_view(&self, id: Uuid) -> anyhow::Result<()>;

    // Replies
    async fn create_reply(&self, reply: &Reply) -> anyhow::Result<()>;
    async fn get_reply(&self, post_id: Uuid, reply_id: Uuid) -> anyhow::Result<Option<Reply>>;
    async fn get_replies(&self, post_id: Uuid) -> anyhow::Result<Vec<Reply>>;
    async fn delete_reply(&self, post_id: Uuid, reply_id: Uuid) -> anyhow::Result<bool>;

    // Cross-post operations
    /// Hard-cascade removal of everything a user authored or touched:
    /// their posts (with replies and sets), their replies elsewhere, and
    /// their like/thank memberships. Returns the number of posts deleted.
    async fn delete_user_content(&self, user_id: Uuid) -> anyhow::Result<u64>;

    // Projections
    /// The moderation queue: flagged posts ordered by flag count, then
    /// recency, capped at `limit`.
    async fn flagged_posts(&self, limit: i64) -> anyhow::Result<Vec<Post>>;
    /// Daily post/reply counts over the trailing `days` buckets plus
    /// all-time top categories and most active users (`top` entries each).
    async fn engagement_report(&self, days: i64, top: i64) -> anyhow::Result<EngagementReport>;
}

/// Account persistence contract.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create_user(&self, user: &User) -> anyhow::Result<()>;
    async fn get_user(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool>;
}

/// Load/update lifecycle for the site-wide settings object.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns the stored settings, or the defaults if none were saved yet.
    async fn load(&self) -> anyhow::Result<SiteSettings>;
    async fn update(&self, settings: &SiteSettings) -> anyhow::Result<()>;
}

/// Identity contract: token issuance/verification and password hashing.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Issues a signed bearer token embedding the user id.
    fn issue_token(&self, user_id: Uuid) -> String;

    /// Verifies a token's signature and extracts the user id.
    fn verify_token(&self, token: &str) -> Option<Uuid>;

    /// Hashes a password for storage.
    fn hash_password(&self, password: &str) -> anyhow::Result<String>;

    /// Verifies a password against a stored hash.
    async fn verify_password(&self, password: &str, hash: &str) -> bool;
}
