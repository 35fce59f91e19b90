//! # Domain Models
//!
//! These structs represent the core entities of Outpost.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed discussion categories for the community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    Housing,
    Jobs,
    Visas,
    Social,
    Marketplace,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::General,
        Category::Housing,
        Category::Jobs,
        Category::Visas,
        Category::Social,
        Category::Marketplace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Housing => "housing",
            Category::Jobs => "jobs",
            Category::Visas => "visas",
            Category::Social => "social",
            Category::Marketplace => "marketplace",
        }
    }

    /// Parses a category code. Unknown codes are a validation concern
    /// for the caller, so this returns `None` rather than an error type.
    pub fn parse(code: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_str() == code)
    }
}

/// Actor roles, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    pub fn parse(code: &str) -> Option<Role> {
        match code {
            "user" => Some(Role::User),
            "moderator" => Some(Role::Moderator),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Moderators and admins share most moderation capabilities.
    pub fn is_staff(self) -> bool {
        self >= Role::Moderator
    }
}

/// The authenticated identity attached to every mutating call.
/// Supplied by the auth collaborator; the rule engine trusts it as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

/// A registered community member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Argon2 PHC string. Never serialized outward.
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// One forum submission.
///
/// The `like_count` / `thank_count` / `reply_count` fields are cardinalities
/// of the underlying membership sets, computed by the store on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub is_pinned: bool,
    pub is_locked: bool,
    pub is_solution: bool,
    pub flagged_for_review: bool,
    pub flag_count: i64,
    /// Latest reporter's reason. Cleared on approval.
    pub moderation_report: Option<String>,
    pub views: i64,
    pub like_count: i64,
    pub thank_count: i64,
    pub reply_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A reply beneath a post, with its own like set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Result of a like/thank toggle: whether the membership is now active,
/// and the set cardinality after the toggle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Toggle {
    pub active: bool,
    pub count: i64,
}

/// Site-wide settings, injected explicitly wherever needed.
/// Loaded and updated through the `SettingsStore` port; no ambient singleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    pub site_name: String,
    pub tagline: String,
    pub posts_per_page: i64,
    pub moderation_queue_size: i64,
    pub max_tags_per_post: usize,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "Outpost".to_string(),
            tagline: "A community for those living abroad".to_string(),
            posts_per_page: 20,
            moderation_queue_size: 20,
            max_tags_per_post: 5,
        }
    }
}

/// One day bucket of the rolling activity window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyActivity {
    /// Day in `YYYY-MM-DD` form (UTC).
    pub day: String,
    pub posts: i64,
    pub replies: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryActivity {
    pub category: Category,
    pub posts: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserActivity {
    pub user_id: Uuid,
    pub username: String,
    pub posts: i64,
}

/// Admin analytics snapshot. Recomputed from the store on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementReport {
    pub days: Vec<DailyActivity>,
    /// Totals over the whole window covered by `days`.
    pub week_posts: i64,
    pub week_replies: i64,
    pub top_categories: Vec<CategoryActivity>,
    pub most_active: Vec<UserActivity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_codes_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("politics"), None);
    }

    #[test]
    fn role_privilege_ordering() {
        assert!(Role::Admin > Role::Moderator);
        assert!(Role::Moderator > Role::User);
        assert!(Role::Moderator.is_staff());
        assert!(!Role::User.is_staff());
    }
}
