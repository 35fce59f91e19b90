//! # op-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational
//! model and the `op-core` domain models.
//!
//! Like/thank sets are membership tables keyed by `(target, user)`, so a
//! toggle is an `INSERT OR IGNORE` / `DELETE` pair arbitrated by the primary
//! key rather than a read-modify-write of the post. Pin/lock/solution
//! toggles and the view/flag counters are computed inside the UPDATE
//! statement itself.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use op_core::models::{
    Category, CategoryActivity, DailyActivity, EngagementReport, Post, Reply, Role, SiteSettings,
    Toggle, User, UserActivity,
};
use op_core::traits::{PostRepo, SettingsStore, UserRepo};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

/// Table-creation statements, applied idempotently on connect.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id            BLOB PRIMARY KEY,
        username      TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role          TEXT NOT NULL,
        created_at    TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS posts (
        id                 BLOB PRIMARY KEY,
        author_id          BLOB NOT NULL,
        title              TEXT NOT NULL,
        body               TEXT NOT NULL,
        category           TEXT NOT NULL,
        tags               TEXT NOT NULL,
        is_pinned          INTEGER NOT NULL DEFAULT 0,
        is_locked          INTEGER NOT NULL DEFAULT 0,
        is_solution        INTEGER NOT NULL DEFAULT 0,
        flagged_for_review INTEGER NOT NULL DEFAULT 0,
        flag_count         INTEGER NOT NULL DEFAULT 0,
        moderation_report  TEXT,
        views              INTEGER NOT NULL DEFAULT 0,
        created_at         TEXT NOT NULL,
        updated_at         TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS replies (
        id         BLOB PRIMARY KEY,
        post_id    BLOB NOT NULL,
        author_id  BLOB NOT NULL,
        body       TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS post_likes (
        post_id BLOB NOT NULL,
        user_id BLOB NOT NULL,
        PRIMARY KEY (post_id, user_id)
    )",
    "CREATE TABLE IF NOT EXISTS post_thanks (
        post_id BLOB NOT NULL,
        user_id BLOB NOT NULL,
        PRIMARY KEY (post_id, user_id)
    )",
    "CREATE TABLE IF NOT EXISTS reply_likes (
        reply_id BLOB NOT NULL,
        user_id  BLOB NOT NULL,
        PRIMARY KEY (reply_id, user_id)
    )",
    "CREATE TABLE IF NOT EXISTS site_settings (
        id   INTEGER PRIMARY KEY CHECK (id = 1),
        data TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_replies_post ON replies (post_id)",
    "CREATE INDEX IF NOT EXISTS idx_posts_author ON posts (author_id)",
    "CREATE INDEX IF NOT EXISTS idx_posts_category ON posts (category)",
];

/// Base SELECT carrying the membership-set cardinalities alongside the row.
const SELECT_POST: &str = "SELECT p.*,
    (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS like_count,
    (SELECT COUNT(*) FROM post_thanks t WHERE t.post_id = p.id) AS thank_count,
    (SELECT COUNT(*) FROM replies r WHERE r.post_id = p.id) AS reply_count
    FROM posts p";

const SELECT_REPLY: &str = "SELECT r.*,
    (SELECT COUNT(*) FROM reply_likes rl WHERE rl.reply_id = r.id) AS like_count
    FROM replies r";

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

// Helpers for UUID conversion
fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

fn blob_to_uuid(blob: &[u8]) -> Uuid {
    Uuid::from_slice(blob).unwrap_or_default()
}

fn post_from_row(row: &SqliteRow) -> anyhow::Result<Post> {
    let category: String = row.get("category");
    let category = Category::parse(&category)
        .ok_or_else(|| anyhow::anyhow!("unknown category code in store: {category}"))?;

    Ok(Post {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        author_id: blob_to_uuid(row.get::<Vec<u8>, _>("author_id").as_slice()),
        title: row.get("title"),
        body: row.get("body"),
        category,
        tags: serde_json::from_str(&row.get::<String, _>("tags")).unwrap_or_default(),
        is_pinned: row.get("is_pinned"),
        is_locked: row.get("is_locked"),
        is_solution: row.get("is_solution"),
        flagged_for_review: row.get("flagged_for_review"),
        flag_count: row.get("flag_count"),
        moderation_report: row.get("moderation_report"),
        views: row.get("views"),
        like_count: row.get("like_count"),
        thank_count: row.get("thank_count"),
        reply_count: row.get("reply_count"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn reply_from_row(row: &SqliteRow) -> Reply {
    Reply {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        post_id: blob_to_uuid(row.get::<Vec<u8>, _>("post_id").as_slice()),
        author_id: blob_to_uuid(row.get::<Vec<u8>, _>("author_id").as_slice()),
        body: row.get("body"),
        like_count: row.get("like_count"),
        created_at: row.get("created_at"),
    }
}

fn user_from_row(row: &SqliteRow) -> anyhow::Result<User> {
    let role: String = row.get("role");
    let role =
        Role::parse(&role).ok_or_else(|| anyhow::anyhow!("unknown role in store: {role}"))?;

    Ok(User {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        role,
        created_at: row.get("created_at"),
    })
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `url` and applies the
    /// schema. SQLite permits a single writer at a time; a single pooled
    /// connection also keeps `sqlite::memory:` databases alive between calls.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Membership toggle shared by post likes, post thanks, and reply likes.
    /// The primary key arbitrates concurrent writers: the insert either
    /// claims the membership or is ignored, and an ignored insert means the
    /// membership existed and is removed instead.
    async fn toggle_membership(
        &self,
        table: &str,
        key_column: &str,
        key: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Toggle> {
        let inserted = sqlx::query(&format!(
            "INSERT OR IGNORE INTO {table} ({key_column}, user_id) VALUES (?, ?)"
        ))
        .bind(uuid_to_blob(key))
        .bind(uuid_to_blob(user_id))
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 0 {
            sqlx::query(&format!(
                "DELETE FROM {table} WHERE {key_column} = ? AND user_id = ?"
            ))
            .bind(uuid_to_blob(key))
            .bind(uuid_to_blob(user_id))
            .execute(&self.pool)
            .await?;
        }

        let count: i64 = sqlx::query(&format!(
            "SELECT COUNT(*) AS n FROM {table} WHERE {key_column} = ?"
        ))
        .bind(uuid_to_blob(key))
        .fetch_one(&self.pool)
        .await?
        .get("n");

        Ok(Toggle {
            active: inserted > 0,
            count,
        })
    }

    /// Flips a boolean column inside the UPDATE itself and returns the new
    /// value, or `None` if the post does not exist.
    async fn toggle_flag_column(&self, column: &str, id: Uuid) -> anyhow::Result<Option<bool>> {
        let row = sqlx::query(&format!(
            "UPDATE posts SET {column} = NOT {column} WHERE id = ? RETURNING {column}"
        ))
        .bind(uuid_to_blob(id))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.get::<bool, _>(0)))
    }
}

#[async_trait]
impl PostRepo for SqliteStore {
    async fn create_post(&self, post: &Post) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO posts (id, author_id, title, body, category, tags,
                is_pinned, is_locked, is_solution, flagged_for_review,
                flag_count, moderation_report, views, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(post.id))
        .bind(uuid_to_blob(post.author_id))
        .bind(&post.title)
        .bind(&post.body)
        .bind(post.category.as_str())
        .bind(serde_json::to_string(&post.tags)?)
        .bind(post.is_pinned)
        .bind(post.is_locked)
        .bind(post.is_solution)
        .bind(post.flagged_for_review)
        .bind(post.flag_count)
        .bind(&post.moderation_report)
        .bind(post.views)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_post(&self, id: Uuid) -> anyhow::Result<Option<Post>> {
        let row = sqlx::query(&format!("{SELECT_POST} WHERE p.id = ?"))
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(post_from_row).transpose()
    }

    async fn list_posts(
        &self,
        category: Option<Category>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Post>> {
        // Pinned posts surface first, then newest.
        let rows = match category {
            Some(category) => {
                sqlx::query(&format!(
                    "{SELECT_POST} WHERE p.category = ?
                     ORDER BY p.is_pinned DESC, p.created_at DESC LIMIT ? OFFSET ?"
                ))
                .bind(category.as_str())
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "{SELECT_POST}
                     ORDER BY p.is_pinned DESC, p.created_at DESC LIMIT ? OFFSET ?"
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(post_from_row).collect()
    }

    async fn update_content(&self, id: Uuid, title: &str, body: &str) -> anyhow::Result<bool> {
        let affected =
            sqlx::query("UPDATE posts SET title = ?, body = ?, updated_at = ? WHERE id = ?")
                .bind(title)
                .bind(body)
                .bind(Utc::now())
                .bind(uuid_to_blob(id))
                .execute(&self.pool)
                .await?
                .rows_affected();
        Ok(affected > 0)
    }

    async fn update_taxonomy(
        &self,
        id: Uuid,
        category: Category,
        tags: &[String],
    ) -> anyhow::Result<bool> {
        let affected =
            sqlx::query("UPDATE posts SET category = ?, tags = ?, updated_at = ? WHERE id = ?")
                .bind(category.as_str())
                .bind(serde_json::to_string(tags)?)
                .bind(Utc::now())
                .bind(uuid_to_blob(id))
                .execute(&self.pool)
                .await?
                .rows_affected();
        Ok(affected > 0)
    }

    /// Removes the post, its replies, and every attached membership row.
    ///
    /// # Developer Note
    /// The whole cascade runs in one transaction so no reader observes a
    /// post with its replies half-removed, and no orphaned replies survive.
    async fn delete_post(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut tx = self.pool.begin().await?;
        let blob = uuid_to_blob(id);

        sqlx::query(
            "DELETE FROM reply_likes WHERE reply_id IN (SELECT id FROM replies WHERE post_id = ?)",
        )
        .bind(&blob)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM replies WHERE post_id = ?")
            .bind(&blob)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM post_likes WHERE post_id = ?")
            .bind(&blob)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM post_thanks WHERE post_id = ?")
            .bind(&blob)
            .execute(&mut *tx)
            .await?;
        let affected = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(&blob)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(affected > 0)
    }

    async fn toggle_pinned(&self, id: Uuid) -> anyhow::Result<Option<bool>> {
        self.toggle_flag_column("is_pinned", id).await
    }

    async fn toggle_locked(&self, id: Uuid) -> anyhow::Result<Option<bool>> {
        self.toggle_flag_column("is_locked", id).await
    }

    async fn toggle_solution(&self, id: Uuid) -> anyhow::Result<Option<bool>> {
        self.toggle_flag_column("is_solution", id).await
    }

    async fn flag_post(&self, id: Uuid, report: &str) -> anyhow::Result<bool> {
        let affected = sqlx::query(
            "UPDATE posts SET flagged_for_review = 1,
                flag_count = flag_count + 1,
                moderation_report = ?
             WHERE id = ?",
        )
        .bind(report)
        .bind(uuid_to_blob(id))
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(affected > 0)
    }

    async fn approve_post(&self, id: Uuid) -> anyhow::Result<bool> {
        // All three moderation fields reset in one statement.
        let affected = sqlx::query(
            "UPDATE posts SET flagged_for_review = 0,
                flag_count = 0,
                moderation_report = NULL
             WHERE id = ?",
        )
        .bind(uuid_to_blob(id))
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(affected > 0)
    }

    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> anyhow::Result<Toggle> {
        self.toggle_membership("post_likes", "post_id", post_id, user_id)
            .await
    }

    async fn toggle_thank(&self, post_id: Uuid, user_id: Uuid) -> anyhow::Result<Toggle> {
        self.toggle_membership("post_thanks", "post_id", post_id, user_id)
            .await
    }

    async fn toggle_reply_like(&self, reply_id: Uuid, user_id: Uuid) -> anyhow::Result<Toggle> {
        self.toggle_membership("reply_likes", "reply_id", reply_id, user_id)
            .await
    }

    async fn record_view(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("UPDATE posts SET views = views + 1 WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_reply(&self, reply: &Reply) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO replies (id, post_id, author_id, body, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(reply.id))
        .bind(uuid_to_blob(reply.post_id))
        .bind(uuid_to_blob(reply.author_id))
        .bind(&reply.body)
        .bind(reply.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_reply(&self, post_id: Uuid, reply_id: Uuid) -> anyhow::Result<Option<Reply>> {
        let row = sqlx::query(&format!("{SELECT_REPLY} WHERE r.id = ? AND r.post_id = ?"))
            .bind(uuid_to_blob(reply_id))
            .bind(uuid_to_blob(post_id))
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(reply_from_row))
    }

    async fn get_replies(&self, post_id: Uuid) -> anyhow::Result<Vec<Reply>> {
        let rows = sqlx::query(&format!(
            "{SELECT_REPLY} WHERE r.post_id = ? ORDER BY r.created_at ASC, r.id ASC"
        ))
        .bind(uuid_to_blob(post_id))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(reply_from_row).collect())
    }

    async fn delete_reply(&self, post_id: Uuid, reply_id: Uuid) -> anyhow::Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM reply_likes WHERE reply_id = ?")
            .bind(uuid_to_blob(reply_id))
            .execute(&mut *tx)
            .await?;
        let affected = sqlx::query("DELETE FROM replies WHERE id = ? AND post_id = ?")
            .bind(uuid_to_blob(reply_id))
            .bind(uuid_to_blob(post_id))
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(affected > 0)
    }

    async fn delete_user_content(&self, user_id: Uuid) -> anyhow::Result<u64> {
        let mut tx = self.pool.begin().await?;
        let blob = uuid_to_blob(user_id);

        // Likes on replies under the user's posts, and on the user's own
        // replies elsewhere, go first so nothing dangles.
        sqlx::query(
            "DELETE FROM reply_likes WHERE reply_id IN (
                SELECT id FROM replies WHERE author_id = ?
                    OR post_id IN (SELECT id FROM posts WHERE author_id = ?))",
        )
        .bind(&blob)
        .bind(&blob)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "DELETE FROM replies WHERE author_id = ?
                OR post_id IN (SELECT id FROM posts WHERE author_id = ?)",
        )
        .bind(&blob)
        .bind(&blob)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "DELETE FROM post_likes WHERE user_id = ?
                OR post_id IN (SELECT id FROM posts WHERE author_id = ?)",
        )
        .bind(&blob)
        .bind(&blob)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "DELETE FROM post_thanks WHERE user_id = ?
                OR post_id IN (SELECT id FROM posts WHERE author_id = ?)",
        )
        .bind(&blob)
        .bind(&blob)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM reply_likes WHERE user_id = ?")
            .bind(&blob)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM posts WHERE author_id = ?")
            .bind(&blob)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(deleted)
    }

    async fn flagged_posts(&self, limit: i64) -> anyhow::Result<Vec<Post>> {
        let rows = sqlx::query(&format!(
            "{SELECT_POST} WHERE p.flagged_for_review = 1 OR p.flag_count > 0
             ORDER BY p.flag_count DESC, p.created_at DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(post_from_row).collect()
    }

    async fn engagement_report(&self, days: i64, top: i64) -> anyhow::Result<EngagementReport> {
        let window = format!("-{} days", days - 1);

        let mut posts_per_day: HashMap<String, i64> = HashMap::new();
        for row in sqlx::query(
            "SELECT date(created_at) AS day, COUNT(*) AS n FROM posts
             WHERE date(created_at) >= date('now', ?) GROUP BY day",
        )
        .bind(&window)
        .fetch_all(&self.pool)
        .await?
        {
            posts_per_day.insert(row.get("day"), row.get("n"));
        }

        let mut replies_per_day: HashMap<String, i64> = HashMap::new();
        for row in sqlx::query(
            "SELECT date(created_at) AS day, COUNT(*) AS n FROM replies
             WHERE date(created_at) >= date('now', ?) GROUP BY day",
        )
        .bind(&window)
        .fetch_all(&self.pool)
        .await?
        {
            replies_per_day.insert(row.get("day"), row.get("n"));
        }

        // Emit every bucket in the window, zero-filled, oldest first.
        let today = Utc::now().date_naive();
        let mut series = Vec::with_capacity(days as usize);
        for offset in (0..days).rev() {
            let day = (today - Duration::days(offset))
                .format("%Y-%m-%d")
                .to_string();
            series.push(DailyActivity {
                posts: posts_per_day.get(&day).copied().unwrap_or(0),
                replies: replies_per_day.get(&day).copied().unwrap_or(0),
                day,
            });
        }

        let mut top_categories = Vec::new();
        for row in sqlx::query(
            "SELECT category, COUNT(*) AS n FROM posts
             GROUP BY category ORDER BY n DESC, category ASC LIMIT ?",
        )
        .bind(top)
        .fetch_all(&self.pool)
        .await?
        {
            let code: String = row.get("category");
            let category = Category::parse(&code)
                .ok_or_else(|| anyhow::anyhow!("unknown category code in store: {code}"))?;
            top_categories.push(CategoryActivity {
                category,
                posts: row.get("n"),
            });
        }

        let mut most_active = Vec::new();
        for row in sqlx::query(
            "SELECT u.id, u.username, COUNT(p.id) AS n
             FROM posts p JOIN users u ON u.id = p.author_id
             GROUP BY u.id, u.username ORDER BY n DESC, u.username ASC LIMIT ?",
        )
        .bind(top)
        .fetch_all(&self.pool)
        .await?
        {
            most_active.push(UserActivity {
                user_id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
                username: row.get("username"),
                posts: row.get("n"),
            });
        }

        Ok(EngagementReport {
            week_posts: series.iter().map(|d| d.posts).sum(),
            week_replies: series.iter().map(|d| d.replies).sum(),
            days: series,
            top_categories,
            most_active,
        })
    }
}

#[async_trait]
impl UserRepo for SqliteStore {
    async fn create_user(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO users (id, username, password_hash, role, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(user.id))
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn get_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool> {
        let affected = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }
}

#[async_trait]
impl SettingsStore for SqliteStore {
    async fn load(&self) -> anyhow::Result<SiteSettings> {
        let row = sqlx::query("SELECT data FROM site_settings WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(serde_json::from_str(&row.get::<String, _>("data"))?),
            None => Ok(SiteSettings::default()),
        }
    }

    async fn update(&self, settings: &SiteSettings) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO site_settings (id, data) VALUES (1, ?)
             ON CONFLICT (id) DO UPDATE SET data = excluded.data",
        )
        .bind(serde_json::to_string(settings)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
