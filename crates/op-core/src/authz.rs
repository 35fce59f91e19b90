//! # Interaction Rules
//!
//! The single capability-checking module for post interactions. Every route
//! that mutates a post goes through [`authorize`] before touching the store,
//! so the role × action matrix lives in exactly one place and all rule
//! violations are detected before any write happens.
//!
//! Lock policy: a lock freezes a post for everyone below moderator. That
//! includes content edits by the original author. Moderators and admins act
//! through locks.

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Actor, Post, Role};

/// Every mutating interaction an actor can request against a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAction {
    /// Change title and/or body.
    EditContent,
    /// Change category or tags. Immutable by the author after creation.
    EditTaxonomy,
    /// Remove the post and everything under it.
    Delete,
    /// Toggle the pinned flag.
    Pin,
    /// Toggle the locked flag.
    Lock,
    /// Toggle like membership for the acting user.
    Like,
    /// Toggle thank membership for the acting user.
    Thank,
    /// Report the post for moderator review.
    Flag,
    /// Toggle the solution flag.
    MarkSolution,
    /// Clear the flag state (moderation queue "approve").
    Approve,
    /// Delete the post from the moderation queue ("reject").
    Reject,
    /// Append a reply.
    Reply,
    /// Remove one reply. Carries the reply author for the ownership check.
    DeleteReply { reply_author: Uuid },
    /// Toggle like membership on one of the post's replies.
    LikeReply,
}

/// Decides whether `actor` may perform `action` on `post`.
///
/// Returns `Forbidden` when the role/ownership check fails and `Conflict`
/// when the post's lock state blocks an otherwise-permitted action. The two
/// are distinct on purpose: a 403 tells the caller who they are is the
/// problem, a 409 tells them the post's current state is.
pub fn authorize(actor: &Actor, action: PostAction, post: &Post) -> Result<()> {
    let staff = actor.role.is_staff();
    let owner = actor.id == post.author_id;

    match action {
        PostAction::EditContent => {
            if staff {
                Ok(())
            } else if !owner {
                Err(AppError::Forbidden(
                    "only the author or staff may edit a post".into(),
                ))
            } else if post.is_locked {
                Err(AppError::Conflict("post is locked".into()))
            } else {
                Ok(())
            }
        }

        PostAction::Delete => {
            if staff || owner {
                Ok(())
            } else {
                Err(AppError::Forbidden(
                    "only the author or staff may delete a post".into(),
                ))
            }
        }

        // Pinning is the one action reserved for admins alone.
        PostAction::Pin => {
            if actor.role == Role::Admin {
                Ok(())
            } else {
                Err(AppError::Forbidden("only an admin may pin a post".into()))
            }
        }

        PostAction::EditTaxonomy
        | PostAction::Lock
        | PostAction::MarkSolution
        | PostAction::Approve
        | PostAction::Reject => {
            if staff {
                Ok(())
            } else {
                Err(AppError::Forbidden(format!(
                    "{} requires a moderator role",
                    action_name(action)
                )))
            }
        }

        // Open to every authenticated user, gated by the lock for non-staff.
        PostAction::Like | PostAction::Thank | PostAction::Reply | PostAction::LikeReply => {
            if !staff && post.is_locked {
                Err(AppError::Conflict("post is locked".into()))
            } else {
                Ok(())
            }
        }

        // Reporting is never blocked; a locked post can still be flagged.
        PostAction::Flag => Ok(()),

        PostAction::DeleteReply { reply_author } => {
            if staff || actor.id == reply_author {
                Ok(())
            } else {
                Err(AppError::Forbidden(
                    "only the reply author or staff may delete a reply".into(),
                ))
            }
        }
    }
}

/// Gate for surfaces that are not tied to a single post (moderation queue).
pub fn require_staff(actor: &Actor) -> Result<()> {
    if actor.role.is_staff() {
        Ok(())
    } else {
        Err(AppError::Forbidden("requires a moderator role".into()))
    }
}

/// Gate for the admin-only surfaces (analytics, settings, account removal).
pub fn require_admin(actor: &Actor) -> Result<()> {
    if actor.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::Forbidden("requires the admin role".into()))
    }
}

fn action_name(action: PostAction) -> &'static str {
    match action {
        PostAction::EditContent => "editing content",
        PostAction::EditTaxonomy => "editing category or tags",
        PostAction::Delete => "deleting a post",
        PostAction::Pin => "pinning",
        PostAction::Lock => "locking",
        PostAction::Like => "liking",
        PostAction::Thank => "thanking",
        PostAction::Flag => "flagging",
        PostAction::MarkSolution => "marking a solution",
        PostAction::Approve => "approving",
        PostAction::Reject => "rejecting",
        PostAction::Reply => "replying",
        PostAction::DeleteReply { .. } => "deleting a reply",
        PostAction::LikeReply => "liking a reply",
    }
}
