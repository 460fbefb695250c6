//! The Athar target schema.
//!
//! [`athar_tables`] is the structural end state the initializer converges to.
//! The remaining functions return the individual elements that the named
//! column migrations add to databases created before those columns existed.

use crate::schema::{ColumnDef, ForeignKeyDef, IndexDef, OnDelete, TableDef};

const CREATED_AT: &str = "created_at";
const UPDATED_AT: &str = "updated_at";

fn created_at() -> ColumnDef {
    ColumnDef::new(CREATED_AT, "TIMESTAMP").default_value("CURRENT_TIMESTAMP")
}

fn updated_at() -> ColumnDef {
    ColumnDef::new(UPDATED_AT, "TIMESTAMP")
        .default_value("CURRENT_TIMESTAMP")
        .on_update("CURRENT_TIMESTAMP")
}

fn flag(name: &str, default: bool) -> ColumnDef {
    ColumnDef::new(name, "BOOLEAN").default_value(if default { "TRUE" } else { "FALSE" })
}

pub fn users() -> TableDef {
    TableDef::new("users")
        .column(ColumnDef::id())
        .column(ColumnDef::new("phone", "VARCHAR(20)").unique().not_null())
        .column(ColumnDef::new("name", "VARCHAR(100)").not_null())
        .column(ColumnDef::new("email", "VARCHAR(255)").unique())
        .column(ColumnDef::new("password", "VARCHAR(255)").not_null())
        .column(ColumnDef::new("bio", "TEXT"))
        .column(ColumnDef::new("profile_image", "VARCHAR(500)"))
        .column(ColumnDef::new("push_token", "VARCHAR(500)"))
        .column(flag("is_verified", false))
        .column(flag("is_banned", false))
        .column(ColumnDef::new("ban_reason", "TEXT"))
        .column(ColumnDef::new("role", "ENUM('user', 'admin')").default_value("'user'"))
        .column(created_at())
        .column(updated_at())
        .index(IndexDef::plain("idx_phone", &["phone"]))
        .index(IndexDef::plain("idx_email", &["email"]))
        .index(IndexDef::plain("idx_name", &["name"]))
}

pub fn boxes() -> TableDef {
    TableDef::new("boxes")
        .column(ColumnDef::id())
        .column(ColumnDef::new("name", "VARCHAR(100)").not_null())
        .column(ColumnDef::new("description", "TEXT"))
        .column(ColumnDef::new("icon", "VARCHAR(50)"))
        .column(ColumnDef::new("image_url", "VARCHAR(500)"))
        .column(ColumnDef::new("color", "VARCHAR(20)"))
        .column(flag("is_active", true))
        .column(ColumnDef::new("order_index", "INT").default_value("0"))
        .column(created_at())
        .column(updated_at())
        .index(IndexDef::plain("idx_is_active", &["is_active"]))
        .index(IndexDef::plain("idx_order_index", &["order_index"]))
}

pub fn categories() -> TableDef {
    TableDef::new("categories")
        .column(ColumnDef::id())
        .column(ColumnDef::new("name", "VARCHAR(100)").not_null())
        .column(ColumnDef::new("description", "TEXT"))
        .column(ColumnDef::new("icon", "VARCHAR(50)"))
        .column(ColumnDef::new("color", "VARCHAR(20)"))
        .column(ColumnDef::new("box_id", "INT"))
        .column(flag("is_active", true))
        .column(ColumnDef::new("order_index", "INT").default_value("0"))
        .column(created_at())
        .column(updated_at())
        .foreign_key(ForeignKeyDef::new("box_id", "boxes", OnDelete::SetNull))
        .index(IndexDef::plain("idx_box_id", &["box_id"]))
        .index(IndexDef::plain("idx_is_active", &["is_active"]))
        .index(IndexDef::plain("idx_order_index", &["order_index"]))
}

pub fn posts() -> TableDef {
    TableDef::new("posts")
        .column(ColumnDef::id())
        .column(ColumnDef::new("user_id", "INT").not_null())
        .column(ColumnDef::new("type", "ENUM('text', 'image', 'video', 'link')").not_null())
        .column(ColumnDef::new("title", "VARCHAR(255)"))
        .column(ColumnDef::new("content", "TEXT").not_null())
        .column(ColumnDef::new("media_url", "VARCHAR(500)"))
        .column(ColumnDef::new("link_url", "VARCHAR(500)"))
        .column(ColumnDef::new("category", "VARCHAR(50)"))
        .column(flag("is_archived", false))
        .column(flag("is_private", false))
        .column(flag("is_featured", false))
        .column(ColumnDef::new("views_count", "INT").default_value("0"))
        .column(created_at())
        .column(updated_at())
        .foreign_key(ForeignKeyDef::new("user_id", "users", OnDelete::Cascade))
        .index(IndexDef::plain("idx_user_id", &["user_id"]))
        .index(IndexDef::plain("idx_type", &["type"]))
        .index(IndexDef::plain("idx_category", &["category"]))
        .index(IndexDef::plain("idx_is_private", &["is_private"]))
        .index(IndexDef::plain("idx_is_featured", &["is_featured"]))
        .index(IndexDef::plain("idx_created_at", &["created_at"]))
        .index(IndexDef::fulltext("idx_content", &["title", "content"]))
}

pub fn comments() -> TableDef {
    TableDef::new("comments")
        .column(ColumnDef::id())
        .column(ColumnDef::new("post_id", "INT").not_null())
        .column(ColumnDef::new("user_id", "INT").not_null())
        .column(ColumnDef::new("content", "TEXT").not_null())
        .column(ColumnDef::new("parent_id", "INT"))
        .column(created_at())
        .column(updated_at())
        .foreign_key(ForeignKeyDef::new("post_id", "posts", OnDelete::Cascade))
        .foreign_key(ForeignKeyDef::new("user_id", "users", OnDelete::Cascade))
        .foreign_key(ForeignKeyDef::new("parent_id", "comments", OnDelete::Cascade))
        .index(IndexDef::plain("idx_post_id", &["post_id"]))
        .index(IndexDef::plain("idx_user_id", &["user_id"]))
        .index(IndexDef::plain("idx_parent_id", &["parent_id"]))
}

/// `likes` and `favorites` share one shape: a unique (post, user) pair
fn post_reaction(name: &str, unique_name: &str) -> TableDef {
    TableDef::new(name)
        .column(ColumnDef::id())
        .column(ColumnDef::new("post_id", "INT").not_null())
        .column(ColumnDef::new("user_id", "INT").not_null())
        .column(created_at())
        .foreign_key(ForeignKeyDef::new("post_id", "posts", OnDelete::Cascade))
        .foreign_key(ForeignKeyDef::new("user_id", "users", OnDelete::Cascade))
        .index(IndexDef::unique(unique_name, &["post_id", "user_id"]))
        .index(IndexDef::plain("idx_post_id", &["post_id"]))
        .index(IndexDef::plain("idx_user_id", &["user_id"]))
}

pub fn likes() -> TableDef {
    post_reaction("likes", "unique_like")
}

pub fn favorites() -> TableDef {
    post_reaction("favorites", "unique_favorite")
}

pub fn follows() -> TableDef {
    TableDef::new("follows")
        .column(ColumnDef::id())
        .column(ColumnDef::new("follower_id", "INT").not_null())
        .column(follows_following_id_renamed())
        .column(created_at())
        .foreign_key(ForeignKeyDef::new("follower_id", "users", OnDelete::Cascade))
        .foreign_key(follows_following_fk())
        .index(IndexDef::unique("unique_follow", &["follower_id", "following_id"]))
        .index(IndexDef::plain("idx_follower_id", &["follower_id"]))
        .index(follows_following_id_index())
}

pub fn notifications() -> TableDef {
    TableDef::new("notifications")
        .column(ColumnDef::id())
        .column(ColumnDef::new("user_id", "INT").not_null())
        .column(ColumnDef::new("sender_id", "INT"))
        .column(
            ColumnDef::new("type", "ENUM('like', 'comment', 'follow', 'mention', 'admin')")
                .not_null(),
        )
        .column(ColumnDef::new("title", "VARCHAR(255)"))
        .column(ColumnDef::new("content", "TEXT").not_null())
        .column(ColumnDef::new("related_id", "INT"))
        .column(ColumnDef::new("data", "JSON"))
        .column(flag("is_read", false))
        .column(created_at())
        .foreign_key(ForeignKeyDef::new("user_id", "users", OnDelete::Cascade))
        .foreign_key(ForeignKeyDef::new("sender_id", "users", OnDelete::SetNull))
        .index(IndexDef::plain("idx_user_id", &["user_id"]))
        .index(IndexDef::plain("idx_sender_id", &["sender_id"]))
        .index(IndexDef::plain("idx_is_read", &["is_read"]))
        .index(IndexDef::plain("idx_created_at", &["created_at"]))
        .index(IndexDef::plain("idx_related_id", &["related_id"]))
}

pub fn banners() -> TableDef {
    TableDef::new("banners")
        .column(ColumnDef::id())
        .column(ColumnDef::new("title", "VARCHAR(255)").not_null())
        .column(ColumnDef::new("image_url", "VARCHAR(500)").not_null())
        .column(ColumnDef::new("icon", "VARCHAR(50)"))
        .column(ColumnDef::new("target_url", "VARCHAR(500)"))
        .column(flag("is_active", true))
        .column(ColumnDef::new("order_index", "INT").default_value("0"))
        .column(created_at())
        .column(updated_at())
        .index(IndexDef::plain("idx_is_active", &["is_active"]))
        .index(IndexDef::plain("idx_order_index", &["order_index"]))
}

pub fn contact_messages() -> TableDef {
    TableDef::new("contact_messages")
        .column(ColumnDef::id())
        .column(ColumnDef::new("user_id", "INT"))
        .column(ColumnDef::new("name", "VARCHAR(100)"))
        .column(ColumnDef::new("email", "VARCHAR(255)"))
        .column(ColumnDef::new("phone", "VARCHAR(20)"))
        .column(ColumnDef::new("subject", "VARCHAR(255)").not_null())
        .column(ColumnDef::new("message", "TEXT").not_null())
        .column(
            ColumnDef::new("status", "ENUM('pending', 'read', 'replied', 'closed')")
                .default_value("'pending'"),
        )
        .column(ColumnDef::new("admin_reply", "TEXT"))
        .column(ColumnDef::new("replied_by", "INT"))
        .column(ColumnDef::new("replied_at", "TIMESTAMP").null())
        .column(created_at())
        .column(updated_at())
        .foreign_key(ForeignKeyDef::new("user_id", "users", OnDelete::SetNull))
        .foreign_key(ForeignKeyDef::new("replied_by", "users", OnDelete::SetNull))
        .index(IndexDef::plain("idx_user_id", &["user_id"]))
        .index(IndexDef::plain("idx_status", &["status"]))
        .index(IndexDef::plain("idx_created_at", &["created_at"]))
}

pub fn reports() -> TableDef {
    TableDef::new("reports")
        .column(ColumnDef::id())
        .column(ColumnDef::new("reporter_id", "INT").not_null())
        .column(ColumnDef::new("type", "ENUM('post', 'user', 'comment')").not_null())
        .column(ColumnDef::new("target_id", "INT").not_null())
        .column(ColumnDef::new("reason", "VARCHAR(255)").not_null())
        .column(ColumnDef::new("description", "TEXT"))
        .column(
            ColumnDef::new(
                "status",
                "ENUM('pending', 'reviewed', 'resolved', 'dismissed')",
            )
            .default_value("'pending'"),
        )
        .column(ColumnDef::new("admin_notes", "TEXT"))
        .column(created_at())
        .column(updated_at())
        .foreign_key(ForeignKeyDef::new("reporter_id", "users", OnDelete::Cascade))
        .index(IndexDef::plain("idx_reporter_id", &["reporter_id"]))
        .index(IndexDef::plain("idx_type", &["type"]))
        .index(IndexDef::plain("idx_target_id", &["target_id"]))
        .index(IndexDef::plain("idx_status", &["status"]))
        .index(IndexDef::plain("idx_created_at", &["created_at"]))
}

/// Every table the initializer manages, in declaration order.
///
/// Declaration order is not trusted for creation; callers sequence through
/// [`crate::dag::TableDag`].
pub fn athar_tables() -> Vec<TableDef> {
    vec![
        users(),
        boxes(),
        categories(),
        posts(),
        comments(),
        likes(),
        favorites(),
        follows(),
        notifications(),
        banners(),
        contact_messages(),
        reports(),
    ]
}

/// `users.is_banned`
pub fn users_is_banned() -> ColumnDef {
    flag("is_banned", false)
}

/// `users.ban_reason`
pub fn users_ban_reason() -> ColumnDef {
    ColumnDef::new("ban_reason", "TEXT")
}

/// `posts.is_featured`
pub fn posts_is_featured() -> ColumnDef {
    flag("is_featured", false)
}

/// `posts.is_private`, placed after `is_archived`
pub fn posts_is_private() -> ColumnDef {
    flag("is_private", false).after("is_archived")
}

pub fn posts_is_private_index() -> IndexDef {
    IndexDef::plain("idx_is_private", &["is_private"])
}

/// Name an older initializer gave `follows.following_id`
pub const FOLLOWS_LEGACY_FOLLOWED: &str = "followed_id";

/// `follows.following_id` as renamed from `followed_id` (no position hint)
pub fn follows_following_id_renamed() -> ColumnDef {
    ColumnDef::new("following_id", "INT").not_null()
}

/// `follows.following_id` added fresh after `follower_id`
pub fn follows_following_id() -> ColumnDef {
    ColumnDef::new("following_id", "INT")
        .not_null()
        .after("follower_id")
}

pub fn follows_following_id_index() -> IndexDef {
    IndexDef::plain("idx_following_id", &["following_id"])
}

pub fn follows_following_fk() -> ForeignKeyDef {
    ForeignKeyDef::new("following_id", "users", OnDelete::Cascade)
}

/// Legacy column that `notifications.content` replaces
pub const NOTIFICATIONS_LEGACY_BODY: &str = "body";

/// `notifications.content` as renamed from `body` (no position hint)
pub fn notifications_content_renamed() -> ColumnDef {
    ColumnDef::new("content", "TEXT").not_null()
}

/// `notifications.content` added fresh after `title`
pub fn notifications_content() -> ColumnDef {
    ColumnDef::new("content", "TEXT").not_null().after("title")
}

pub fn notifications_related_id() -> ColumnDef {
    ColumnDef::new("related_id", "INT").after("content")
}

pub fn notifications_related_id_index() -> IndexDef {
    IndexDef::plain("idx_related_id", &["related_id"])
}

pub fn notifications_sender_id() -> ColumnDef {
    ColumnDef::new("sender_id", "INT").after("user_id")
}

pub fn notifications_sender_id_index() -> IndexDef {
    IndexDef::plain("idx_sender_id", &["sender_id"])
}

pub fn notifications_sender_fk() -> ForeignKeyDef {
    ForeignKeyDef::new("sender_id", "users", OnDelete::SetNull)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
