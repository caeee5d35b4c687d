//! Business counters. Without an installed recorder these are no-ops.

use ::metrics::{counter, describe_counter};

pub const USERS_REGISTERED: &str = "conduit_users_registered_total";
pub const LOGINS_FAILED: &str = "conduit_logins_failed_total";
pub const ARTICLES_CREATED: &str = "conduit_articles_created_total";
pub const ARTICLES_DELETED: &str = "conduit_articles_deleted_total";
pub const TAGS_PRUNED: &str = "conduit_tags_pruned_total";

pub fn describe() {
    describe_counter!(USERS_REGISTERED, "Accounts created");
    describe_counter!(LOGINS_FAILED, "Login attempts rejected for bad credentials");
    describe_counter!(ARTICLES_CREATED, "Articles published");
    describe_counter!(ARTICLES_DELETED, "Articles deleted by their author");
    describe_counter!(TAGS_PRUNED, "Tags removed once no article used them");
}

pub fn user_registered() {
    counter!(USERS_REGISTERED).increment(1);
}

pub fn login_failed() {
    counter!(LOGINS_FAILED).increment(1);
}

pub fn article_created() {
    counter!(ARTICLES_CREATED).increment(1);
}

pub fn article_deleted() {
    counter!(ARTICLES_DELETED).increment(1);
}

pub fn tags_pruned(count: u64) {
    if count > 0 {
        counter!(TAGS_PRUNED).increment(count);
    }
}
