//! Logical key catalog for the local store.
//!
//! Every component addresses the store through these keys so that the
//! layout stays consistent across backends.

use joblink_core::models::Collection;

pub const ACCESS_TOKEN: &str = "auth/access_token";
pub const REFRESH_TOKEN: &str = "auth/refresh_token";
pub const LOGGED_IN: &str = "auth/logged_in";
pub const USER_PROFILE: &str = "cache/profile";
pub const CATALOG: &str = "cache/catalog";

/// Key of the pending mutation list for one collection.
pub fn pending_key(collection: Collection) -> String {
    format!("pending/{}", collection.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_keys_are_distinct_per_collection() {
        let keys: Vec<String> = Collection::ALL.iter().map(|c| pending_key(*c)).collect();
        assert_eq!(keys, vec!["pending/bids", "pending/bookings", "pending/messages"]);
    }
}
