// Domain data model for the storefront client.
//
// Wire shapes use camelCase field names to match the remote API and the
// persisted JSON payloads. Timestamps are ISO-8601 (`DateTime<Utc>`),
// except the token issue time which is stored as raw epoch-ms by the
// token manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Roles ──────────────────────────────────────────────────────────

/// Authorization role, a closed set with a passthrough for roles this
/// client version doesn't know about. Serialized with the server's
/// `ROLE_*` naming so existing cached profiles keep round-tripping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Client,
    /// A role string this client doesn't recognize. Preserved verbatim so
    /// a server-added role never breaks profile deserialization.
    Other(String),
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ROLE_ADMIN" => Role::Admin,
            "ROLE_CLIENT" => Role::Client,
            _ => Role::Other(s),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => "ROLE_ADMIN".to_string(),
            Role::Client => "ROLE_CLIENT".to_string(),
            Role::Other(s) => s,
        }
    }
}

// ─── User profile ───────────────────────────────────────────────────

/// The authenticated user's profile, as returned by `GET /auth/me` and
/// cached in the persistent store. Area routing (admin vs. client) is
/// derived from `roles`, never stored separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

// ─── Favorites ──────────────────────────────────────────────────────

/// A product saved to the user's favorites. At most one entry per
/// product id exists in the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub price: f64,
    pub category: String,
    pub added_at: DateTime<Utc>,
}

// ─── Notifications ──────────────────────────────────────────────────

/// Kind of notification, matching the lowercase wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Update,
    Promotion,
    News,
    System,
}

/// A notification as presented to the UI: static seed content joined
/// with the user's read/favorite flags. The flags are never persisted
/// inside this struct — `NotificationFlags` is the single durable source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub is_read: bool,
    pub is_favorite: bool,
}

/// The persisted per-user notification state: which seed notifications
/// have been read and which are marked favorite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationFlags {
    #[serde(default)]
    pub read: Vec<i64>,
    #[serde(default)]
    pub favorites: Vec<i64>,
}

// ─── Ratings ────────────────────────────────────────────────────────

/// One user's star rating for one product. A `(user_id, product_id)`
/// pair has at most one record; re-rating replaces it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: i64,
    /// The rating user's email.
    pub user_id: String,
    pub product_id: i64,
    /// Stars, 1 through 5.
    pub stars: u8,
    pub created_at: DateTime<Utc>,
}

/// Per-product rating aggregate. Carries the full rating set so the
/// average is always recomputed from scratch, never patched incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRating {
    pub product_id: i64,
    pub average_rating: f64,
    pub total_ratings: u32,
    #[serde(default)]
    pub ratings: Vec<Rating>,
}

impl ProductRating {
    /// Build the aggregate for a product from its full rating set.
    pub fn from_ratings(product_id: i64, ratings: Vec<Rating>) -> Self {
        let total = ratings.len() as u32;
        let average = if ratings.is_empty() {
            0.0
        } else {
            ratings.iter().map(|r| r.stars as f64).sum::<f64>() / ratings.len() as f64
        };
        Self {
            product_id,
            average_rating: average,
            total_ratings: total,
            ratings,
        }
    }
}

// ─── Catalog ────────────────────────────────────────────────────────

/// A catalog product, as returned by the remote API. Consumed by the
/// validation sweep to check whether locally referenced products still
/// exist upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"ROLE_ADMIN\"");
        let role: Role = serde_json::from_str("\"ROLE_CLIENT\"").unwrap();
        assert_eq!(role, Role::Client);
    }

    #[test]
    fn test_role_unknown_preserved() {
        let role: Role = serde_json::from_str("\"ROLE_SUPPORT\"").unwrap();
        assert_eq!(role, Role::Other("ROLE_SUPPORT".to_string()));
        let back = serde_json::to_string(&role).unwrap();
        assert_eq!(back, "\"ROLE_SUPPORT\"");
    }

    #[test]
    fn test_profile_is_admin() {
        let profile = UserProfile {
            id: 1,
            email: "a@b.com".into(),
            name: "A".into(),
            roles: vec![Role::Client, Role::Admin],
        };
        assert!(profile.is_admin());

        let client_only = UserProfile {
            roles: vec![Role::Client],
            ..profile
        };
        assert!(!client_only.is_admin());
    }

    #[test]
    fn test_profile_missing_roles_defaults_empty() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"id":1,"email":"a@b.com","name":"A"}"#).unwrap();
        assert!(profile.roles.is_empty());
        assert!(!profile.is_admin());
    }

    #[test]
    fn test_notification_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&NotificationKind::Promotion).unwrap(),
            "\"promotion\""
        );
        let kind: NotificationKind = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(kind, NotificationKind::System);
    }

    #[test]
    fn test_notification_kind_serialized_as_type() {
        let n = Notification {
            id: 1,
            title: "t".into(),
            description: "d".into(),
            image: String::new(),
            created_at: Utc::now(),
            kind: NotificationKind::News,
            is_read: false,
            is_favorite: false,
        };
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["type"], "news");
        assert_eq!(value["isRead"], false);
    }

    #[test]
    fn test_favorite_entry_camel_case() {
        let entry = FavoriteEntry {
            id: 7,
            title: "Desk Lamp".into(),
            image: "lamp.png".into(),
            price: 24.5,
            category: "Home".into(),
            added_at: Utc::now(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("addedAt").is_some());
        assert!(value.get("added_at").is_none());
    }

    #[test]
    fn test_product_rating_from_ratings() {
        let now = Utc::now();
        let ratings = vec![
            Rating {
                id: 1,
                user_id: "u1@x.com".into(),
                product_id: 9,
                stars: 5,
                created_at: now,
            },
            Rating {
                id: 2,
                user_id: "u2@x.com".into(),
                product_id: 9,
                stars: 3,
                created_at: now,
            },
        ];
        let agg = ProductRating::from_ratings(9, ratings);
        assert_eq!(agg.average_rating, 4.0);
        assert_eq!(agg.total_ratings, 2);
    }

    #[test]
    fn test_product_rating_empty() {
        let agg = ProductRating::from_ratings(1, vec![]);
        assert_eq!(agg.average_rating, 0.0);
        assert_eq!(agg.total_ratings, 0);
    }
}
