// Persisted key namespace.
//
// Every durable value the client writes lives under one of these keys.
// The storage backend is shared with the embedding application, so keys
// carry a `shopfront.` prefix to avoid collisions.

/// Raw auth token string.
pub const AUTH_TOKEN: &str = "shopfront.auth_token";

/// Stringified integer epoch-ms of when the token was issued.
pub const TOKEN_ISSUED_AT: &str = "shopfront.token_issued_at";

/// JSON-encoded cached `UserProfile`.
pub const USER_PROFILE: &str = "shopfront.user_profile";

/// Raw configured API base URL.
pub const API_BASE_URL: &str = "shopfront.api_base_url";

/// JSON array of `FavoriteEntry`.
pub const FAVORITES: &str = "shopfront.favorites";

/// JSON object `{read: [ids], favorites: [ids]}` of notification flags.
pub const NOTIFICATION_FLAGS: &str = "shopfront.notification_flags";

/// JSON object keyed by product id -> `ProductRating`.
pub const RATINGS: &str = "shopfront.ratings";

/// JSON scratch data for an in-progress sign-up (cleared on logout).
pub const PENDING_SIGNUP: &str = "shopfront.pending_signup";

/// The keys that together make up the authentication state.
/// Cleared as one logical unit on logout, expiry, or explicit purge.
pub const AUTH_STATE: &[&str] = &[AUTH_TOKEN, TOKEN_ISSUED_AT, USER_PROFILE];
