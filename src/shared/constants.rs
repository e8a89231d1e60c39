/// Name of the session cookie carrying the signed JWT
pub const SESSION_COOKIE: &str = "token";

/// Body message for every 401 response
pub const UNAUTHORIZED_MESSAGE: &str = "unauthorized access";

/// Number of events shown on the public homepage feed
pub const HOME_FEED_LIMIT: i64 = 6;
