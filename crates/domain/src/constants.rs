//! Application constants
//!
//! Persisted session keys, default backend hosts and auth API paths.

// Persisted session layout. These names are shared with the web front end,
// so a session written by one client can be read by another.
pub const KEY_ACCESS_TOKEN: &str = "accessToken";
pub const KEY_REFRESH_TOKEN: &str = "refreshToken";
pub const KEY_ACCESS_TOKEN_EXPIRATION: &str = "accessTokenExpiration";
pub const KEY_USER_ID: &str = "userId";
pub const KEY_EMAIL: &str = "email";
pub const KEY_FIRST_NAME: &str = "firstName";
pub const KEY_LAST_NAME: &str = "lastName";
pub const KEY_IS_LINKEDIN_USER: &str = "isLinkedInUser";

/// Every key the token store owns, in write order.
pub const SESSION_KEYS: [&str; 8] = [
    KEY_ACCESS_TOKEN,
    KEY_REFRESH_TOKEN,
    KEY_ACCESS_TOKEN_EXPIRATION,
    KEY_USER_ID,
    KEY_EMAIL,
    KEY_FIRST_NAME,
    KEY_LAST_NAME,
    KEY_IS_LINKEDIN_USER,
];

// Default production hosts
pub const DEFAULT_CORE_API_URL: &str = "https://api.jobportal.dk";
pub const DEFAULT_AUTH_API_URL: &str = "https://auth.jobportal.dk";

// Auth API endpoints, relative to the auth host
pub const AUTH_LOGIN_PATH: &str = "/api/auth/login";
pub const AUTH_REGISTER_PATH: &str = "/api/auth/register";
pub const AUTH_REFRESH_PATH: &str = "/api/auth/refresh-token";
pub const AUTH_LOGOUT_PATH: &str = "/api/auth/logout";
pub const AUTH_LINKEDIN_CALLBACK_PATH: &str = "/api/auth/linkedin/callback";

// LinkedIn OAuth
pub const LINKEDIN_AUTHORIZATION_URL: &str = "https://www.linkedin.com/oauth/v2/authorization";
pub const LINKEDIN_DEFAULT_SCOPES: [&str; 3] = ["openid", "profile", "email"];

// HTTP defaults
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("jobportal/", env!("CARGO_PKG_VERSION"));

/// Keychain service name used when none is configured.
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "Jobportal.session";
