//! API constants
//!
//! Paths and key names shared between the client and the credential stores.

// Local development endpoints used when nothing is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_REALTIME_URL: &str = "ws://localhost:8000";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// Auth endpoints (relative to the API base URL)
pub const AUTH_REFRESH_PATH: &str = "/api/auth/refresh";
pub const AUTH_LOGIN_PATH: &str = "/api/auth/login";
pub const AUTH_SIGNUP_PATH: &str = "/api/auth/signup";
pub const AUTH_LOGOUT_PATH: &str = "/api/auth/logout";
pub const AUTH_ME_PATH: &str = "/api/auth/me";
pub const HEALTH_PATH: &str = "/health";

// Credential store keys
pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

// Multipart field carrying the uploaded binary
pub const UPLOAD_FILE_FIELD: &str = "file";
