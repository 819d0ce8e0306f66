//! User profile types
//!
//! Profile returned by `GET /api/auth/me`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// KYC verification status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    Pending,
    /// Instant approval; an admin reviews later
    AutoApproved,
    Approved,
    Rejected,
}

/// Authenticated user's profile and access status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub display_name: Option<String>,
    pub kyc_status: KycStatus,
    pub can_access_trading: bool,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
}
