use super::{LicenseKey, LicenseStatus};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    User,
    #[serde(other)]
    Unknown,
}

/// A KGiTON account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Masked API key, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Code others can register with.
    #[serde(default)]
    pub referral_code: String,
    /// ID of the referring user.
    #[serde(default)]
    pub referred_by: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// A user together with every license key assigned to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The account itself.
    #[serde(flatten)]
    pub user: User,
    /// Every license assigned to the user.
    #[serde(default)]
    pub license_keys: Vec<LicenseKey>,
}

impl std::ops::Deref for UserProfile {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

/// Balance of one license key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseTokenBalance {
    pub id: String,
    pub license_key: String,
    pub token_balance: u64,
    #[serde(default)]
    pub price_per_token: f64,
    pub status: LicenseStatus,
}

/// Balances of every license key plus their sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBalanceResponse {
    #[serde(default)]
    pub license_keys: Vec<LicenseTokenBalance>,
    /// Sum of all balances.
    pub total_balance: u64,
}

/// Optional tracking data sent when consuming a token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UseTokenRequest {
    /// Free-form reason, stored with the usage record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Arbitrary JSON stored with the usage record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl UseTokenRequest {
    /// A request carrying only a purpose.
    pub fn with_purpose(purpose: impl Into<String>) -> Self {
        Self {
            purpose: Some(purpose.into()),
            metadata: None,
        }
    }
}

/// Balance change after consuming a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseTokenResponse {
    pub license_key: String,
    pub previous_balance: u64,
    pub new_balance: u64,
    /// Tokens consumed; the server omits it for a single token.
    #[serde(default = "one")]
    pub tokens_used: u64,
}

fn one() -> u64 {
    1
}

/// One recorded token consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub license_key: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub previous_balance: u64,
    #[serde(default)]
    pub new_balance: u64,
    #[serde(default)]
    pub tokens_used: u64,
    /// Purpose given when the token was used.
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default)]
    pub created_at: String,
}

/// Tokens used on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyUsage {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub tokens_used: u64,
}

/// Usage statistics across all of the user's license keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsageStats {
    #[serde(default)]
    pub weekly_usage: Vec<DailyUsage>,
    /// Average tokens used per day over the week.
    #[serde(default)]
    pub avg_daily_usage: f64,
    /// Days until the balance runs out at the current rate.
    #[serde(default)]
    pub est_days_remaining: Option<f64>,
    #[serde(default)]
    pub total_balance: Option<u64>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Usage of one license.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseTokenUsage {
    #[serde(default)]
    pub license_key: String,
    #[serde(default)]
    pub token_balance: u64,
    #[serde(default)]
    pub weekly_usage: Vec<DailyUsage>,
    /// One page of usage records, newest first.
    #[serde(default)]
    pub usage_history: Vec<TokenUsage>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Page position of a paginated list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
    /// Total number of records.
    #[serde(default)]
    pub total: u64,
    #[serde(default, alias = "totalPages")]
    pub total_pages: u32,
}

/// Per-license usage with paginated history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseTokenUsageResponse {
    #[serde(default)]
    pub data: LicenseTokenUsage,
    /// Missing when the server does not paginate.
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// A freshly generated API key. Only returned in full once.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyResponse {
    /// The new key in full.
    pub api_key: String,
    #[serde(default)]
    pub created_at: String,
}

impl std::fmt::Debug for ApiKeyResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyResponse")
            .field("api_key", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}
