use serde::{Deserialize, Serialize};

/// Lifecycle state of a license key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    Active,
    Inactive,
    /// Usable until `trial_expires_at`.
    Trial,
    /// A status this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// How the license was acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicensePurchaseType {
    Buy,
    /// Monthly subscription.
    Rent,
    #[serde(other)]
    Unknown,
}

/// Payment state of a license purchase or subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseTransactionStatus {
    Pending,
    Paid,
    Active,
    Expired,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// A license key with its device and purchase details.
///
/// One license belongs to one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseKey {
    /// Server-side ID, used by admin endpoints.
    pub id: String,
    /// The license key string itself.
    pub key: String,

    /// Price of one token in IDR.
    pub price_per_token: f64,
    /// Tokens left.
    pub token_balance: u64,
    pub status: LicenseStatus,

    /// ID of the owning user, if assigned.
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub referred_by_user_id: Option<String>,
    /// RFC 3339 end of the trial, for trial licenses.
    #[serde(default)]
    pub trial_expires_at: Option<String>,

    /// Name of the bound device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_notes: Option<String>,

    /// Buy or rent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_type: Option<LicensePurchaseType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_price_monthly: Option<f64>,

    // rent
    /// Subscription state of a rented license.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_status: Option<LicenseTransactionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_next_due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_expires_at: Option<String>,

    // buy
    /// Payment state of a bought license.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_payment_status: Option<LicenseTransactionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_paid_at: Option<String>,

    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Result of `GET /api/license/validate/{key}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseValidation {
    /// The key that was validated.
    pub license_key: String,
    /// `false` if no such key exists.
    #[serde(default)]
    pub exists: bool,
    /// Whether the key may be used right now.
    #[serde(default)]
    pub is_valid: bool,
    /// Older servers report validity here instead of `is_valid`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    /// Whether the key is assigned to any user.
    #[serde(default)]
    pub is_assigned: bool,
    #[serde(default)]
    pub assigned_to_user_id: Option<String>,
    /// Current lifecycle state.
    pub status: LicenseStatus,
    /// Tokens left.
    #[serde(default)]
    pub token_balance: u64,
    /// Price of one token in IDR; zero if not reported.
    #[serde(default)]
    pub price_per_token: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_type: Option<LicensePurchaseType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_status: Option<LicenseTransactionStatus>,
    /// Whether a rented license is paid up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_valid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_expires_at: Option<String>,
    /// Human-readable explanation from the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LicenseValidation {
    /// Returns validity from `is_valid`, falling back to the legacy `valid`.
    pub fn is_license_valid(&self) -> bool {
        self.is_valid || self.valid.unwrap_or(false)
    }
}

/// Result of `GET /api/license/validate-ownership/{key}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseOwnershipValidation {
    /// The key that was checked.
    pub license_key: String,
    /// `false` if no such key exists.
    #[serde(default)]
    pub exists: bool,
    #[serde(default)]
    pub is_assigned: bool,
    /// `true` if the license is assigned to the authenticated user.
    #[serde(default)]
    pub is_owner: bool,
    /// The authenticated user.
    #[serde(default)]
    pub owner_user_id: Option<String>,
    /// The user the license is assigned to.
    #[serde(default)]
    pub assigned_to_user_id: Option<String>,
    pub status: LicenseStatus,
    #[serde(default)]
    pub token_balance: u64,
    #[serde(default)]
    pub is_valid: bool,
}

/// Trial state of a license.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrialInfo {
    pub is_trial: bool,
    /// End of the trial, when one is running.
    pub expires_at: Option<String>,
}

/// Token balance and price of a single license.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LicenseBalance {
    /// Tokens left.
    pub balance: u64,
    /// Price of one token in IDR.
    pub price_per_token: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_accepts_legacy_valid_field() {
        let validation: LicenseValidation = serde_json::from_value(json!({
            "license_key": "ABCDE-12345",
            "exists": true,
            "valid": true,
            "status": "trial",
            "token_balance": 10,
            "price_per_token": 500.0,
            "trial_expires_at": "2026-12-31T00:00:00Z"
        }))
        .unwrap();

        assert!(!validation.is_valid);
        assert!(validation.is_license_valid());
        assert_eq!(validation.status, LicenseStatus::Trial);
        assert!(!validation.is_assigned);
    }

    #[test]
    fn test_unknown_status_is_tolerated() {
        let status: LicenseStatus = serde_json::from_value(json!("suspended")).unwrap();
        assert_eq!(status, LicenseStatus::Unknown);
    }
}
