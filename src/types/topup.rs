use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// State of a top-up transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Paid and credited.
    Success,
    Failed,
    /// Waiting for payment.
    Pending,
    Expired,
    Cancelled,
    /// A status this client does not know yet.
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    /// Returns `true` while the payment can still complete.
    pub fn is_pending(&self) -> bool {
        matches!(self, TransactionStatus::Pending)
    }
}

/// Payment channels accepted for top-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Hosted checkout page where the customer picks a channel.
    CheckoutPage,
    VaBri,
    VaBni,
    VaBca,
    VaMandiri,
    VaPermata,
    VaBsi,
    VaCimb,
    VaSinarmas,
    VaMuamalat,
    VaIndomaret,
    VaAlfamart,
    /// QRIS code.
    Qris,
}

impl PaymentMethod {
    /// Returns `true` for virtual-account channels.
    pub fn is_virtual_account(&self) -> bool {
        !matches!(self, PaymentMethod::CheckoutPage | PaymentMethod::Qris)
    }
}

/// A top-up transaction from the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub license_key: String,
    /// Amount in IDR.
    pub amount: f64,
    /// Tokens credited once paid, bonus included.
    #[serde(default)]
    pub tokens_added: u64,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_transaction_id: Option<String>,
    /// Virtual account number, for VA payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_va_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_channel: Option<String>,
    /// Checkout URL, for checkout payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_payment_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// Body of `POST /api/topup/request`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopupRequest {
    pub license_key: String,
    /// Number of tokens to buy.
    pub token_count: u64,
    /// Channel to pay with. The server picks one if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    /// Sent to the gateway for some channels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
}

impl TopupRequest {
    /// Creates a request with no payment method chosen.
    pub fn new(license_key: impl Into<String>, token_count: u64) -> Self {
        Self {
            license_key: license_key.into(),
            token_count,
            payment_method: None,
            customer_phone: None,
        }
    }

    /// Chooses the payment channel.
    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }
}

/// Where to transfer for a virtual-account top-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualAccountInfo {
    /// Virtual account number.
    pub number: String,
    /// Account holder name shown by the bank.
    #[serde(default)]
    pub name: String,
    pub bank: String,
}

/// A started top-up and how to pay for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopupResponse {
    pub transaction_id: String,
    pub license_key: String,
    pub tokens_requested: u64,
    /// Total in IDR.
    pub amount_to_pay: f64,
    #[serde(default)]
    pub price_per_token: f64,
    /// Initial status as sent by the server.
    pub status: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub gateway_provider: String,
    /// Checkout page URL, for checkout payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
    /// Transfer details, for virtual-account payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_account: Option<VirtualAccountInfo>,
    #[serde(default)]
    pub expires_at: String,
}

/// Broad category of a payment channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    Checkout,
    Va,
    Qris,
    #[serde(other)]
    Unknown,
}

/// A payment channel offered for top-ups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodInfo {
    /// Value to use as [`PaymentMethod`] in requests.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub method_type: PaymentMethodType,
    /// Disabled channels are listed but rejected.
    #[serde(default)]
    pub enabled: bool,
}

/// A bonus granted for buying at least `min_tokens` tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusTier {
    #[serde(default)]
    pub min_tokens: u64,
    /// Upper bound of the tier; open-ended if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
    /// Extra tokens granted, in percent.
    #[serde(default)]
    pub bonus_percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Current state of a top-up transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionStatusResponse {
    pub transaction_id: String,
    #[serde(default)]
    pub amount: f64,
    /// Tokens credited, zero until paid.
    #[serde(default)]
    pub tokens_added: u64,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub created_at: String,
    /// RFC 3339 payment time, once paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
}

/// Polling parameters for
/// [`TopupApi::wait_for_completion`](crate::api::TopupApi::wait_for_completion).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Give up polling after this long. Defaults to 5 minutes; zero means
    /// the default.
    pub timeout: Duration,
    /// Pause between status checks. Defaults to 5 seconds; zero means the
    /// default.
    pub interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            interval: Duration::from_secs(5),
        }
    }
}
