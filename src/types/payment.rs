use serde::{Deserialize, Serialize};

/// Payment flavour for partner payments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerPaymentType {
    /// A QRIS code the customer scans.
    Qris,
    /// A hosted page offering every channel.
    #[default]
    CheckoutPage,
}

/// A line item shown on the checkout page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentItem {
    pub id: String,
    pub name: String,
    /// Unit price in IDR.
    pub price: f64,
    pub quantity: u32,
}

/// Body of `POST /api/partner/payment/generate`.
///
/// Generating a payment deducts one token from `license_key`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratePaymentRequest {
    /// The partner's own transaction ID.
    pub transaction_id: String,
    /// Amount in IDR, at least 1000.
    pub amount: f64,
    /// License paying the one-token fee.
    pub license_key: String,
    /// Defaults to a checkout page on the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PartnerPaymentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Redirect after payment (checkout page only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_url: Option<String>,
    /// Receives a POST with [`PaymentWebhookPayload`] on status changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Minutes before the payment expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<PaymentItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
}

/// QRIS payload of a generated payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrisData {
    /// Raw QRIS string to render as a QR code.
    #[serde(default)]
    pub qr_content: Option<String>,
    /// Hosted image of the same code.
    #[serde(default)]
    pub qr_image_url: Option<String>,
}

/// Holds either QRIS data or a checkout URL, depending on `payment_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratePaymentResponse {
    #[serde(default)]
    pub success: bool,
    pub transaction_id: String,
    pub payment_type: PartnerPaymentType,
    pub amount: f64,
    #[serde(default)]
    pub gateway_provider: String,
    #[serde(default)]
    pub gateway_transaction_id: String,
    /// RFC 3339 expiry time.
    #[serde(default)]
    pub expires_at: String,
    /// Checkout page URL, for checkout payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
    /// QR data, for QRIS payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qris: Option<QrisData>,
}

/// Optional fields for [`PaymentApi::generate_qris`](crate::api::PaymentApi::generate_qris).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QrisOptions {
    /// Shown to the payer.
    pub description: Option<String>,
    /// Defaults to 30 minutes.
    pub expiry_minutes: Option<u32>,
    pub webhook_url: Option<String>,
    pub items: Option<Vec<PaymentItem>>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
}

/// Optional fields for
/// [`PaymentApi::generate_checkout_page`](crate::api::PaymentApi::generate_checkout_page).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutPageOptions {
    pub description: Option<String>,
    /// Where the payer is sent after paying.
    pub back_url: Option<String>,
    /// Defaults to 120 minutes.
    pub expiry_minutes: Option<u32>,
    /// Receives status updates.
    pub webhook_url: Option<String>,
    pub items: Option<Vec<PaymentItem>>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
}

/// Body of the legacy `POST /api/partner/payment/qris`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateQrisRequest {
    /// Amount in IDR.
    pub amount: f64,
    /// The partner's own transaction ID.
    pub transaction_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A QRIS code from the legacy endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrisCode {
    pub qr_content: String,
    pub qr_image_url: String,
}

/// Result of the legacy QRIS endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateQrisResponse {
    pub transaction_id: String,
    pub amount: f64,
    #[serde(default)]
    pub gateway_provider: String,
    #[serde(default)]
    pub gateway_transaction_id: String,
    #[serde(default)]
    pub expires_at: String,
    pub qris: QrisCode,
}

/// State of a partner payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Expired,
    Failed,
    /// A status this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// Result of a partner payment status check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    pub transaction_id: String,
    pub status: PaymentStatus,
    #[serde(default)]
    pub amount: f64,
    /// RFC 3339 payment time, once paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_transaction_id: Option<String>,
}

/// Final payment states reported through webhooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookPaymentStatus {
    Paid,
    Expired,
    Failed,
}

/// The POST body KGiTON sends to a partner's `webhook_url`.
///
/// The client never receives webhooks itself; this type is for partner
/// servers that do.
///
/// # Examples
///
/// ```
/// use kgiton::types::{PaymentWebhookPayload, WebhookPaymentStatus};
///
/// let payload: PaymentWebhookPayload = serde_json::from_str(r#"{
///     "transaction_id": "TRX-001",
///     "payment_status": "paid",
///     "amount": 50000,
///     "paid_at": "2026-01-05T10:00:00Z",
///     "payment_type": "qris"
/// }"#).unwrap();
///
/// assert_eq!(payload.payment_status, WebhookPaymentStatus::Paid);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentWebhookPayload {
    /// The partner's transaction ID.
    pub transaction_id: String,
    pub payment_status: WebhookPaymentStatus,
    /// Amount in IDR.
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PartnerPaymentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_transaction_id: Option<String>,
}
