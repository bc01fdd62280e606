//! Request and response bodies of the KGiTON API.
//!
//! Plain serde types with a few small helpers. Optional and unknown fields
//! are tolerated so that additive server changes do not break decoding.

mod auth;
mod license;
mod payment;
mod topup;
mod user;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
pub use license::{
    LicenseBalance, LicenseKey, LicenseOwnershipValidation, LicensePurchaseType, LicenseStatus,
    LicenseTransactionStatus, LicenseValidation, TrialInfo,
};
pub use payment::{
    CheckoutPageOptions, GeneratePaymentRequest, GeneratePaymentResponse, GenerateQrisRequest,
    GenerateQrisResponse, PartnerPaymentType, PaymentItem, PaymentStatus, PaymentStatusResponse,
    PaymentWebhookPayload, QrisCode, QrisData, QrisOptions, WebhookPaymentStatus,
};
pub use topup::{
    BonusTier, PaymentMethod, PaymentMethodInfo, PaymentMethodType, TopupRequest, TopupResponse,
    Transaction, TransactionStatus, TransactionStatusResponse, VirtualAccountInfo, WaitOptions,
};
pub use user::{
    ApiKeyResponse, DailyUsage, LicenseTokenBalance, LicenseTokenUsage,
    LicenseTokenUsageResponse, Pagination, TokenBalanceResponse, TokenUsage, TokenUsageStats,
    UseTokenRequest, UseTokenResponse, User, UserProfile, UserRole,
};
