use crate::{
    metadata::encode_segment,
    types::{
        CheckoutPageOptions, GeneratePaymentRequest, GeneratePaymentResponse,
        GenerateQrisRequest, GenerateQrisResponse, PartnerPaymentType, PaymentStatusResponse,
        QrisOptions,
    },
    HttpClient, Result,
};

const DEFAULT_QRIS_EXPIRY_MINUTES: u32 = 30;
const DEFAULT_CHECKOUT_EXPIRY_MINUTES: u32 = 120;

/// Partner payments collected on behalf of a license holder.
///
/// Every generated payment deducts one token from the license used.
#[derive(Debug, Clone, Copy)]
pub struct PaymentApi<'a> {
    client: &'a HttpClient,
}

impl<'a> PaymentApi<'a> {
    /// Creates the façade over `client`.
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Generates a QRIS code or checkout page, per `request.payment_type`.
    pub async fn generate(
        &self,
        request: &GeneratePaymentRequest,
    ) -> Result<GeneratePaymentResponse> {
        const PATH: &str = "/api/partner/payment/generate";
        self.client.post(PATH, request).await?.into_data(PATH)
    }

    /// Generates a QRIS payment. Expiry defaults to 30 minutes.
    pub async fn generate_qris(
        &self,
        license_key: &str,
        transaction_id: &str,
        amount: f64,
        options: QrisOptions,
    ) -> Result<GeneratePaymentResponse> {
        let request = GeneratePaymentRequest {
            transaction_id: transaction_id.to_string(),
            amount,
            license_key: license_key.to_string(),
            payment_type: Some(PartnerPaymentType::Qris),
            description: options.description,
            expiry_minutes: Some(options.expiry_minutes.unwrap_or(DEFAULT_QRIS_EXPIRY_MINUTES)),
            webhook_url: options.webhook_url,
            items: options.items,
            customer_name: options.customer_name,
            customer_email: options.customer_email,
            customer_phone: options.customer_phone,
            back_url: None,
        };
        self.generate(&request).await
    }

    /// Generates a hosted checkout page. Expiry defaults to 120 minutes.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kgiton::types::CheckoutPageOptions;
    ///
    /// # async fn example(sdk: kgiton::Kgiton) -> Result<(), kgiton::Error> {
    /// let options = CheckoutPageOptions {
    ///     back_url: Some("https://shop.example.com/orders/42".to_string()),
    ///     ..Default::default()
    /// };
    /// let payment = sdk
    ///     .payment()
    ///     .generate_checkout_page("ABCDE-12345", "ORDER-42", 150_000.0, options)
    ///     .await?;
    /// println!("pay at {:?}", payment.payment_url);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn generate_checkout_page(
        &self,
        license_key: &str,
        transaction_id: &str,
        amount: f64,
        options: CheckoutPageOptions,
    ) -> Result<GeneratePaymentResponse> {
        let request = GeneratePaymentRequest {
            transaction_id: transaction_id.to_string(),
            amount,
            license_key: license_key.to_string(),
            payment_type: Some(PartnerPaymentType::CheckoutPage),
            description: options.description,
            back_url: options.back_url,
            expiry_minutes: Some(
                options
                    .expiry_minutes
                    .unwrap_or(DEFAULT_CHECKOUT_EXPIRY_MINUTES),
            ),
            webhook_url: options.webhook_url,
            items: options.items,
            customer_name: options.customer_name,
            customer_email: options.customer_email,
            customer_phone: options.customer_phone,
        };
        self.generate(&request).await
    }

    /// Generates a QRIS code through the older dedicated endpoint.
    pub async fn generate_legacy_qris(
        &self,
        request: &GenerateQrisRequest,
    ) -> Result<GenerateQrisResponse> {
        const PATH: &str = "/api/partner/payment/qris";
        self.client.post(PATH, request).await?.into_data(PATH)
    }

    /// Shorthand for [`generate_legacy_qris`](Self::generate_legacy_qris).
    pub async fn quick_qris(
        &self,
        amount: f64,
        transaction_id: &str,
        description: Option<&str>,
    ) -> Result<GenerateQrisResponse> {
        let request = GenerateQrisRequest {
            amount,
            transaction_id: transaction_id.to_string(),
            description: description.map(str::to_string),
        };
        self.generate_legacy_qris(&request).await
    }

    /// Returns the payment state of a partner transaction.
    pub async fn check_status(&self, transaction_id: &str) -> Result<PaymentStatusResponse> {
        let path = format!(
            "/api/partner/payment/status/{}",
            encode_segment(transaction_id)
        );
        self.client.get(&path).await?.into_data(&path)
    }
}
