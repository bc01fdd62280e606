use crate::{
    metadata::encode_segment,
    types::{
        BonusTier, PaymentMethod, PaymentMethodInfo, TopupRequest, TopupResponse, Transaction,
        TransactionStatusResponse, WaitOptions,
    },
    HttpClient, Result,
};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Token top-ups: payment methods, requests and transaction tracking.
#[derive(Debug, Clone, Copy)]
pub struct TopupApi<'a> {
    client: &'a HttpClient,
}

#[derive(Deserialize)]
struct PriceQuote {
    #[serde(default)]
    price_per_token: Option<f64>,
}

impl<'a> TopupApi<'a> {
    /// Creates the façade over `client`.
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Lists the payment methods a top-up can be paid with.
    pub async fn payment_methods(&self) -> Result<Vec<PaymentMethodInfo>> {
        const PATH: &str = "/api/topup/payment-methods";
        self.client.get(PATH).await?.into_data(PATH)
    }

    /// Lists the bonus token tiers applied to larger top-ups.
    pub async fn bonus_tiers(&self) -> Result<Vec<BonusTier>> {
        const PATH: &str = "/api/topup/bonus-tiers";
        self.client.get(PATH).await?.into_data(PATH)
    }

    /// Starts a top-up and returns where and how much to pay.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kgiton::types::{PaymentMethod, TopupRequest};
    ///
    /// # async fn example(sdk: kgiton::Kgiton) -> Result<(), kgiton::Error> {
    /// let request = TopupRequest::new("ABCDE-12345", 1000).payment_method(PaymentMethod::VaBri);
    /// let topup = sdk.topup().request(&request).await?;
    /// if let Some(va) = &topup.virtual_account {
    ///     println!("transfer {} to {} {}", topup.amount_to_pay, va.bank, va.number);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn request(&self, request: &TopupRequest) -> Result<TopupResponse> {
        const PATH: &str = "/api/topup/request";
        self.client.post(PATH, request).await?.into_data(PATH)
    }

    /// Requests a top-up paid through the hosted checkout page.
    pub async fn request_checkout(
        &self,
        license_key: &str,
        token_count: u64,
    ) -> Result<TopupResponse> {
        let request =
            TopupRequest::new(license_key, token_count).payment_method(PaymentMethod::CheckoutPage);
        self.request(&request).await
    }

    /// Requests a top-up paid to a virtual account at `bank`.
    pub async fn request_va(
        &self,
        license_key: &str,
        token_count: u64,
        bank: PaymentMethod,
    ) -> Result<TopupResponse> {
        let request = TopupRequest::new(license_key, token_count).payment_method(bank);
        self.request(&request).await
    }

    /// Checks a transaction without authentication.
    pub async fn check_status(&self, transaction_id: &str) -> Result<TransactionStatusResponse> {
        let path = format!("/api/topup/check/{}", encode_segment(transaction_id));
        self.client.get(&path).await?.into_data(&path)
    }

    /// Checks a transaction owned by the authenticated user.
    pub async fn transaction_status(
        &self,
        transaction_id: &str,
    ) -> Result<TransactionStatusResponse> {
        let path = format!("/api/topup/status/{}", encode_segment(transaction_id));
        self.client.get(&path).await?.into_data(&path)
    }

    /// Returns the authenticated user's top-up transactions.
    pub async fn history(&self) -> Result<Vec<Transaction>> {
        const PATH: &str = "/api/topup/history";
        self.client.get(PATH).await?.into_data(PATH)
    }

    /// Cancels a pending transaction.
    pub async fn cancel(&self, transaction_id: &str) -> Result<()> {
        let path = format!("/api/topup/cancel/{}", encode_segment(transaction_id));
        self.client.post_empty::<Value>(path).await?;
        Ok(())
    }

    /// Asks the server to re-query the payment gateway for a transaction.
    pub async fn sync(&self, transaction_id: &str) -> Result<TransactionStatusResponse> {
        let path = format!("/api/topup/sync/{}", encode_segment(transaction_id));
        self.client.post_empty(&path).await?.into_data(&path)
    }

    /// Estimates the price of `token_count` tokens for a license.
    ///
    /// A response without pricing, or with a null price, counts as a price
    /// of zero.
    pub async fn calculate_amount(&self, license_key: &str, token_count: u64) -> Result<f64> {
        let path = format!("/api/license/validate/{}", encode_segment(license_key));
        let quote = self.client.get::<PriceQuote>(path).await?;
        let price_per_token = quote
            .data
            .and_then(|q| q.price_per_token)
            .unwrap_or(0.0);
        Ok(price_per_token * token_count as f64)
    }

    /// Polls [`check_status`](Self::check_status) until the transaction
    /// leaves the pending state or `options.timeout` elapses.
    ///
    /// Once the timeout passes, one last status is fetched and returned
    /// whatever it is; timing out is not an error. Errors from the status
    /// checks themselves are returned immediately.
    ///
    /// A zero `timeout` or `interval` falls back to the
    /// [`WaitOptions::default`] value.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kgiton::types::WaitOptions;
    /// use std::time::Duration;
    ///
    /// # async fn example(sdk: kgiton::Kgiton) -> Result<(), kgiton::Error> {
    /// let options = WaitOptions {
    ///     timeout: Duration::from_secs(120),
    ///     interval: Duration::from_secs(3),
    /// };
    /// let status = sdk.topup().wait_for_completion("tx-1", options).await?;
    /// println!("{:?}", status.status);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn wait_for_completion(
        &self,
        transaction_id: &str,
        options: WaitOptions,
    ) -> Result<TransactionStatusResponse> {
        let defaults = WaitOptions::default();
        let timeout = non_zero_or(options.timeout, defaults.timeout);
        let interval = non_zero_or(options.interval, defaults.interval);

        let clock = self.client.clock();
        let start = clock.now();

        while clock.now().saturating_duration_since(start) < timeout {
            let status = self.check_status(transaction_id).await?;
            if !status.status.is_pending() {
                return Ok(status);
            }

            tracing::debug!(
                transaction_id,
                interval_ms = interval.as_millis() as u64,
                "Transaction still pending"
            );
            clock.sleep(interval).await;
        }

        tracing::debug!(transaction_id, "Stopped waiting for transaction");
        self.check_status(transaction_id).await
    }
}

fn non_zero_or(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
