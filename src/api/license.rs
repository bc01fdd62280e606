use crate::{
    metadata::encode_segment,
    types::{
        LicenseBalance, LicenseKey, LicenseOwnershipValidation, LicenseStatus, LicenseValidation,
        TrialInfo,
    },
    Error, HttpClient, Result,
};

/// License key validation and lookup.
#[derive(Debug, Clone, Copy)]
pub struct LicenseApi<'a> {
    client: &'a HttpClient,
}

impl<'a> LicenseApi<'a> {
    /// Creates the façade over `client`.
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Validates a license key and returns its state and balance.
    pub async fn validate(&self, license_key: &str) -> Result<LicenseValidation> {
        let path = format!("/api/license/validate/{}", encode_segment(license_key));
        self.client.get(&path).await?.into_data(&path)
    }

    /// Checks whether the authenticated user owns `license_key`.
    ///
    /// With `throw_on_not_owner` unset, a missing, unassigned or foreign
    /// license is reported through the flags of the returned value. With it
    /// set, each of those cases becomes an [`Error::Ownership`] instead.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example(sdk: kgiton::Kgiton) -> Result<(), kgiton::Error> {
    /// let ownership = sdk.license().validate_ownership("ABCDE-12345", false).await?;
    /// if !ownership.is_owner {
    ///     println!("assigned to {:?}", ownership.assigned_to_user_id);
    /// }
    ///
    /// // Registration flows usually want a hard failure.
    /// sdk.license().validate_ownership("ABCDE-12345", true).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn validate_ownership(
        &self,
        license_key: &str,
        throw_on_not_owner: bool,
    ) -> Result<LicenseOwnershipValidation> {
        let path = format!(
            "/api/license/validate-ownership/{}",
            encode_segment(license_key)
        );
        let ownership: LicenseOwnershipValidation =
            self.client.get(&path).await?.into_data(&path)?;

        if throw_on_not_owner {
            check_ownership(&ownership)?;
        }

        Ok(ownership)
    }

    /// Fetches the full license record for a key.
    pub async fn get_by_key(&self, license_key: &str) -> Result<LicenseKey> {
        let path = format!("/api/license/key/{}", encode_segment(license_key));
        self.client.get(&path).await?.into_data(&path)
    }

    /// Looks a license up by its ID. Requires an admin account.
    pub async fn get_by_id(&self, license_id: &str) -> Result<LicenseKey> {
        let path = format!("/api/admin/license-keys/{}", encode_segment(license_id));
        self.client.get(&path).await?.into_data(&path)
    }

    /// Returns `true` if the license is valid and holds at least `required`
    /// tokens. Any failure, including network errors, yields `false`.
    pub async fn has_sufficient_tokens(&self, license_key: &str, required: u64) -> bool {
        match self.validate(license_key).await {
            Ok(validation) => validation.is_license_valid() && validation.token_balance >= required,
            Err(e) => {
                tracing::debug!(error = %e, "Token check failed, treating as insufficient");
                false
            }
        }
    }

    /// Returns `true` if the license is valid and active. Any failure yields
    /// `false`.
    pub async fn is_active(&self, license_key: &str) -> bool {
        match self.validate(license_key).await {
            Ok(validation) => {
                validation.is_license_valid() && validation.status == LicenseStatus::Active
            }
            Err(e) => {
                tracing::debug!(error = %e, "Activity check failed, treating as inactive");
                false
            }
        }
    }

    /// Returns the trial state of a license. Any failure yields a non-trial
    /// result.
    pub async fn trial_info(&self, license_key: &str) -> TrialInfo {
        match self.validate(license_key).await {
            Ok(validation) => TrialInfo {
                is_trial: validation.status == LicenseStatus::Trial,
                expires_at: validation.trial_expires_at,
            },
            Err(e) => {
                tracing::debug!(error = %e, "Trial lookup failed, treating as non-trial");
                TrialInfo::default()
            }
        }
    }

    /// Returns the balance and per-token price of a license.
    ///
    /// Unlike the boolean checks above, failures are returned as errors.
    pub async fn token_balance(&self, license_key: &str) -> Result<LicenseBalance> {
        let validation = self.validate(license_key).await?;
        Ok(LicenseBalance {
            balance: validation.token_balance,
            price_per_token: validation.price_per_token,
        })
    }
}

fn check_ownership(ownership: &LicenseOwnershipValidation) -> Result<()> {
    if !ownership.exists {
        return Err(Error::Ownership("License key not found".to_string()));
    }
    if !ownership.is_assigned {
        return Err(Error::Ownership(
            "License key is not assigned to any user".to_string(),
        ));
    }
    if !ownership.is_owner {
        return Err(Error::Ownership(format!(
            "License key is not assigned to you. It belongs to another user. \
             (Your ID: {}, Assigned to: {})",
            ownership.owner_user_id.as_deref().unwrap_or("unknown"),
            ownership.assigned_to_user_id.as_deref().unwrap_or("unknown"),
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn ownership(exists: bool, is_assigned: bool, is_owner: bool) -> LicenseOwnershipValidation {
        LicenseOwnershipValidation {
            license_key: "ABCDE-12345".to_string(),
            exists,
            is_assigned,
            is_owner,
            owner_user_id: Some("u-1".to_string()),
            assigned_to_user_id: is_assigned.then(|| "u-2".to_string()),
            status: LicenseStatus::Active,
            token_balance: 5,
            is_valid: true,
        }
    }

    #[test]
    fn test_check_ownership_messages() {
        let err = check_ownership(&ownership(false, false, false)).unwrap_err();
        assert_eq!(err.message(), "License key not found");
        assert_eq!(err.kind(), ErrorKind::Sdk);

        let err = check_ownership(&ownership(true, false, false)).unwrap_err();
        assert_eq!(err.message(), "License key is not assigned to any user");

        let err = check_ownership(&ownership(true, true, false)).unwrap_err();
        assert_eq!(
            err.message(),
            "License key is not assigned to you. It belongs to another user. \
             (Your ID: u-1, Assigned to: u-2)"
        );

        assert!(check_ownership(&ownership(true, true, true)).is_ok());
    }
}
