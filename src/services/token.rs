//! Special token service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::database::repositories::TokenRepository;
use crate::models::token::{NewSpecialToken, SpecialToken};
use crate::utils::errors::{CmsError, Result};
use crate::utils::helpers::{generate_token_value, non_empty};
use crate::utils::logging::{log_record_action, log_validation_failure};

#[derive(Clone)]
pub struct TokenService {
    tokens: Arc<dyn TokenRepository>,
}

impl TokenService {
    pub fn new(tokens: Arc<dyn TokenRepository>) -> Self {
        Self { tokens }
    }

    /// Store a new token, generating its value when none was given
    pub async fn issue(&self, request: NewSpecialToken) -> Result<SpecialToken> {
        let errors = request.validate();
        if !errors.is_empty() {
            log_validation_failure("SpecialToken", &errors);
            return Err(CmsError::Validation(errors));
        }

        let value = non_empty(request.value).unwrap_or_else(generate_token_value);
        let token = self
            .tokens
            .create(&request.name, &value, request.max_usage, request.valid_till)
            .await?;

        log_record_action("SpecialToken", &token.name, "create", None);
        Ok(token)
    }

    /// Whether `value` names a token that is valid at `now`; unknown values are not
    pub async fn is_valid(&self, value: &str, now: DateTime<Utc>) -> Result<bool> {
        let valid = self
            .tokens
            .find_by_value(value)
            .await?
            .is_some_and(|token| token.is_valid_at(now));
        debug!(valid = valid, "Checked special token");
        Ok(valid)
    }

    /// Spend one use of a valid token
    pub async fn redeem(&self, value: &str, now: DateTime<Utc>) -> Result<SpecialToken> {
        if let Some(token) = self.tokens.redeem(value, now).await? {
            info!(
                name = %token.name,
                used = token.used,
                max_usage = token.max_usage,
                "Special token redeemed"
            );
            return Ok(token);
        }

        match self.tokens.find_by_value(value).await? {
            Some(token) => Err(CmsError::PermissionDenied(format!(
                "Token {} is no longer valid",
                token.name
            ))),
            None => Err(CmsError::not_found("SpecialToken", value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::utils::helpers::TOKEN_LENGTH;
    use assert_matches::assert_matches;
    use chrono::Duration;

    fn service() -> TokenService {
        TokenService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_issue_generates_value() {
        let service = service();
        let now = Utc::now();
        let token = service.issue(NewSpecialToken::new("ctf", now)).await.unwrap();

        assert_eq!(token.value.len(), TOKEN_LENGTH);
        assert_eq!(token.used, 0);
        assert_eq!(token.max_usage, 1);
        assert_eq!(token.valid_till, now + Duration::hours(6));
        assert!(service.is_valid(&token.value, now).await.unwrap());
    }

    #[tokio::test]
    async fn test_blank_value_is_generated() {
        let service = service();
        let now = Utc::now();
        for blank in ["", "   "] {
            let mut request = NewSpecialToken::new("ctf", now);
            request.value = Some(blank.to_string());
            let token = service.issue(request).await.unwrap();
            assert_eq!(token.value.len(), TOKEN_LENGTH);
            assert!(token.value.chars().all(|c| c.is_ascii_alphanumeric()));
        }
        assert!(!service.is_valid("", now).await.unwrap());
    }

    #[tokio::test]
    async fn test_single_use_token_redeems_once() {
        let service = service();
        let now = Utc::now();
        let token = service.issue(NewSpecialToken::new("ctf", now)).await.unwrap();

        let redeemed = service.redeem(&token.value, now).await.unwrap();
        assert_eq!(redeemed.used, 1);
        assert!(!service.is_valid(&token.value, now).await.unwrap());
        assert_matches!(
            service.redeem(&token.value, now).await,
            Err(CmsError::PermissionDenied(_))
        );
    }

    #[tokio::test]
    async fn test_expired_and_unknown_tokens() {
        let service = service();
        let now = Utc::now();
        let mut request = NewSpecialToken::new("old", now);
        request.value = Some("expiredtoken0001".to_string());
        request.valid_till = now - Duration::hours(1);
        service.issue(request).await.unwrap();

        assert!(!service.is_valid("expiredtoken0001", now).await.unwrap());
        assert!(!service.is_valid("missing", now).await.unwrap());
        assert_matches!(
            service.redeem("missing", now).await,
            Err(CmsError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn test_duplicate_value_is_rejected() {
        let service = service();
        let now = Utc::now();
        let mut request = NewSpecialToken::new("a", now);
        request.value = Some("samevalue".to_string());
        service.issue(request.clone()).await.unwrap();

        assert_matches!(service.issue(request).await, Err(CmsError::Validation(_)));
    }
}
