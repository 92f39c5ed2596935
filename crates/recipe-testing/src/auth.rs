//! Mock auth helpers for integration tests.
//!
//! Protected endpoints expect `Authorization: Bearer <jwt>`. `MockAuth` signs a
//! short-lived token for a chosen user with the test secret, so no login round
//! trip is needed.

use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use uuid::Uuid;

use recipe_auth_types::token::issue_token;

/// Secret shared by test routers and [`MockAuth`].
pub const TEST_TOKEN_SECRET: &str = "test-token-secret-for-integration-tests";

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub secret: String,
}

impl MockAuth {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            secret: TEST_TOKEN_SECRET.to_owned(),
        }
    }

    /// A signed token valid for one hour.
    pub fn token(&self) -> String {
        let (token, _) = issue_token(self.user_id, &self.secret, 3600).unwrap();
        token
    }

    /// `Authorization` header value for this identity.
    pub fn authorization(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.token())).unwrap()
    }

    /// Return headers as a logged-in client would send them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, self.authorization());
        map
    }
}
