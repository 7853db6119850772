//! Login endpoint

use super::client::{decode, ApiClient};
use super::traits::Authenticator;
use crate::config::SecretString;
use crate::core::session::Session;
use crate::domain::{Result, User};
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Email and password for `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password,
        }
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    token: SecretString,
    user: User,
}

#[async_trait]
impl Authenticator for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let request = self
            .anonymous(Method::POST, "/auth/login")
            .json(credentials);
        let response = self.send_anonymous(request).await?;
        let body: LoginResponse = decode(response).await?;

        Ok(Session::new(body.token, body.user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{secret_string, ApiConfig};
    use crate::core::session::SessionContext;
    use crate::domain::{ApiError, IntakeError, Role};
    use mockito::Matcher;
    use secrecy::ExposeSecret;
    use serde_json::json;

    fn client(server: &mockito::ServerGuard) -> ApiClient {
        let config = ApiConfig {
            base_url: format!("{}/api", server.url()),
            ..Default::default()
        };
        ApiClient::new(&config, SessionContext::anonymous()).unwrap()
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials::new("a@example.com", secret_string("hunter2".to_string()));
        assert!(!format!("{credentials:?}").contains("hunter2"));
    }

    #[tokio::test]
    async fn test_login_returns_session() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/login")
            .match_body(Matcher::Json(json!({
                "email": "doc@example.com",
                "password": "s3cret"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "token": "jwt-value",
                    "user": { "id": "u1", "email": "doc@example.com", "role": "DOCTOR", "name": "Dr. Who" }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let credentials = Credentials::new(" doc@example.com ", secret_string("s3cret".to_string()));
        let session = client(&server).login(&credentials).await.unwrap();

        assert_eq!(session.token.expose_secret().as_ref(), "jwt-value");
        assert_eq!(session.user.role, Role::Doctor);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_bad_credentials_are_not_auth_expired() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/auth/login")
            .with_status(401)
            .with_body(r#"{"message":"Invalid credentials"}"#)
            .create_async()
            .await;

        let credentials = Credentials::new("doc@example.com", secret_string("wrong".to_string()));
        let err = client(&server).login(&credentials).await.unwrap_err();

        match err {
            IntakeError::Transport(ApiError::ClientError { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid credentials");
            }
            other => panic!("Expected client error, got {other:?}"),
        }
    }
}
