//! Login, registration, and identity endpoints.

use super::models::{RegisterRequest, Token, User};
use super::{ApiClient, ApiResult};

impl ApiClient {
    /// Exchange credentials for a bearer token. The backend expects the
    /// OAuth2 password form encoding, not JSON.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<Token> {
        let resp = self
            .post("/auth/login")
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        let resp = Self::check(resp, "login").await?;
        Ok(resp.json().await?)
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<Token> {
        let resp = self.post("/auth/register").json(request).send().await?;
        let resp = Self::check(resp, "register").await?;
        Ok(resp.json().await?)
    }

    /// The user the stored credential belongs to. Doubles as a token
    /// validity check on startup.
    pub async fn me(&self) -> ApiResult<User> {
        let resp = self.get("/users/me").send().await?;
        let resp = Self::check(resp, "current user").await?;
        Ok(resp.json().await?)
    }
}
