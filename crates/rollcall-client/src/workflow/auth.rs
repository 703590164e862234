//! Sign-in with an expected role.

use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use rollcall_core::error::AppError;
use rollcall_core::result::AppResult;
use rollcall_entity::auth::{Role, UserProfile};

use crate::api::AuthApi;
use crate::dto::LoginRequest;

/// Holds the signed-in user and drives the bearer token of the client.
#[derive(Debug)]
pub struct AuthWorkflow {
    api: Arc<dyn AuthApi>,
    user: RwLock<Option<UserProfile>>,
}

impl AuthWorkflow {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self {
            api,
            user: RwLock::new(None),
        }
    }

    /// Sign in, requiring `role` when given.
    ///
    /// A successful login for the wrong role is rejected and no token is
    /// kept.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> AppResult<UserProfile> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.api.login(&request).await?;

        if let Some(expected) = role {
            if response.user.role != expected {
                warn!(email, expected = %expected, actual = %response.user.role, "Login rejected for role");
                return Err(AppError::authentication(format!(
                    "Not a {} account",
                    expected.label()
                )));
            }
        }

        self.api.set_token(Some(response.token));
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = Some(response.user.clone());
        info!(email, role = %response.user.role, "Signed in");
        Ok(response.user)
    }

    /// Forget the user and the token.
    pub fn logout(&self) {
        self.api.set_token(None);
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = None;
        info!("Signed out");
    }

    /// The signed-in user.
    pub fn current_user(&self) -> Option<UserProfile> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.api.has_token()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rollcall_core::error::ErrorKind;

    use super::*;
    use crate::dto::LoginResponse;

    #[derive(Debug, Default)]
    struct FakeAuth {
        token: Mutex<Option<String>>,
    }

    #[async_trait]
    impl AuthApi for FakeAuth {
        async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
            let role = if request.email.starts_with("admin") {
                Role::SuperAdmin
            } else {
                Role::Secretary
            };
            if request.password != "secret" {
                return Err(AppError::authentication("Invalid credentials"));
            }
            Ok(LoginResponse {
                token: format!("token-{}", request.email),
                user: UserProfile {
                    id: None,
                    email: request.email.clone(),
                    role,
                    full_name: None,
                },
            })
        }

        fn set_token(&self, token: Option<String>) {
            *self.token.lock().unwrap() = token;
        }

        fn has_token(&self) -> bool {
            self.token.lock().unwrap().is_some()
        }
    }

    #[tokio::test]
    async fn test_role_mismatch_is_rejected_without_token() {
        let auth = AuthWorkflow::new(Arc::new(FakeAuth::default()));

        let err = auth
            .login("admin@example.org", "secret", Some(Role::Secretary))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Not a Secretary account");
        assert!(!auth.is_authenticated());

        let err = auth
            .login("sec@example.org", "secret", Some(Role::SuperAdmin))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Not a Super Admin account");
    }

    #[tokio::test]
    async fn test_login_and_logout() {
        let auth = AuthWorkflow::new(Arc::new(FakeAuth::default()));

        let user = auth
            .login("sec@example.org", "secret", Some(Role::Secretary))
            .await
            .unwrap();
        assert_eq!(user.role, Role::Secretary);
        assert!(auth.is_authenticated());
        assert!(auth.current_user().is_some());

        auth.logout();
        assert!(!auth.is_authenticated());
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn test_bad_password_propagates() {
        let auth = AuthWorkflow::new(Arc::new(FakeAuth::default()));
        let err = auth.login("sec@example.org", "nope", None).await.unwrap_err();
        assert_eq!(err.message, "Invalid credentials");
    }
}
