use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for user registration. `full_name` and `lang` are optional;
/// a missing `lang` defaults to English.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub lang: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response returned after register, login or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_serializes_id_and_email() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            email: "reader@example.com".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("reader@example.com"));
        assert!(json.contains("id"));
    }

    #[test]
    fn register_request_accepts_missing_optionals() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@b.co","password":"longenough"}"#).unwrap();
        assert!(req.full_name.is_none());
        assert!(req.lang.is_none());
    }
}
