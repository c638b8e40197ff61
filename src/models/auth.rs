use serde::{Deserialize, Serialize};

/// Ответ на обмен одноразового кода на токен (POST /auth/login/)
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Профиль текущего пользователя (GET /user/)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_banned: Option<bool>,
    /// Момент, до которого смена ника запрещена
    #[serde(default)]
    pub next_username_change_at: Option<String>,
}

/// Ответ на смену ника (PUT /user/)
#[derive(Debug, Clone, Deserialize)]
pub struct UsernameResponse {
    pub username: String,
}
