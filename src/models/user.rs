use serde::{Deserialize, Serialize};

/// Пользователь в списке управления (GET /moderator/users/)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub is_banned: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ManagedUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    pub fn is_moderator(&self) -> bool {
        self.role == "moderator"
    }

    pub fn role_label(&self) -> &'static str {
        match self.role.as_str() {
            "admin" => "Администратор",
            "moderator" => "Модератор",
            _ => "Пользователь",
        }
    }

    pub fn role_badge_class(&self) -> &'static str {
        match self.role.as_str() {
            "admin" => "badge badge-admin",
            "moderator" => "badge badge-moderator",
            _ => "badge badge-user",
        }
    }
}
