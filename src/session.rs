// ============================================================================
// SESSION STORE - Данные пользователя и access-токен в localStorage
// ============================================================================
// Единственный разделяемый мутабельный ресурс приложения. Все мутации
// синхронные: merge выполняется до persist(), без await между ними.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::SESSION_STORAGE_KEY;
use crate::utils::storage;

/// Абстракция над хранилищем: localStorage в браузере, память в тестах
pub trait StorageBackend {
    fn read(&self, key: &str) -> Result<Option<String>, String>;
    fn write(&self, key: &str, value: &str) -> Result<(), String>;
}

/// Боевое хранилище поверх localStorage
pub struct LocalStorageBackend;

impl StorageBackend for LocalStorageBackend {
    fn read(&self, key: &str) -> Result<Option<String>, String> {
        storage::read_raw(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), String> {
        storage::write_raw(key, value)
    }
}

/// Запись о текущем пользователе
/// Инвариант: наличие access_token ⇔ сессия считается авторизованной
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub rejected_count: u32,
    #[serde(default)]
    pub username_change_cooldown_until: Option<String>,
}

/// Формат сериализованного блоба под ключом SESSION_STORAGE_KEY
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedState {
    #[serde(rename = "currentUser", default)]
    current_user: Option<SessionRecord>,
}

/// Частичное обновление метаданных пользователя.
/// None — поле не трогаем; для cooldown Some(None) означает явный сброс.
#[derive(Debug, Default)]
pub struct UserMetaPatch {
    pub username: Option<String>,
    pub user_id: Option<i64>,
    pub role: Option<String>,
    pub rejected_count: Option<u32>,
    pub username_change_cooldown_until: Option<Option<String>>,
}

struct Inner {
    backend: Box<dyn StorageBackend>,
    current: RefCell<Option<SessionRecord>>,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<Inner>,
}

impl SessionStore {
    /// Создать store и загрузить сохранённое состояние.
    /// Битые данные считаются отсутствующими, а не фатальной ошибкой.
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        let store = Self {
            inner: Rc::new(Inner {
                backend,
                current: RefCell::new(None),
            }),
        };
        store.load();
        store
    }

    fn load(&self) {
        let raw = match self.inner.backend.read(SESSION_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(err) => {
                log::error!("Не удалось прочитать состояние из хранилища: {}", err);
                return;
            }
        };

        match serde_json::from_str::<PersistedState>(&raw) {
            Ok(parsed) => {
                *self.inner.current.borrow_mut() = parsed.current_user;
            }
            Err(err) => {
                log::error!("Состояние в хранилище повреждено, сбрасываем: {}", err);
                *self.inner.current.borrow_mut() = None;
            }
        }
    }

    fn persist(&self) {
        let payload = PersistedState {
            current_user: self.inner.current.borrow().clone(),
        };
        let json = match serde_json::to_string(&payload) {
            Ok(json) => json,
            Err(err) => {
                log::error!("Не удалось сериализовать состояние: {}", err);
                return;
            }
        };
        if let Err(err) = self.inner.backend.write(SESSION_STORAGE_KEY, &json) {
            log::error!("Не удалось сохранить состояние: {}", err);
        }
    }

    /// Установить данные авторизации (email + токен).
    /// На шаге запроса кода токена ещё нет — передаётся None.
    pub fn set_auth(&self, email: &str, access_token: Option<String>) {
        {
            let mut current = self.inner.current.borrow_mut();
            let record = current.get_or_insert_with(SessionRecord::default);
            record.email = Some(email.to_string());
            record.access_token = access_token;
        }
        self.persist();
    }

    /// Полный выход: запись удаляется целиком
    pub fn clear_auth(&self) {
        *self.inner.current.borrow_mut() = None;
        self.persist();
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .current
            .borrow()
            .as_ref()
            .and_then(|u| u.access_token.as_ref())
            .is_some()
    }

    /// Слить в запись только переданные поля
    pub fn set_user_meta(&self, patch: UserMetaPatch) {
        {
            let mut current = self.inner.current.borrow_mut();
            let record = current.get_or_insert_with(SessionRecord::default);
            if let Some(username) = patch.username {
                record.username = Some(username);
            }
            if let Some(user_id) = patch.user_id {
                record.user_id = Some(user_id);
            }
            if let Some(role) = patch.role {
                record.role = Some(role);
            }
            if let Some(count) = patch.rejected_count {
                record.rejected_count = count;
            }
            if let Some(cooldown) = patch.username_change_cooldown_until {
                record.username_change_cooldown_until = cooldown;
            }
        }
        self.persist();
    }

    /// Снимок текущей записи (пустая запись, если не авторизованы)
    pub fn user(&self) -> SessionRecord {
        self.inner.current.borrow().clone().unwrap_or_default()
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .current
            .borrow()
            .as_ref()
            .and_then(|u| u.access_token.clone())
    }

    /// Нестрогая проверка роли: допускаем значения вида "org.moderator"
    pub fn is_moderator(&self) -> bool {
        self.role_contains("moderator")
    }

    pub fn is_admin(&self) -> bool {
        self.role_contains("admin")
    }

    fn role_contains(&self, needle: &str) -> bool {
        self.inner
            .current
            .borrow()
            .as_ref()
            .and_then(|u| u.role.as_ref())
            .map(|role| role.to_lowercase().contains(needle))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryBackend {
        data: RefCell<HashMap<String, String>>,
    }

    impl StorageBackend for MemoryBackend {
        fn read(&self, key: &str) -> Result<Option<String>, String> {
            Ok(self.data.borrow().get(key).cloned())
        }

        fn write(&self, key: &str, value: &str) -> Result<(), String> {
            self.data.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn empty_store() -> SessionStore {
        SessionStore::new(Box::new(MemoryBackend::default()))
    }

    #[test]
    fn auth_flag_follows_token_presence() {
        let store = empty_store();
        assert!(!store.is_authenticated());

        store.set_auth("user@example.com", None);
        assert!(!store.is_authenticated());

        store.set_auth("user@example.com", Some("t".to_string()));
        assert!(store.is_authenticated());

        store.clear_auth();
        assert!(!store.is_authenticated());
        assert_eq!(store.user(), SessionRecord::default());
    }

    #[test]
    fn meta_patch_touches_only_given_fields() {
        let store = empty_store();
        store.set_auth("user@example.com", Some("t".to_string()));
        store.set_user_meta(UserMetaPatch {
            username: Some("frontend_hero".to_string()),
            user_id: Some(7),
            ..Default::default()
        });

        store.set_user_meta(UserMetaPatch {
            rejected_count: Some(2),
            ..Default::default()
        });

        let user = store.user();
        assert_eq!(user.username.as_deref(), Some("frontend_hero"));
        assert_eq!(user.user_id, Some(7));
        assert_eq!(user.rejected_count, 2);
        assert_eq!(user.email.as_deref(), Some("user@example.com"));
    }

    #[test]
    fn cooldown_can_be_explicitly_cleared() {
        let store = empty_store();
        store.set_user_meta(UserMetaPatch {
            username_change_cooldown_until: Some(Some("2026-09-01T00:00:00Z".to_string())),
            ..Default::default()
        });
        assert!(store.user().username_change_cooldown_until.is_some());

        store.set_user_meta(UserMetaPatch {
            username_change_cooldown_until: Some(None),
            ..Default::default()
        });
        assert!(store.user().username_change_cooldown_until.is_none());
    }

    #[test]
    fn role_matching_is_loose() {
        let store = empty_store();
        for role in ["moderator", "org.moderator", "MODERATOR"] {
            store.set_user_meta(UserMetaPatch {
                role: Some(role.to_string()),
                ..Default::default()
            });
            assert!(store.is_moderator(), "роль {} должна считаться модераторской", role);
        }

        store.set_user_meta(UserMetaPatch {
            role: Some("user".to_string()),
            ..Default::default()
        });
        assert!(!store.is_moderator());
        assert!(!store.is_admin());

        store.set_user_meta(UserMetaPatch {
            role: Some("admin".to_string()),
            ..Default::default()
        });
        assert!(store.is_admin());
    }

    #[test]
    fn corrupt_blob_degrades_to_empty_session() {
        let backend = MemoryBackend::default();
        backend
            .write(SESSION_STORAGE_KEY, "{ это не json ")
            .unwrap();
        let store = SessionStore::new(Box::new(backend));
        assert!(!store.is_authenticated());
        assert_eq!(store.user(), SessionRecord::default());
    }

    #[test]
    fn state_survives_reload_through_backend() {
        let backend = Rc::new(MemoryBackend::default());

        struct SharedBackend(Rc<MemoryBackend>);
        impl StorageBackend for SharedBackend {
            fn read(&self, key: &str) -> Result<Option<String>, String> {
                self.0.read(key)
            }
            fn write(&self, key: &str, value: &str) -> Result<(), String> {
                self.0.write(key, value)
            }
        }

        let store = SessionStore::new(Box::new(SharedBackend(backend.clone())));
        store.set_auth("user@example.com", Some("token".to_string()));
        store.set_user_meta(UserMetaPatch {
            role: Some("moderator".to_string()),
            ..Default::default()
        });

        let reloaded = SessionStore::new(Box::new(SharedBackend(backend)));
        assert!(reloaded.is_authenticated());
        assert!(reloaded.is_moderator());
        assert_eq!(reloaded.user().email.as_deref(), Some("user@example.com"));
    }
}
