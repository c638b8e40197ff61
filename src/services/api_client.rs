// ============================================================================
// API CLIENT - Только HTTP-коммуникация (stateless)
// ============================================================================
// Универсальный JSON-helper + отдельная multipart-ветка для эндпоинтов
// с файлами. Никакой бизнес-логики.
// ============================================================================

use std::rc::Rc;

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsValue;
use web_sys::{File, FormData};

use crate::config::API_BASE_URL;
use crate::models::{ManagedUser, Post, PostDraft, Profile, TokenResponse, UsernameResponse};
use crate::session::SessionStore;

/// Все конечные точки API собраны в одном месте,
/// чтобы их было проще править при смене бекенд-роутов.
mod endpoints {
    pub const REQUEST_CODE: &str = "/auth/";
    pub const AUTHORIZE: &str = "/auth/login/";
    pub const UPDATE_USERNAME: &str = "/user/";
    pub const GET_ME: &str = "/user/";
    pub const POSTS: &str = "/posts/";
    // Бекенд берёт идентификатор из query-параметра, сегмент :id в пути
    // остаётся литеральным
    pub const POST_BY_ID: &str = "/posts/:id/";
    pub const USER_POSTS: &str = "/posts/:user_id/";
    pub const PENDING_POSTS: &str = "/moderator/posts/";
    pub const APPROVE_POST: &str = "/moderator/posts/approve/:id/";
    pub const REJECT_POST: &str = "/moderator/posts/reject/:id/";
    pub const LIST_USERS: &str = "/moderator/users/";
    pub const TOGGLE_BAN: &str = "/moderator/users/:id/";
    pub const TOGGLE_MODERATOR: &str = "/admin/users/:id/";
    pub const UPLOAD_IMAGE: &str = "/upload/image/";
}

const GENERIC_ERROR: &str = "Ошибка при выполнении запроса";

/// Классификация ошибок запроса (см. декомпозицию в SessionStore и вьюшках:
/// все восстановимые ошибки гаснут на границе вьюшки)
#[derive(Debug, Error)]
pub enum ApiError {
    /// Транспортная ошибка (сеть, CORS, прерванный запрос)
    #[error("Сетевая ошибка: {0}")]
    Network(String),
    /// Структурированная ошибка бекенда (non-2xx с полем detail)
    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Serialize)]
struct RequestCodeBody<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct AuthorizeBody<'a> {
    email: &'a str,
    code: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateUsernameBody<'a> {
    username: &'a str,
}

#[derive(Debug, Serialize)]
struct RejectBody<'a> {
    reason: &'a str,
}

/// Ответ эндпоинта загрузки изображения
#[derive(Debug, Deserialize)]
pub struct UploadedImage {
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl UploadedImage {
    pub fn into_url(self) -> Option<String> {
        self.image_url.or(self.url).filter(|u| !u.is_empty())
    }
}

enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Колбэк для показа ошибок пользователю (подключается оболочкой)
pub type ErrorNotifier = Rc<dyn Fn(&str)>;

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    session: SessionStore,
    notifier: ErrorNotifier,
}

impl ApiClient {
    pub fn new(session: SessionStore, notifier: ErrorNotifier) -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            session,
            notifier,
        }
    }

    // ---------- Универсальный JSON-путь ----------

    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth: bool,
    ) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = format!("{}{}", self.base_url, path);
        let builder = match method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Put => Request::put(&url),
            Method::Delete => Request::delete(&url),
        };
        let builder = self.with_auth(builder, auth);

        let request = match body {
            Some(body) => builder
                .json(body)
                .map_err(|e| self.network_error(e.to_string()))?,
            None => builder
                .build()
                .map_err(|e| self.network_error(e.to_string()))?,
        };

        let response = request
            .send()
            .await
            .map_err(|e| self.network_error(e.to_string()))?;

        self.handle(response).await
    }

    fn with_auth(&self, builder: RequestBuilder, auth: bool) -> RequestBuilder {
        if auth {
            if let Some(token) = self.session.token() {
                return builder.header("Authorization", &format!("Bearer {}", token));
            }
        }
        builder
    }

    async fn handle<T: DeserializeOwned>(&self, response: Response) -> Result<Option<T>, ApiError> {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let decoded = decode_body(status, &text);
        if let Err(err) = &decoded {
            (self.notifier)(&err.to_string());
        }
        decoded
    }

    fn network_error(&self, message: String) -> ApiError {
        let err = ApiError::Network(message);
        (self.notifier)(&err.to_string());
        err
    }

    // ---------- Авторизация ----------

    /// Запросить одноразовый код на почту
    pub async fn request_code(&self, email: &str) -> Result<(), ApiError> {
        self.request::<serde_json::Value, _>(
            Method::Post,
            endpoints::REQUEST_CODE,
            Some(&RequestCodeBody { email }),
            false,
        )
        .await
        .map(|_| ())
    }

    /// Обменять код из письма на access_token
    pub async fn authorize(&self, email: &str, code: &str) -> Result<Option<TokenResponse>, ApiError> {
        self.request(
            Method::Post,
            endpoints::AUTHORIZE,
            Some(&AuthorizeBody { email, code }),
            false,
        )
        .await
    }

    /// Обновить никнейм
    pub async fn update_username(
        &self,
        username: &str,
    ) -> Result<Option<UsernameResponse>, ApiError> {
        self.request(
            Method::Put,
            endpoints::UPDATE_USERNAME,
            Some(&UpdateUsernameBody { username }),
            true,
        )
        .await
    }

    /// Профиль текущего пользователя
    pub async fn get_me(&self) -> Result<Option<Profile>, ApiError> {
        self.request::<Profile, ()>(Method::Get, endpoints::GET_ME, None, true)
            .await
    }

    // ---------- Объявления ----------

    /// Все одобренные объявления
    pub async fn get_all_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.request::<Vec<Post>, ()>(Method::Get, endpoints::POSTS, None, false)
            .await
            .map(Option::unwrap_or_default)
    }

    /// Пост по id. Токен прикладываем, чтобы владелец видел и неодобренные посты
    pub async fn get_post(&self, id: i64) -> Result<Option<Post>, ApiError> {
        let path = format!("{}?post_id={}", endpoints::POST_BY_ID, id);
        self.request::<Post, ()>(Method::Get, &path, None, true).await
    }

    /// Посты конкретного пользователя (включая pending/rejected)
    pub async fn get_user_posts(&self, user_id: i64) -> Result<Vec<Post>, ApiError> {
        let path = format!("{}?user_id={}", endpoints::USER_POSTS, user_id);
        self.request::<Vec<Post>, ()>(Method::Get, &path, None, true)
            .await
            .map(Option::unwrap_or_default)
    }

    /// Создать объявление (multipart: поля + файлы)
    pub async fn create_post(
        &self,
        draft: &PostDraft,
        files: &[File],
    ) -> Result<Option<Post>, ApiError> {
        let form = build_post_form(draft, files, None)
            .map_err(|e| self.network_error(js_error_text(e)))?;
        self.send_multipart(false, endpoints::POSTS, form).await
    }

    /// Обновить объявление. Новые файлы добавляются к существующим,
    /// если replace_images=false
    pub async fn update_post(
        &self,
        id: i64,
        draft: &PostDraft,
        files: &[File],
        replace_images: bool,
    ) -> Result<Option<Post>, ApiError> {
        let path = format!("{}?post_id={}", endpoints::POST_BY_ID, id);
        let form = build_post_form(draft, files, Some(replace_images))
            .map_err(|e| self.network_error(js_error_text(e)))?;
        self.send_multipart(true, &path, form).await
    }

    /// Удалить объявление (успех — 204 без тела)
    pub async fn delete_post(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("{}?post_id={}", endpoints::POST_BY_ID, id);
        self.request::<serde_json::Value, ()>(Method::Delete, &path, None, true)
            .await
            .map(|_| ())
    }

    // ---------- Модерация ----------

    pub async fn get_pending_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.request::<Vec<Post>, ()>(Method::Get, endpoints::PENDING_POSTS, None, true)
            .await
            .map(Option::unwrap_or_default)
    }

    pub async fn approve_post(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("{}?post_id={}", endpoints::APPROVE_POST, id);
        self.request::<serde_json::Value, ()>(Method::Post, &path, None, true)
            .await
            .map(|_| ())
    }

    pub async fn reject_post(&self, id: i64, reason: &str) -> Result<(), ApiError> {
        let path = format!("{}?post_id={}", endpoints::REJECT_POST, id);
        self.request::<serde_json::Value, _>(
            Method::Post,
            &path,
            Some(&RejectBody { reason }),
            true,
        )
        .await
        .map(|_| ())
    }

    // ---------- Управление пользователями ----------

    pub async fn list_users(&self) -> Result<Vec<ManagedUser>, ApiError> {
        self.request::<Vec<ManagedUser>, ()>(Method::Get, endpoints::LIST_USERS, None, true)
            .await
            .map(Option::unwrap_or_default)
    }

    pub async fn toggle_ban_user(&self, user_id: i64) -> Result<(), ApiError> {
        let path = format!("{}?user_id={}", endpoints::TOGGLE_BAN, user_id);
        self.request::<serde_json::Value, ()>(Method::Post, &path, None, true)
            .await
            .map(|_| ())
    }

    /// Выдать/снять роль модератора (только админ)
    pub async fn toggle_moderator_role(&self, user_id: i64) -> Result<(), ApiError> {
        let path = format!("{}?user_id={}", endpoints::TOGGLE_MODERATOR, user_id);
        self.request::<serde_json::Value, ()>(Method::Post, &path, None, true)
            .await
            .map(|_| ())
    }

    // ---------- Изображения ----------

    /// Загрузить отдельное изображение, вернуть его URL
    pub async fn upload_image(&self, file: &File) -> Result<Option<String>, ApiError> {
        let form = FormData::new().map_err(|e| self.network_error(js_error_text(e)))?;
        form.append_with_blob_and_filename("file", file, &file.name())
            .map_err(|e| self.network_error(js_error_text(e)))?;
        let uploaded: Option<UploadedImage> = self
            .send_multipart(false, endpoints::UPLOAD_IMAGE, form)
            .await?;
        Ok(uploaded.and_then(UploadedImage::into_url))
    }

    /// Multipart-ветка: Content-Type не выставляем, браузер сам
    /// подставит boundary
    async fn send_multipart<T: DeserializeOwned>(
        &self,
        put: bool,
        path: &str,
        form: FormData,
    ) -> Result<Option<T>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let builder = if put {
            Request::put(&url)
        } else {
            Request::post(&url)
        };
        let request = self
            .with_auth(builder, true)
            .body(form)
            .map_err(|e| self.network_error(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| self.network_error(e.to_string()))?;

        self.handle(response).await
    }
}

fn build_post_form(
    draft: &PostDraft,
    files: &[File],
    replace_images: Option<bool>,
) -> Result<FormData, JsValue> {
    let form = FormData::new()?;
    form.append_with_str("title", &draft.title)?;
    form.append_with_str("content", &draft.content)?;
    form.append_with_str("contact", &draft.contact)?;
    if let Some(city) = &draft.city {
        form.append_with_str("city", city)?;
    }
    if let Some(street) = &draft.street {
        form.append_with_str("street", street)?;
    }
    if let Some(price) = &draft.price {
        form.append_with_str("price", price)?;
    }
    if let Some(replace) = replace_images {
        form.append_with_str("replace_images", if replace { "true" } else { "false" })?;
    }
    for file in files {
        form.append_with_blob_and_filename("files", file, &file.name())?;
    }
    Ok(form)
}

fn js_error_text(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

/// Интерпретация ответа бекенда:
/// - 204 — успех без тела;
/// - non-2xx — достаём detail, иначе общее сообщение;
/// - 2xx с нечитаемым телом — считаем, что данных нет (не ошибка)
fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<Option<T>, ApiError> {
    if status == 204 {
        return Ok(None);
    }

    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorDetail>(body)
            .ok()
            .and_then(|d| d.detail)
            .unwrap_or_else(|| GENERIC_ERROR.to_string());
        return Err(ApiError::Backend(message));
    }

    match serde_json::from_str::<T>(body) {
        Ok(value) => Ok(Some(value)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Post;

    #[test]
    fn no_content_resolves_to_none() {
        let result = decode_body::<serde_json::Value>(204, "");
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn backend_detail_is_extracted() {
        let result = decode_body::<serde_json::Value>(400, r#"{ "detail": "Нет такого поста" }"#);
        match result {
            Err(ApiError::Backend(message)) => assert_eq!(message, "Нет такого поста"),
            other => panic!("ожидали Backend-ошибку, получили {:?}", other),
        }
    }

    #[test]
    fn error_without_detail_gets_generic_message() {
        let result = decode_body::<serde_json::Value>(500, "внутренняя ошибка");
        match result {
            Err(ApiError::Backend(message)) => assert_eq!(message, GENERIC_ERROR),
            other => panic!("ожидали Backend-ошибку, получили {:?}", other),
        }
    }

    #[test]
    fn unreadable_success_body_is_treated_as_no_data() {
        let result = decode_body::<Post>(200, "");
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn success_body_is_parsed() {
        let result = decode_body::<Post>(200, r#"{ "id": 1, "title": "t", "content": "c" }"#);
        let post = result.unwrap().unwrap();
        assert_eq!(post.id, 1);
    }
}
