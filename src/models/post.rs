use serde::{Deserialize, Deserializer, Serialize};

/// Объявление (внешняя сущность, приходит с бекенда)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    /// Бекенд присылает изображения то строками, то объектами с image_url/url —
    /// нормализуем в плоский список URL прямо на границе десериализации
    #[serde(default, deserialize_with = "deserialize_images")]
    pub images: Vec<String>,
    #[serde(default)]
    pub moderation_status: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Post {
    /// Статус модерации с учётом возможных префиксов вида "status.rejected"
    pub fn is_rejected(&self) -> bool {
        status_contains(self.moderation_status.as_deref(), "rejected")
    }

    pub fn is_pending(&self) -> bool {
        status_contains(self.moderation_status.as_deref(), "pending")
    }

    /// Текст карточки: описание обрезаем до 180 символов
    pub fn preview_text(&self) -> String {
        let chars: Vec<char> = self.content.chars().collect();
        if chars.len() > 180 {
            let mut s: String = chars[..177].iter().collect();
            s.push_str("...");
            s
        } else {
            self.content.clone()
        }
    }
}

fn status_contains(status: Option<&str>, needle: &str) -> bool {
    status
        .map(|s| s.to_lowercase().contains(needle))
        .unwrap_or(false)
}

/// Элемент списка изображений в «сыром» виде
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawImage {
    Url(String),
    Object {
        #[serde(default)]
        image_url: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl RawImage {
    fn into_url(self) -> Option<String> {
        match self {
            RawImage::Url(url) => Some(url),
            RawImage::Object { image_url, url } => image_url.or(url),
        }
        .filter(|u| !u.is_empty())
    }
}

fn deserialize_images<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<RawImage>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(RawImage::into_url)
        .collect())
}

/// Черновик объявления (поля формы создания/редактирования)
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_normalize_mixed_shapes() {
        let json = r#"{
            "id": 1,
            "title": "t",
            "content": "c",
            "images": [
                "https://cdn/one.jpg",
                { "image_url": "https://cdn/two.jpg" },
                { "url": "https://cdn/three.jpg" },
                { "image_url": null, "url": null },
                ""
            ]
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(
            post.images,
            vec![
                "https://cdn/one.jpg".to_string(),
                "https://cdn/two.jpg".to_string(),
                "https://cdn/three.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn missing_images_field_is_empty_list() {
        let post: Post = serde_json::from_str(r#"{ "id": 2, "title": "t", "content": "c" }"#).unwrap();
        assert!(post.images.is_empty());
    }

    #[test]
    fn rejected_status_matches_prefixed_values() {
        let mut post: Post =
            serde_json::from_str(r#"{ "id": 3, "title": "t", "content": "c" }"#).unwrap();
        post.moderation_status = Some("ModerationStatus.REJECTED".to_string());
        assert!(post.is_rejected());
        post.moderation_status = Some("pending".to_string());
        assert!(!post.is_rejected());
        assert!(post.is_pending());
    }

    #[test]
    fn preview_truncates_long_content() {
        let mut post: Post =
            serde_json::from_str(r#"{ "id": 4, "title": "t", "content": "c" }"#).unwrap();
        post.content = "я".repeat(200);
        let preview = post.preview_text();
        assert_eq!(preview.chars().count(), 180);
        assert!(preview.ends_with("..."));
    }
}
