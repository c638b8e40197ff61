/// Базовый URL бекенда
/// Задаётся на этапе компиляции:
/// - Разработка: http://localhost:8000 (по умолчанию)
/// - Продакшн: через переменную окружения API_BASE_URL (см. build.rs)
pub const API_BASE_URL: &str = match option_env!("API_BASE_URL") {
    Some(url) => url,
    None => "http://localhost:8000",
};

/// Ключ localStorage, под которым лежит сериализованная сессия
pub const SESSION_STORAGE_KEY: &str = "lightnet_frontend_state";

/// Интервал опроса счётчика объявлений на модерации (мс)
pub const PENDING_POLL_INTERVAL_MS: u32 = 30_000;

/// Интервал обновления таймера смены ника (мс)
pub const COOLDOWN_TICK_INTERVAL_MS: u32 = 60_000;

/// Ограничения на изображения в объявлении
pub const MAX_POST_IMAGES: usize = 10;
pub const MAX_IMAGE_SIZE_BYTES: f64 = 5.0 * 1024.0 * 1024.0;
