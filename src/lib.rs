// ============================================================================
// LIGHTNET FRONTEND - Площадка объявлений (WASM SPA без фреймворка)
// ============================================================================

pub mod app;
pub mod components;
pub mod config;
pub mod dom;
pub mod models;
pub mod router;
pub mod services;
pub mod session;
pub mod shell;
pub mod utils;
pub mod views;

use wasm_bindgen::prelude::*;

use crate::app::App;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("🚀 LightNet frontend, API: {}", config::API_BASE_URL);

    if let Err(err) = App::start() {
        log::error!("Запуск приложения провалился: {:?}", err);
        render_startup_failure();
    }
}

/// Статический экран ошибки: рисуется без оболочки, потому что она
/// могла не собраться
fn render_startup_failure() {
    let Some(body) = dom::document().and_then(|doc| doc.body()) else {
        return;
    };
    body.set_inner_html(
        "<div class=\"fatal-error\">\
            <h1>Что-то пошло не так</h1>\
            <p>Не удалось запустить приложение. Обновите страницу.</p>\
        </div>",
    );
}
