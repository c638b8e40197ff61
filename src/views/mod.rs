// ============================================================================
// VIEWS - Страницы приложения
// ============================================================================
// Каждая вьюшка следует одной последовательности: перерендер хедера,
// очистка контента, анимация входа, заголовок вкладки, затем данные и DOM.
// Проверку прав делает диспетчер роутера до вызова вьюшки.
// ============================================================================

pub mod contacts;
pub mod dashboard;
pub mod header;
pub mod home;
pub mod login;
pub mod moderator;
pub mod post_form;
pub mod users;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::app::Ctx;
use crate::components::button;
use crate::dom::{append_child, on_click, ElementBuilder};

/// Перерендерить хедер под текущее состояние сессии
pub fn render_shell(ctx: &Ctx) {
    if let Err(err) = header::render(ctx) {
        log::error!("Не удалось отрендерить хедер: {:?}", err);
    }
}

/// Общий пролог вьюшки; возвращает контентный слот
pub fn begin_page(ctx: &Ctx, title: Option<&str>) -> Element {
    render_shell(ctx);
    ctx.shell.clear_main();
    ctx.shell.animate_page_in();
    ctx.shell.set_page_title(title);
    ctx.shell.main_slot()
}

/// Экран 404: показывается, когда маршрут не совпал и корневой шаблон
/// не зарегистрирован
pub fn render_not_found(ctx: &Ctx, path: &str) {
    let main = begin_page(ctx, Some("Страница не найдена"));
    if let Err(err) = render_not_found_panel(ctx, &main, path) {
        log::error!("Не удалось отрендерить экран 404: {:?}", err);
    }
}

fn render_not_found_panel(ctx: &Ctx, main: &Element, path: &str) -> Result<(), JsValue> {
    let card = ElementBuilder::new("section")?
        .class("panel panel-large")
        .child(
            &ElementBuilder::new("h1")?
                .class("panel-title")
                .text("Страница не найдена")
                .build(),
        )?
        .child(
            &ElementBuilder::new("p")?
                .class("panel-subtitle")
                .text(&format!("Нет такой страницы: {}", path))
                .build(),
        )?
        .build();

    let home_btn = button("На главную", "primary", "md")?;
    let router = ctx.router.clone();
    on_click(&home_btn, move |_| router.navigate("/"))?;
    append_child(&card, &home_btn)?;
    append_child(main, &card)
}

/// Экран "доступ запрещён" для маршрутов со Staff-guard
pub fn render_access_denied(ctx: &Ctx) {
    let main = begin_page(ctx, Some("Доступ запрещён"));
    let result: Result<(), JsValue> = (|| {
        let card = ElementBuilder::new("section")?
            .class("panel panel-large")
            .child(
                &ElementBuilder::new("h1")?
                    .class("panel-title")
                    .text("Доступ запрещен")
                    .build(),
            )?
            .child(
                &ElementBuilder::new("p")?
                    .class("panel-subtitle")
                    .text("У вас нет прав для доступа к этой странице.")
                    .build(),
            )?
            .build();
        append_child(&main, &card)
    })();
    if let Err(err) = result {
        log::error!("Не удалось отрендерить экран отказа: {:?}", err);
    }
}
