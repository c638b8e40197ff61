// ============================================================================
// CONTACTS - Статическая страница контактов
// ============================================================================

use wasm_bindgen::prelude::*;

use crate::app::Ctx;
use crate::dom::{append_child, ElementBuilder};
use crate::router::RouteParams;
use crate::views;

pub fn contacts_view(ctx: Ctx, _params: RouteParams) {
    if let Err(err) = render(&ctx) {
        log::error!("Не удалось отрендерить страницу контактов: {:?}", err);
    }
}

fn render(ctx: &Ctx) -> Result<(), JsValue> {
    let main = views::begin_page(ctx, Some("Контакты"));

    let panel = ElementBuilder::new("section")?
        .class("panel panel-large")
        .child(
            &ElementBuilder::new("h1")?
                .class("panel-title")
                .text("Контакты")
                .build(),
        )?
        .child(
            &ElementBuilder::new("p")?
                .class("panel-subtitle")
                .text("Вопросы по работе площадки, модерации и сотрудничеству.")
                .build(),
        )?
        .build();

    let list = ElementBuilder::new("ul")?.class("contact-list").build();
    for (label, value) in [
        ("Поддержка", "support@lightnet.example"),
        ("Телеграм", "@lightnet_support"),
        ("Модерация", "moderation@lightnet.example"),
    ] {
        let item = ElementBuilder::new("li")?
            .class("contact-item")
            .child(
                &ElementBuilder::new("span")?
                    .class("contact-label")
                    .text(label)
                    .build(),
            )?
            .child(
                &ElementBuilder::new("span")?
                    .class("contact-value")
                    .text(value)
                    .build(),
            )?
            .build();
        append_child(&list, &item)?;
    }

    append_child(&panel, &list)?;
    append_child(&main, &panel)
}
