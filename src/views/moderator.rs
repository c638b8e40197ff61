// ============================================================================
// MODERATOR - Очередь модерации объявлений
// ============================================================================
// Список ожидающих постов с полным содержимым, одобрение в один клик,
// отклонение с обязательной причиной. После действия список
// перезагружается, бейдж в хедере обновляет периодический опрос.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::app::Ctx;
use crate::components::{button, format_date, prompt_modal, PromptOptions};
use crate::dom::{append_child, on_click, set_inner_html, ElementBuilder};
use crate::models::Post;
use crate::router::RouteParams;
use crate::views;

pub fn moderator_view(ctx: Ctx, _params: RouteParams) {
    if let Err(err) = render(&ctx) {
        log::error!("Не удалось отрендерить страницу модерации: {:?}", err);
    }
}

fn render(ctx: &Ctx) -> Result<(), JsValue> {
    let main = views::begin_page(ctx, Some("Модерация"));

    let panel = ElementBuilder::new("section")?.class("panel").build();
    let title = ElementBuilder::new("h1")?
        .class("panel-title")
        .text("Объявления на модерации")
        .build();
    let list = ElementBuilder::new("div")?.class("moderation-list").build();

    append_child(&panel, &title)?;
    append_child(&panel, &list)?;
    append_child(&main, &panel)?;

    reload(ctx.clone(), list);
    Ok(())
}

fn reload(ctx: Ctx, list: Element) {
    spawn_local(async move {
        let posts = ctx.api.get_pending_posts().await.unwrap_or_default();
        if let Err(err) = render_queue(&ctx, &list, posts) {
            log::error!("Не удалось отрендерить очередь модерации: {:?}", err);
        }
    });
}

fn render_queue(ctx: &Ctx, list: &Element, posts: Vec<Post>) -> Result<(), JsValue> {
    set_inner_html(list, "");

    if posts.is_empty() {
        let empty = ElementBuilder::new("p")?
            .class("empty-state")
            .text("Очередь пуста: новых объявлений нет.")
            .build();
        return append_child(list, &empty);
    }

    for post in posts {
        let card = render_pending_card(ctx, list.clone(), &post)?;
        append_child(list, &card)?;
    }
    Ok(())
}

/// Карточка в очереди показывает полное содержимое: модератор
/// должен видеть всё, что увидят пользователи
fn render_pending_card(ctx: &Ctx, list: Element, post: &Post) -> Result<Element, JsValue> {
    let card = ElementBuilder::new("article")?.class("moderation-card").build();

    let author = post
        .username
        .as_deref()
        .or(post.user_email.as_deref())
        .unwrap_or("неизвестный автор");
    let header = ElementBuilder::new("div")?
        .class("moderation-card-header")
        .child(
            &ElementBuilder::new("h3")?
                .class("post-title")
                .text(&post.title)
                .build(),
        )?
        .child(
            &ElementBuilder::new("span")?
                .class("post-author")
                .text(&format!(
                    "{} · {}",
                    author,
                    format_date(post.created_at.as_deref())
                ))
                .build(),
        )?
        .build();

    let content = ElementBuilder::new("p")?
        .class("post-content-full")
        .text(&post.content)
        .build();

    append_child(&card, &header)?;
    append_child(&card, &content)?;

    if !post.images.is_empty() {
        let gallery = ElementBuilder::new("div")?.class("moderation-images").build();
        for image_url in &post.images {
            let img = ElementBuilder::new("img")?
                .class("moderation-image")
                .attr("src", image_url)?
                .attr("alt", "Фото объявления")?
                .build();
            append_child(&gallery, &img)?;
        }
        append_child(&card, &gallery)?;
    }

    let details = ElementBuilder::new("p")?
        .class("post-details")
        .text(&format!(
            "Контакты: {} · Город: {} · Цена: {}",
            post.contact.as_deref().unwrap_or("—"),
            post.city.as_deref().unwrap_or("—"),
            post.price.as_deref().unwrap_or("—"),
        ))
        .build();
    append_child(&card, &details)?;

    let actions = ElementBuilder::new("div")?.class("moderation-actions").build();
    let approve_btn = button("Одобрить", "primary", "sm")?;
    let reject_btn = button("Отклонить", "danger", "sm")?;
    append_child(&actions, &approve_btn)?;
    append_child(&actions, &reject_btn)?;
    append_child(&card, &actions)?;

    {
        let ctx = ctx.clone();
        let list = list.clone();
        let id = post.id;
        on_click(&approve_btn, move |_| {
            let ctx = ctx.clone();
            let list = list.clone();
            spawn_local(async move {
                if ctx.api.approve_post(id).await.is_ok() {
                    ctx.shell.toast_success("Объявление одобрено");
                    reload(ctx.clone(), list);
                }
            });
        })?;
    }

    {
        let ctx = ctx.clone();
        let id = post.id;
        on_click(&reject_btn, move |_| {
            let ctx = ctx.clone();
            let list = list.clone();
            let prompt = prompt_modal(
                &PromptOptions {
                    title: "Отклонить объявление",
                    message: "Причина отклонения (её увидит автор):",
                    placeholder: "Например: запрещённая категория товаров",
                    confirm_text: "Отклонить",
                    confirm_variant: "danger",
                    multiline: true,
                },
                move |reason| {
                    let Some(reason) = reason else {
                        // Пустая причина — отклонение не выполняем
                        ctx.shell.toast_error("Укажите причину отклонения");
                        return;
                    };
                    spawn_local(async move {
                        if ctx.api.reject_post(id, &reason).await.is_ok() {
                            ctx.shell.toast_success("Объявление отклонено");
                            reload(ctx.clone(), list);
                        }
                    });
                },
            );
            if let Err(err) = prompt {
                log::error!("Не удалось показать окно причины: {:?}", err);
            }
        })?;
    }

    Ok(card)
}
