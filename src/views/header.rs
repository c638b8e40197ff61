// ============================================================================
// HEADER - Шапка приложения
// ============================================================================
// Логотип, навигация, кнопки входа/выхода. Для модератора/админа — ссылки
// на модерацию с бейджем количества ожидающих объявлений; бейдж обновляется
// периодическим опросом. Lease таймера заменяется при каждом перерендере
// хедера, поэтому интервалы не множатся между навигациями.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::Ctx;
use crate::components::button;
use crate::config::PENDING_POLL_INTERVAL_MS;
use crate::dom::{
    add_class, append_child, get_element_by_id, on_click, remove_class, set_inner_html,
    set_text_content, ElementBuilder,
};
use crate::shell::Lease;

const PENDING_BADGE_ID: &str = "pending-badge";

pub fn render(ctx: &Ctx) -> Result<(), JsValue> {
    let slot = ctx.shell.header_slot();
    set_inner_html(&slot, "");

    let header = ElementBuilder::new("header")?.class("app-header").build();

    // Логотип — клик ведёт на главную
    let logo = ElementBuilder::new("div")?
        .class("logo")
        .child(&ElementBuilder::new("span")?.class("logo-mark").text("LN").build())?
        .child(&ElementBuilder::new("span")?.class("logo-text").text("LightNet").build())?
        .build();
    {
        let router = ctx.router.clone();
        on_click(&logo, move |_| router.navigate("/"))?;
    }

    // Навигация
    let nav = ElementBuilder::new("nav")?.class("nav").build();
    for (path, label) in [("/", "Объявления"), ("/contacts", "Контакты")] {
        let link = ElementBuilder::new("button")?
            .class("nav-link")
            .text(label)
            .build();
        let router = ctx.router.clone();
        on_click(&link, move |_| router.navigate(path))?;
        append_child(&nav, &link)?;
    }

    let is_staff = ctx.session.is_moderator() || ctx.session.is_admin();

    if is_staff {
        let moderation_link = ElementBuilder::new("button")?
            .class("nav-link")
            .text("Модерация")
            .build();
        let badge = ElementBuilder::new("span")?
            .class("badge badge-counter hidden")
            .id(PENDING_BADGE_ID)?
            .build();
        append_child(&moderation_link, &badge)?;
        {
            let router = ctx.router.clone();
            on_click(&moderation_link, move |_| router.navigate("/moderator"))?;
        }
        append_child(&nav, &moderation_link)?;

        let users_link = ElementBuilder::new("button")?
            .class("nav-link")
            .text("Пользователи")
            .build();
        {
            let router = ctx.router.clone();
            on_click(&users_link, move |_| router.navigate("/users"))?;
        }
        append_child(&nav, &users_link)?;
    }

    // Правая часть: кнопки сессии
    let right = ElementBuilder::new("div")?.class("header-right").build();

    if ctx.session.is_authenticated() {
        let user = ctx.session.user();

        let dashboard_btn = button("Личный кабинет", "ghost", "sm")?;
        if user.rejected_count > 0 {
            let rejected_badge = ElementBuilder::new("span")?
                .class("badge badge-danger")
                .text(&user.rejected_count.to_string())
                .build();
            append_child(&dashboard_btn, &rejected_badge)?;
        }
        {
            let router = ctx.router.clone();
            on_click(&dashboard_btn, move |_| router.navigate("/dashboard"))?;
        }

        let display_name = user
            .username
            .or(user.email)
            .unwrap_or_else(|| "Студент".to_string());
        let user_pill = ElementBuilder::new("div")?
            .class("user-pill")
            .child(
                &ElementBuilder::new("span")?
                    .class("user-name")
                    .text(&display_name)
                    .build(),
            )?
            .build();

        let logout_btn = button("Выйти", "secondary", "sm")?;
        {
            let session = ctx.session.clone();
            let router = ctx.router.clone();
            on_click(&logout_btn, move |_| {
                session.clear_auth();
                router.navigate("/");
            })?;
        }

        append_child(&right, &dashboard_btn)?;
        append_child(&right, &user_pill)?;
        append_child(&right, &logout_btn)?;
    } else {
        let login_btn = button("Войти", "secondary", "sm")?;
        let router = ctx.router.clone();
        on_click(&login_btn, move |_| router.navigate("/login"))?;
        append_child(&right, &login_btn)?;
    }

    append_child(&header, &logo)?;
    append_child(&header, &nav)?;
    append_child(&header, &right)?;
    append_child(&slot, &header)?;

    // Опрос счётчика модерации: старый lease гаснет при замене
    if is_staff {
        refresh_pending_badge(ctx);
        let ctx_poll = ctx.clone();
        let lease = Lease::interval(PENDING_POLL_INTERVAL_MS, move || {
            refresh_pending_badge(&ctx_poll);
        });
        ctx.shell.set_header_lease(Some(lease));
    } else {
        ctx.shell.set_header_lease(None);
    }

    Ok(())
}

fn refresh_pending_badge(ctx: &Ctx) {
    let api = ctx.api.clone();
    spawn_local(async move {
        match api.get_pending_posts().await {
            Ok(posts) => update_pending_badge(posts.len()),
            Err(err) => log::debug!("Опрос счётчика модерации не удался: {}", err),
        }
    });
}

fn update_pending_badge(count: usize) {
    let Some(badge) = get_element_by_id(PENDING_BADGE_ID) else {
        return;
    };
    if count > 0 {
        set_text_content(&badge, &count.to_string());
        let _ = remove_class(&badge, "hidden");
    } else {
        let _ = add_class(&badge, "hidden");
    }
}
