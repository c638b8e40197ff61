// ============================================================================
// DASHBOARD - Личный кабинет
// ============================================================================
// Профиль со сменой ника (смена не чаще раза в 30 дней), список собственных
// объявлений со статусами модерации. Счётчик отклонённых синхронизируется
// в сессию, чтобы бейдж в хедере не отставал.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::app::Ctx;
use crate::components::{
    button, confirm_modal, input_field, post_card, set_button_disabled, set_button_label,
    ConfirmOptions, FieldOptions, PostCardActions,
};
use crate::config::COOLDOWN_TICK_INTERVAL_MS;
use crate::dom::{append_child, on_click, set_text_content, ElementBuilder};
use crate::models::Post;
use crate::router::RouteParams;
use crate::session::UserMetaPatch;
use crate::shell::Lease;
use crate::utils::validate::remaining_label;
use crate::views;

const USERNAME_COOLDOWN_DAYS: f64 = 30.0;

pub fn dashboard_view(ctx: Ctx, _params: RouteParams) {
    if let Err(err) = render(&ctx) {
        log::error!("Не удалось отрендерить личный кабинет: {:?}", err);
    }
}

fn render(ctx: &Ctx) -> Result<(), JsValue> {
    let main = views::begin_page(ctx, Some("Личный кабинет"));

    render_profile_panel(ctx, &main)?;

    let posts_section = ElementBuilder::new("section")?.class("panel").build();
    let posts_header = ElementBuilder::new("div")?
        .class("panel-header")
        .child(
            &ElementBuilder::new("h2")?
                .class("panel-title")
                .text("Мои объявления")
                .build(),
        )?
        .build();
    let add_btn = button("Добавить объявление", "primary", "md")?;
    {
        let router = ctx.router.clone();
        on_click(&add_btn, move |_| router.navigate("/add"))?;
    }
    append_child(&posts_header, &add_btn)?;

    let posts_container = ElementBuilder::new("div")?.class("posts-grid").build();
    append_child(&posts_section, &posts_header)?;
    append_child(&posts_section, &posts_container)?;
    append_child(&main, &posts_section)?;

    let ctx = ctx.clone();
    spawn_local(async move {
        load_own_posts(&ctx, &posts_container).await;
    });

    Ok(())
}

// ---------- Профиль ----------

fn render_profile_panel(ctx: &Ctx, main: &Element) -> Result<(), JsValue> {
    let user = ctx.session.user();

    let panel = ElementBuilder::new("section")?.class("panel profile-panel").build();
    let title = ElementBuilder::new("h2")?
        .class("panel-title")
        .text("Профиль")
        .build();
    let email_row = ElementBuilder::new("p")?
        .class("profile-email")
        .text(&format!(
            "Почта: {}",
            user.email.as_deref().unwrap_or("неизвестна")
        ))
        .build();

    let username_field = input_field(&FieldOptions {
        label: "Никнейм (менять можно раз в 30 дней)",
        name: "username",
        placeholder: "Придумайте никнейм",
        ..Default::default()
    })?;
    if let Some(username) = &user.username {
        username_field.control.set_value(username);
    }

    let save_btn = button("Сменить никнейм", "secondary", "md")?;
    let cooldown_note = ElementBuilder::new("p")?.class("cooldown-note").build();

    append_child(&panel, &title)?;
    append_child(&panel, &email_row)?;
    append_child(&panel, &username_field.wrapper)?;
    append_child(&panel, &save_btn)?;
    append_child(&panel, &cooldown_note)?;
    append_child(main, &panel)?;

    // Кулдаун: блокируем форму и раз в минуту обновляем остаток времени
    apply_cooldown_state(ctx, &username_field.control, &save_btn, &cooldown_note);
    {
        let ctx_tick = ctx.clone();
        let control = username_field.control.clone();
        let save_btn_tick = save_btn.clone();
        let note = cooldown_note.clone();
        ctx.shell.adopt_lease(Lease::interval(COOLDOWN_TICK_INTERVAL_MS, move || {
            apply_cooldown_state(&ctx_tick, &control, &save_btn_tick, &note);
        }));
    }

    let ctx = ctx.clone();
    let control = username_field.control.clone();
    let save_btn_el = save_btn.clone();
    let note = cooldown_note;
    on_click(&save_btn, move |_| {
        let username = control.value().trim().to_string();
        if username.is_empty() {
            ctx.shell.toast_error("Никнейм не может быть пустым");
            return;
        }
        if username == ctx.session.user().username.unwrap_or_default() {
            ctx.shell.toast_error("Это и так ваш текущий никнейм");
            return;
        }

        set_button_disabled(&save_btn_el, true);
        set_button_label(&save_btn_el, "Сохраняем...");

        let ctx = ctx.clone();
        let control = control.clone();
        let save_btn_el = save_btn_el.clone();
        let note = note.clone();
        spawn_local(async move {
            match ctx.api.update_username(&username).await {
                Ok(response) => {
                    let confirmed = response
                        .map(|r| r.username)
                        .unwrap_or_else(|| username.clone());
                    ctx.session.set_user_meta(UserMetaPatch {
                        username: Some(confirmed),
                        username_change_cooldown_until: Some(Some(cooldown_deadline_iso())),
                        ..Default::default()
                    });
                    ctx.shell.toast_success("Никнейм обновлён");
                    views::render_shell(&ctx);
                }
                Err(err) => log::warn!("Смена никнейма не удалась: {}", err),
            }
            set_button_label(&save_btn_el, "Сменить никнейм");
            apply_cooldown_state(&ctx, &control, &save_btn_el, &note);
        });
    })
}

fn apply_cooldown_state(
    ctx: &Ctx,
    control: &crate::components::FieldControl,
    save_btn: &Element,
    note: &Element,
) {
    match cooldown_remaining_ms(ctx) {
        Some(remaining) if remaining > 0 => {
            control.set_disabled(true);
            set_button_disabled(save_btn, true);
            let label = remaining_label(remaining).unwrap_or_default();
            set_text_content(note, &format!("Следующая смена будет доступна через {}", label));
        }
        _ => {
            control.set_disabled(false);
            set_button_disabled(save_btn, false);
            set_text_content(note, "");
            // Истёкший дедлайн убираем из сессии, чтобы не парсить его снова
            if ctx.session.user().username_change_cooldown_until.is_some() {
                ctx.session.set_user_meta(UserMetaPatch {
                    username_change_cooldown_until: Some(None),
                    ..Default::default()
                });
            }
        }
    }
}

fn cooldown_remaining_ms(ctx: &Ctx) -> Option<i64> {
    let deadline = ctx.session.user().username_change_cooldown_until?;
    let parsed = js_sys::Date::new(&JsValue::from_str(&deadline));
    let time = parsed.get_time();
    if time.is_nan() {
        return None;
    }
    Some((time - js_sys::Date::now()) as i64)
}

fn cooldown_deadline_iso() -> String {
    let deadline = js_sys::Date::new_0();
    deadline.set_time(js_sys::Date::now() + USERNAME_COOLDOWN_DAYS * 24.0 * 60.0 * 60.0 * 1000.0);
    deadline.to_iso_string().as_string().unwrap_or_default()
}

// ---------- Собственные объявления ----------

async fn load_own_posts(ctx: &Ctx, container: &Element) {
    let Some(user_id) = ctx.session.user().user_id else {
        // user_id мог не доехать при прошлом входе — добираем из профиля
        match ctx.api.get_me().await {
            Ok(Some(profile)) => {
                ctx.session.set_user_meta(UserMetaPatch {
                    user_id: Some(profile.id),
                    username: profile.username,
                    role: profile.role,
                    ..Default::default()
                });
                let ctx = ctx.clone();
                let container = container.clone();
                spawn_local(async move {
                    load_own_posts(&ctx, &container).await;
                });
            }
            _ => {
                if let Err(err) = render_empty(container, "Не удалось определить пользователя.") {
                    log::error!("Не удалось отрендерить заглушку: {:?}", err);
                }
            }
        }
        return;
    };

    let posts = ctx.api.get_user_posts(user_id).await.unwrap_or_default();

    // Бейдж отклонённых в хедере живёт от этого счётчика
    let rejected = posts.iter().filter(|p| p.is_rejected()).count() as u32;
    if ctx.session.user().rejected_count != rejected {
        ctx.session.set_user_meta(UserMetaPatch {
            rejected_count: Some(rejected),
            ..Default::default()
        });
        views::render_shell(ctx);
    }

    if let Err(err) = render_own_posts(ctx, container, posts) {
        log::error!("Не удалось отрендерить список объявлений: {:?}", err);
    }
}

fn render_own_posts(ctx: &Ctx, container: &Element, posts: Vec<Post>) -> Result<(), JsValue> {
    if posts.is_empty() {
        return render_empty(container, "У вас пока нет объявлений.");
    }

    for post in posts {
        let card_wrap = ElementBuilder::new("div")?.class("post-card-wrap").build();

        if post.is_pending() {
            let badge = ElementBuilder::new("div")?
                .class("status-banner status-pending")
                .text("На модерации")
                .build();
            append_child(&card_wrap, &badge)?;
        } else if post.is_rejected() {
            let reason = post
                .rejection_reason
                .as_deref()
                .unwrap_or("причина не указана");
            let badge = ElementBuilder::new("div")?
                .class("status-banner status-rejected")
                .text(&format!("Отклонено: {}", reason))
                .build();
            append_child(&card_wrap, &badge)?;
        }

        let on_edit = {
            let router = ctx.router.clone();
            let id = post.id;
            Box::new(move || router.navigate(&format!("/edit/{}", id))) as Box<dyn FnMut()>
        };
        let on_delete = {
            let ctx = ctx.clone();
            let id = post.id;
            Box::new(move || {
                let ctx = ctx.clone();
                let confirm = confirm_modal(
                    &ConfirmOptions {
                        title: "Удалить объявление",
                        message: "Удалить это объявление без возможности восстановления?",
                        confirm_text: "Удалить",
                        confirm_variant: "danger",
                    },
                    move |confirmed| {
                        if !confirmed {
                            return;
                        }
                        spawn_local(async move {
                            if ctx.api.delete_post(id).await.is_ok() {
                                ctx.shell.toast_success("Объявление удалено");
                                ctx.router.refresh(&ctx);
                            }
                        });
                    },
                );
                if let Err(err) = confirm {
                    log::error!("Не удалось показать подтверждение: {:?}", err);
                }
            }) as Box<dyn FnMut()>
        };

        let card = post_card(
            &post,
            true,
            PostCardActions {
                on_open: None,
                on_edit: Some(on_edit),
                on_delete: Some(on_delete),
            },
        )?;
        append_child(&card_wrap, &card)?;
        append_child(container, &card_wrap)?;
    }

    Ok(())
}

fn render_empty(container: &Element, message: &str) -> Result<(), JsValue> {
    let empty = ElementBuilder::new("p")?
        .class("empty-state")
        .text(message)
        .build();
    append_child(container, &empty)
}
