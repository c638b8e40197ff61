// ============================================================================
// LOGIN - Вход по одноразовому коду из письма
// ============================================================================
// Два шага: запрос кода на почту, затем обмен кода на access_token.
// После успешного входа подтягиваем профиль и идём в личный кабинет.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::app::Ctx;
use crate::components::{
    button, input_field, set_button_disabled, set_button_label, FieldOptions,
};
use crate::dom::{append_child, on_click, set_inner_html, ElementBuilder};
use crate::router::RouteParams;
use crate::session::UserMetaPatch;
use crate::views;

pub fn login_view(ctx: Ctx, _params: RouteParams) {
    if ctx.session.is_authenticated() {
        ctx.router.navigate("/dashboard");
        return;
    }
    if let Err(err) = render(&ctx) {
        log::error!("Не удалось отрендерить страницу входа: {:?}", err);
    }
}

fn render(ctx: &Ctx) -> Result<(), JsValue> {
    let main = views::begin_page(ctx, Some("Вход"));

    let panel = ElementBuilder::new("section")?.class("panel auth-panel").build();
    let title = ElementBuilder::new("h1")?
        .class("panel-title")
        .text("Вход в LightNet")
        .build();
    let subtitle = ElementBuilder::new("p")?
        .class("panel-subtitle")
        .text("Пароль не нужен: пришлём код подтверждения на почту.")
        .build();
    let step_slot = ElementBuilder::new("div")?.class("auth-step").build();

    append_child(&panel, &title)?;
    append_child(&panel, &subtitle)?;
    append_child(&panel, &step_slot)?;
    append_child(&main, &panel)?;

    render_email_step(ctx, &step_slot)
}

fn render_email_step(ctx: &Ctx, slot: &Element) -> Result<(), JsValue> {
    set_inner_html(slot, "");

    let email_field = input_field(&FieldOptions {
        label: "Электронная почта",
        name: "email",
        placeholder: "student@example.com",
        field_type: Some("email"),
        multiline: false,
    })?;
    let submit = button("Получить код", "primary", "md")?;

    append_child(slot, &email_field.wrapper)?;
    append_child(slot, &submit)?;

    let ctx = ctx.clone();
    let slot = slot.clone();
    let control = email_field.control.clone();
    let submit_el = submit.clone();
    on_click(&submit, move |_| {
        let email = control.value().trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            ctx.shell.toast_error("Введите корректный адрес почты");
            return;
        }

        set_button_disabled(&submit_el, true);
        set_button_label(&submit_el, "Отправляем...");

        let ctx = ctx.clone();
        let slot = slot.clone();
        let submit_el = submit_el.clone();
        spawn_local(async move {
            match ctx.api.request_code(&email).await {
                Ok(()) => {
                    // Токена ещё нет, но email уже фиксируем в сессии
                    ctx.session.set_auth(&email, None);
                    ctx.shell.toast_success("Код отправлен на почту");
                    if let Err(err) = render_code_step(&ctx, &slot, email) {
                        log::error!("Не удалось показать шаг ввода кода: {:?}", err);
                    }
                }
                Err(err) => {
                    log::warn!("Запрос кода не удался: {}", err);
                    set_button_disabled(&submit_el, false);
                    set_button_label(&submit_el, "Получить код");
                }
            }
        });
    })
}

fn render_code_step(ctx: &Ctx, slot: &Element, email: String) -> Result<(), JsValue> {
    set_inner_html(slot, "");

    let hint = ElementBuilder::new("p")?
        .class("auth-hint")
        .text(&format!("Код отправлен на {}", email))
        .build();
    let code_field = input_field(&FieldOptions {
        label: "Код из письма",
        name: "code",
        placeholder: "Например: 482913",
        ..Default::default()
    })?;
    let submit = button("Войти", "primary", "md")?;
    let back = button("Другая почта", "ghost", "sm")?;

    append_child(slot, &hint)?;
    append_child(slot, &code_field.wrapper)?;
    append_child(slot, &submit)?;
    append_child(slot, &back)?;

    {
        let ctx = ctx.clone();
        let slot = slot.clone();
        on_click(&back, move |_| {
            if let Err(err) = render_email_step(&ctx, &slot) {
                log::error!("Не удалось вернуться к вводу почты: {:?}", err);
            }
        })?;
    }

    let ctx = ctx.clone();
    let control = code_field.control.clone();
    let submit_el = submit.clone();
    on_click(&submit, move |_| {
        let code = control.value().trim().to_string();
        if code.is_empty() {
            ctx.shell.toast_error("Введите код из письма");
            return;
        }

        set_button_disabled(&submit_el, true);
        set_button_label(&submit_el, "Проверяем...");

        let ctx = ctx.clone();
        let email = email.clone();
        let submit_el = submit_el.clone();
        spawn_local(async move {
            match ctx.api.authorize(&email, &code).await {
                Ok(Some(token)) => {
                    ctx.session.set_auth(&email, Some(token.access_token));
                    sync_profile(&ctx).await;
                    ctx.shell.toast_success("Вы вошли в аккаунт");
                    ctx.router.navigate("/dashboard");
                }
                Ok(None) => {
                    ctx.shell.toast_error("Сервер не вернул токен, попробуйте ещё раз");
                    set_button_disabled(&submit_el, false);
                    set_button_label(&submit_el, "Войти");
                }
                Err(err) => {
                    log::warn!("Авторизация не удалась: {}", err);
                    set_button_disabled(&submit_el, false);
                    set_button_label(&submit_el, "Войти");
                }
            }
        });
    })
}

/// После входа сохраняем метаданные профиля, чтобы guard'ы и хедер
/// работали без повторных запросов
async fn sync_profile(ctx: &Ctx) {
    match ctx.api.get_me().await {
        Ok(Some(profile)) => {
            ctx.session.set_user_meta(UserMetaPatch {
                username: profile.username,
                user_id: Some(profile.id),
                role: profile.role,
                username_change_cooldown_until: Some(profile.next_username_change_at),
                ..Default::default()
            });
        }
        Ok(None) => log::warn!("Профиль не пришёл после входа"),
        Err(err) => log::warn!("Не удалось получить профиль: {}", err),
    }
}
