// ============================================================================
// USERS - Управление пользователями
// ============================================================================
// Список пользователей с ролями и статусом блокировки. Бан доступен
// модератору и админу, выдача роли модератора — только админу.
// Администраторов трогать нельзя.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::app::Ctx;
use crate::components::{button, confirm_modal, format_date, ConfirmOptions};
use crate::dom::{append_child, on_click, set_inner_html, ElementBuilder};
use crate::models::ManagedUser;
use crate::router::RouteParams;
use crate::views;

pub fn users_view(ctx: Ctx, _params: RouteParams) {
    if let Err(err) = render(&ctx) {
        log::error!("Не удалось отрендерить список пользователей: {:?}", err);
    }
}

fn render(ctx: &Ctx) -> Result<(), JsValue> {
    let main = views::begin_page(ctx, Some("Пользователи"));

    let panel = ElementBuilder::new("section")?.class("panel").build();
    let title = ElementBuilder::new("h1")?
        .class("panel-title")
        .text("Пользователи")
        .build();
    let list = ElementBuilder::new("div")?.class("user-list").build();

    append_child(&panel, &title)?;
    append_child(&panel, &list)?;
    append_child(&main, &panel)?;

    reload(ctx.clone(), list);
    Ok(())
}

fn reload(ctx: Ctx, list: Element) {
    spawn_local(async move {
        let users = ctx.api.list_users().await.unwrap_or_default();
        if let Err(err) = render_users(&ctx, &list, users) {
            log::error!("Не удалось отрендерить пользователей: {:?}", err);
        }
    });
}

fn render_users(ctx: &Ctx, list: &Element, users: Vec<ManagedUser>) -> Result<(), JsValue> {
    set_inner_html(list, "");

    if users.is_empty() {
        let empty = ElementBuilder::new("p")?
            .class("empty-state")
            .text("Пользователей пока нет.")
            .build();
        return append_child(list, &empty);
    }

    let own_id = ctx.session.user().user_id;
    for user in users {
        let row = render_user_row(ctx, list.clone(), &user, own_id)?;
        append_child(list, &row)?;
    }
    Ok(())
}

fn render_user_row(
    ctx: &Ctx,
    list: Element,
    user: &ManagedUser,
    own_id: Option<i64>,
) -> Result<Element, JsValue> {
    let row = ElementBuilder::new("div")?.class("user-row").build();

    let display_name = user
        .username
        .as_deref()
        .or(user.email.as_deref())
        .unwrap_or("без имени");
    let identity = ElementBuilder::new("div")?
        .class("user-identity")
        .child(
            &ElementBuilder::new("span")?
                .class("user-name")
                .text(display_name)
                .build(),
        )?
        .child(
            &ElementBuilder::new("span")?
                .class("user-email")
                .text(user.email.as_deref().unwrap_or(""))
                .build(),
        )?
        .child(
            &ElementBuilder::new("span")?
                .class("user-joined")
                .text(&format_date(user.created_at.as_deref()))
                .build(),
        )?
        .build();

    let ban_badge = if user.is_banned {
        Some(
            ElementBuilder::new("span")?
                .class("badge badge-danger")
                .text("Заблокирован")
                .build(),
        )
    } else {
        None
    };
    let badges = ElementBuilder::new("div")?
        .class("user-badges")
        .child(
            &ElementBuilder::new("span")?
                .class(user.role_badge_class())
                .text(user.role_label())
                .build(),
        )?
        .maybe_child(ban_badge.as_ref())?
        .build();

    let actions = ElementBuilder::new("div")?.class("user-actions").build();

    let is_self = own_id == Some(user.id);
    if !user.is_admin() && !is_self {
        let ban_label = if user.is_banned { "Разблокировать" } else { "Заблокировать" };
        let ban_btn = button(ban_label, if user.is_banned { "secondary" } else { "danger" }, "sm")?;
        {
            let ctx = ctx.clone();
            let list = list.clone();
            let user_id = user.id;
            let banned = user.is_banned;
            let name = display_name.to_string();
            on_click(&ban_btn, move |_| {
                let ctx = ctx.clone();
                let list = list.clone();
                let message = if banned {
                    format!("Разблокировать пользователя {}?", name)
                } else {
                    format!("Заблокировать пользователя {}? Его объявления скроются.", name)
                };
                let confirm = confirm_modal(
                    &ConfirmOptions {
                        title: if banned { "Разблокировка" } else { "Блокировка" },
                        message: &message,
                        confirm_text: if banned { "Разблокировать" } else { "Заблокировать" },
                        confirm_variant: "danger",
                    },
                    move |confirmed| {
                        if !confirmed {
                            return;
                        }
                        spawn_local(async move {
                            if ctx.api.toggle_ban_user(user_id).await.is_ok() {
                                ctx.shell.toast_success("Статус блокировки обновлён");
                                reload(ctx.clone(), list);
                            }
                        });
                    },
                );
                if let Err(err) = confirm {
                    log::error!("Не удалось показать подтверждение: {:?}", err);
                }
            })?;
        }
        append_child(&actions, &ban_btn)?;

        if ctx.session.is_admin() {
            let role_label = if user.is_moderator() {
                "Снять модератора"
            } else {
                "Сделать модератором"
            };
            let role_btn = button(role_label, "secondary", "sm")?;
            {
                let ctx = ctx.clone();
                let user_id = user.id;
                let is_moderator = user.is_moderator();
                let name = display_name.to_string();
                on_click(&role_btn, move |_| {
                    let ctx = ctx.clone();
                    let list = list.clone();
                    let message = if is_moderator {
                        format!("Снять роль модератора с {}?", name)
                    } else {
                        format!("Выдать {} права модератора?", name)
                    };
                    let confirm = confirm_modal(
                        &ConfirmOptions {
                            title: "Смена роли",
                            message: &message,
                            confirm_text: "Подтвердить",
                            confirm_variant: "primary",
                        },
                        move |confirmed| {
                            if !confirmed {
                                return;
                            }
                            spawn_local(async move {
                                if ctx.api.toggle_moderator_role(user_id).await.is_ok() {
                                    ctx.shell.toast_success("Роль обновлена");
                                    reload(ctx.clone(), list);
                                }
                            });
                        },
                    );
                    if let Err(err) = confirm {
                        log::error!("Не удалось показать подтверждение: {:?}", err);
                    }
                })?;
            }
            append_child(&actions, &role_btn)?;
        }
    }

    append_child(&row, &identity)?;
    append_child(&row, &badges)?;
    append_child(&row, &actions)?;
    Ok(row)
}
