// ============================================================================
// HOME - Главная: список одобренных объявлений
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::app::Ctx;
use crate::components::{
    button, confirm_modal, input_field, post_card, ConfirmOptions, FieldControl, FieldOptions,
    PostCardActions,
};
use crate::dom::{append_child, document, on_change, on_click, on_input, set_inner_html, ElementBuilder};
use crate::models::Post;
use crate::router::RouteParams;
use crate::views;

pub fn home_view(ctx: Ctx, _params: RouteParams) {
    if let Err(err) = render(&ctx) {
        log::error!("Не удалось отрендерить главную: {:?}", err);
    }
}

fn render(ctx: &Ctx) -> Result<(), JsValue> {
    let main = views::begin_page(ctx, Some("Объявления"));

    // Hero-блок с призывом к действию
    let hero = ElementBuilder::new("section")?.class("hero").build();
    let hero_text = ElementBuilder::new("div")?
        .class("hero-text")
        .child(
            &ElementBuilder::new("h1")?
                .class("hero-title")
                .text("LightNet - площадка бесплатных объявлений для ваших товаров и услуг")
                .build(),
        )?
        .child(
            &ElementBuilder::new("p")?
                .class("hero-subtitle")
                .text("Размещайте и находите объявления быстро и удобно — в одном месте.")
                .build(),
        )?
        .build();
    append_child(&hero, &hero_text)?;

    if ctx.session.is_authenticated() {
        let add_btn = button("Добавить объявление", "primary", "lg")?;
        let router = ctx.router.clone();
        on_click(&add_btn, move |_| router.navigate("/add"))?;
        append_child(&hero, &add_btn)?;
    } else {
        let login_btn = button("Войти, чтобы разместить объявление", "primary", "lg")?;
        let router = ctx.router.clone();
        on_click(&login_btn, move |_| router.navigate("/login"))?;
        append_child(&hero, &login_btn)?;
    }

    // Строка поиска и переключатель "только мои"
    let search_row = ElementBuilder::new("div")?.class("search-row").build();
    let search_field = input_field(&FieldOptions {
        label: "Поиск по заголовку и описанию",
        name: "search",
        placeholder: "Например: «сниму комнату», «репетитор по математике»",
        ..Default::default()
    })?;

    let toggle_label = ElementBuilder::new("label")?.class("toggle").build();
    let toggle_input = ElementBuilder::new("input")?
        .class("toggle-input")
        .attr("type", "checkbox")?
        .build();
    let toggle_indicator = ElementBuilder::new("span")?.class("toggle-indicator").build();
    let toggle_text = ElementBuilder::new("span")?
        .class("toggle-label")
        .text("Показывать только мои")
        .build();
    append_child(&toggle_label, &toggle_input)?;
    append_child(&toggle_label, &toggle_indicator)?;
    append_child(&toggle_label, &toggle_text)?;

    append_child(&search_row, &search_field.wrapper)?;
    append_child(&search_row, &toggle_label)?;

    let list_container = ElementBuilder::new("div")?.class("posts-grid").build();

    append_child(&main, &hero)?;
    append_child(&main, &search_row)?;
    append_child(&main, &list_container)?;

    let ctx = ctx.clone();
    let search_control = search_field.control.clone();
    let toggle = FieldControl::from_element(toggle_input);

    spawn_local(async move {
        // Ошибка уже показана тостом внутри ApiClient, список остаётся пустым
        let posts = ctx.api.get_all_posts().await.unwrap_or_default();
        let posts = Rc::new(RefCell::new(posts));

        if let Err(err) = wire_list(&ctx, list_container, posts, search_control, toggle) {
            log::error!("Не удалось отрендерить список объявлений: {:?}", err);
        }
    });

    Ok(())
}

/// Построить замыкание перерисовки списка и подвесить его на поиск и toggle
fn wire_list(
    ctx: &Ctx,
    list_container: Element,
    posts: Rc<RefCell<Vec<Post>>>,
    search: FieldControl,
    toggle: FieldControl,
) -> Result<(), JsValue> {
    let render_list: Rc<RefCell<Box<dyn Fn()>>> = Rc::new(RefCell::new(Box::new(|| {})));

    {
        let ctx = ctx.clone();
        let render_list_handle = render_list.clone();
        let list_container = list_container.clone();
        let search = search.clone();
        let toggle = toggle.clone();
        *render_list.borrow_mut() = Box::new(move || {
            if let Err(err) = render_posts(
                &ctx,
                &list_container,
                &posts,
                &search,
                &toggle,
                &render_list_handle,
            ) {
                log::error!("Не удалось перерисовать список: {:?}", err);
            }
        });
    }

    {
        let render_list = render_list.clone();
        on_input(search.element(), move |_| {
            let f = render_list.borrow();
            f();
        })?;
    }
    {
        let render_list = render_list.clone();
        on_change(toggle.element(), move |_| {
            let f = render_list.borrow();
            f();
        })?;
    }

    let f = render_list.borrow();
    f();
    Ok(())
}

fn render_posts(
    ctx: &Ctx,
    list_container: &Element,
    posts: &Rc<RefCell<Vec<Post>>>,
    search: &FieldControl,
    toggle: &FieldControl,
    render_list: &Rc<RefCell<Box<dyn Fn()>>>,
) -> Result<(), JsValue> {
    set_inner_html(list_container, "");

    let query = search.value().trim().to_lowercase();
    let only_mine = toggle.is_checked();
    let current_user_id = ctx.session.user().user_id;

    let filtered: Vec<Post> = posts
        .borrow()
        .iter()
        .filter(|post| {
            if only_mine {
                match current_user_id {
                    Some(uid) if post.user_id == Some(uid) => {}
                    _ => return false,
                }
            }
            if query.is_empty() {
                return true;
            }
            let combined = format!("{} {}", post.title, post.content).to_lowercase();
            combined.contains(&query)
        })
        .cloned()
        .collect();

    if filtered.is_empty() {
        let empty = ElementBuilder::new("p")?
            .class("empty-state")
            .text("Пока нет объявлений по заданным условиям.")
            .build();
        append_child(list_container, &empty)?;
        return Ok(());
    }

    for post in filtered {
        let is_mine = current_user_id.is_some() && post.user_id == current_user_id;

        let on_open = {
            let post = post.clone();
            Box::new(move || {
                if let Err(err) = open_post_modal(&post) {
                    log::error!("Не удалось открыть объявление: {:?}", err);
                }
            }) as Box<dyn FnMut()>
        };

        let on_edit = {
            let router = ctx.router.clone();
            let id = post.id;
            Box::new(move || router.navigate(&format!("/edit/{}", id))) as Box<dyn FnMut()>
        };

        let on_delete = {
            let ctx = ctx.clone();
            let posts = posts.clone();
            let render_list = render_list.clone();
            let id = post.id;
            Box::new(move || {
                if !ctx.session.is_authenticated() {
                    ctx.shell.toast_error("Сначала войдите в аккаунт");
                    ctx.router.navigate("/login");
                    return;
                }
                let ctx = ctx.clone();
                let posts = posts.clone();
                let render_list = render_list.clone();
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
                                posts.borrow_mut().retain(|p| p.id != id);
                                let f = render_list.borrow();
                                f();
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
            is_mine,
            PostCardActions {
                on_open: Some(on_open),
                on_edit: Some(on_edit),
                on_delete: Some(on_delete),
            },
        )?;
        append_child(list_container, &card)?;
    }

    Ok(())
}

/// Модальное окно просмотра объявления (с галереей изображений)
fn open_post_modal(post: &Post) -> Result<(), JsValue> {
    let overlay = ElementBuilder::new("div")?.class("modal-overlay").build();
    let modal = ElementBuilder::new("div")?.class("modal").build();

    let title = ElementBuilder::new("h2")?
        .class("modal-title")
        .text(&post.title)
        .build();
    append_child(&modal, &title)?;

    if !post.images.is_empty() {
        let images_section = ElementBuilder::new("div")?.class("modal-images").build();
        for image_url in &post.images {
            let img = ElementBuilder::new("img")?
                .class("modal-image")
                .attr("src", image_url)?
                .attr("alt", "Фото объявления")?
                .build();
            append_child(&images_section, &img)?;
        }
        append_child(&modal, &images_section)?;
    }

    let content = ElementBuilder::new("p")?
        .class("modal-content-full")
        .text(&post.content)
        .build();
    let contact = ElementBuilder::new("div")?
        .class("modal-contact")
        .child(
            &ElementBuilder::new("span")?
                .class("modal-contact-label")
                .text("Контакты: ")
                .build(),
        )?
        .child(
            &ElementBuilder::new("span")?
                .class("modal-contact-value")
                .text(post.contact.as_deref().unwrap_or("не указаны"))
                .build(),
        )?
        .build();

    let close_btn = button("Закрыть", "secondary", "md")?;
    {
        let overlay = overlay.clone();
        on_click(&close_btn, move |_| overlay.remove())?;
    }

    append_child(&modal, &content)?;
    append_child(&modal, &contact)?;
    append_child(&modal, &close_btn)?;
    append_child(&overlay, &modal)?;

    {
        let overlay_el = overlay.clone();
        on_click(&overlay, move |event| {
            if let Some(target) = event.target() {
                if let Ok(el) = target.dyn_into::<Element>() {
                    if el == overlay_el {
                        overlay_el.remove();
                    }
                }
            }
        })?;
    }

    let body = document()
        .and_then(|doc| doc.body())
        .ok_or_else(|| JsValue::from_str("No document body"))?;
    body.append_child(&overlay).map(|_| ())
}
