// ============================================================================
// COMPONENTS - Переиспользуемые элементы интерфейса
// ============================================================================
// Кнопки, поля, карточки объявлений, модальные окна. Компоненты stateless:
// строят DOM-фрагмент и отдают его вызывающей вьюшке.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlButtonElement, HtmlInputElement, HtmlTextAreaElement};

use crate::dom::{append_child, document, on_click, set_text_content, ElementBuilder};
use crate::models::Post;

// ---------- Кнопка ----------

pub fn button(label: &str, variant: &str, size: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("button")?
        .class(&format!("btn btn-{} btn-{}", variant, size))
        .attr("type", "button")?
        .text(label)
        .build())
}

pub fn set_button_disabled(button: &Element, disabled: bool) {
    if let Some(btn) = button.dyn_ref::<HtmlButtonElement>() {
        btn.set_disabled(disabled);
    }
}

pub fn set_button_label(button: &Element, label: &str) {
    set_text_content(button, label);
}

// ---------- Поле ввода ----------

/// Обёртка над input/textarea с единым доступом к значению
#[derive(Clone)]
pub struct FieldControl {
    element: Element,
}

impl FieldControl {
    pub fn from_element(element: Element) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn value(&self) -> String {
        if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = self.element.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else {
            String::new()
        }
    }

    pub fn set_value(&self, value: &str) {
        if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = self.element.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        }
    }

    pub fn set_disabled(&self, disabled: bool) {
        if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
            input.set_disabled(disabled);
        } else if let Some(area) = self.element.dyn_ref::<HtmlTextAreaElement>() {
            area.set_disabled(disabled);
        }
    }

    pub fn is_checked(&self) -> bool {
        self.element
            .dyn_ref::<HtmlInputElement>()
            .map(|input| input.checked())
            .unwrap_or(false)
    }
}

pub struct InputField {
    pub wrapper: Element,
    pub control: FieldControl,
}

#[derive(Default)]
pub struct FieldOptions<'a> {
    pub label: &'a str,
    pub name: &'a str,
    pub placeholder: &'a str,
    pub field_type: Option<&'a str>,
    pub multiline: bool,
}

/// Поле ввода (input/textarea) с лейблом
pub fn input_field(opts: &FieldOptions) -> Result<InputField, JsValue> {
    let id = format!(
        "fld-{}-{}",
        opts.name,
        (js_sys::Math::random() * 100_000.0) as u32
    );

    let wrapper = ElementBuilder::new("div")?.class("form-field").build();
    let label = ElementBuilder::new("label")?
        .attr("for", &id)?
        .text(opts.label)
        .build();

    let control = if opts.multiline {
        ElementBuilder::new("textarea")?
            .class("input")
            .id(&id)?
            .attr("name", opts.name)?
            .attr("placeholder", opts.placeholder)?
            .build()
    } else {
        ElementBuilder::new("input")?
            .class("input")
            .id(&id)?
            .attr("name", opts.name)?
            .attr("type", opts.field_type.unwrap_or("text"))?
            .attr("placeholder", opts.placeholder)?
            .build()
    };

    append_child(&wrapper, &label)?;
    append_child(&wrapper, &control)?;

    Ok(InputField {
        wrapper,
        control: FieldControl { element: control },
    })
}

// ---------- Карточка объявления ----------

pub struct PostCardActions {
    pub on_open: Option<Box<dyn FnMut()>>,
    pub on_edit: Option<Box<dyn FnMut()>>,
    pub on_delete: Option<Box<dyn FnMut()>>,
}

pub fn post_card(post: &Post, is_mine: bool, actions: PostCardActions) -> Result<Element, JsValue> {
    let card = ElementBuilder::new("article")?.class("post-card").build();

    let title = ElementBuilder::new("h3")?
        .class("post-title")
        .text(&post.title)
        .build();
    let content = ElementBuilder::new("p")?
        .class("post-content")
        .text(&post.preview_text())
        .build();

    let badge_text = if is_mine { "Моё объявление" } else { "Студент" };
    let meta_left = ElementBuilder::new("div")?
        .class("post-meta-left")
        .child(&ElementBuilder::new("span")?.class("badge").text(badge_text).build())?
        .child(
            &ElementBuilder::new("span")?
                .class("post-email")
                .text(post.user_email.as_deref().unwrap_or("unknown@example.com"))
                .build(),
        )?
        .build();

    let meta_right = ElementBuilder::new("div")?
        .class("post-meta-right")
        .child(
            &ElementBuilder::new("span")?
                .class("post-date")
                .text(&format_date(post.created_at.as_deref()))
                .build(),
        )?
        .build();

    let meta = ElementBuilder::new("div")?
        .class("post-meta")
        .child(&meta_left)?
        .child(&meta_right)?
        .build();

    let actions_row = ElementBuilder::new("div")?.class("post-actions").build();

    if let Some(mut on_open) = actions.on_open {
        let open_btn = button("Открыть", "ghost", "sm")?;
        on_click(&open_btn, move |_| on_open())?;
        append_child(&actions_row, &open_btn)?;
    }

    if is_mine {
        if let Some(mut on_edit) = actions.on_edit {
            let edit_btn = button("Редактировать", "secondary", "sm")?;
            on_click(&edit_btn, move |_| on_edit())?;
            append_child(&actions_row, &edit_btn)?;
        }
        if let Some(mut on_delete) = actions.on_delete {
            let del_btn = button("Удалить", "danger", "sm")?;
            on_click(&del_btn, move |_| on_delete())?;
            append_child(&actions_row, &del_btn)?;
        }
    }

    append_child(&card, &title)?;
    append_child(&card, &content)?;
    append_child(&card, &meta)?;
    append_child(&card, &actions_row)?;

    Ok(card)
}

/// Дата в локали ru-RU; сырое значение показываем как есть, если Date
/// его не разобрал
pub fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let date = js_sys::Date::new(&JsValue::from_str(raw));
    if date.get_time().is_nan() {
        return raw.to_string();
    }
    date.to_locale_string("ru-RU", &JsValue::UNDEFINED)
        .as_string()
        .unwrap_or_else(|| raw.to_string())
}

// ---------- Модальные окна ----------

pub struct ConfirmOptions<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub confirm_text: &'a str,
    pub confirm_variant: &'a str,
}

/// Окно подтверждения; результат приходит в колбэк (true — подтвердили)
pub fn confirm_modal<F>(opts: &ConfirmOptions, on_result: F) -> Result<(), JsValue>
where
    F: FnOnce(bool) + 'static,
{
    let overlay = ElementBuilder::new("div")?.class("modal-overlay").build();
    let modal = ElementBuilder::new("div")?.class("modal").build();

    let title = ElementBuilder::new("h2")?
        .class("modal-title")
        .text(opts.title)
        .build();
    let message = ElementBuilder::new("p")?
        .class("modal-content")
        .text(opts.message)
        .build();

    let actions = ElementBuilder::new("div")?.class("modal-actions").build();
    let cancel_btn = button("Отмена", "secondary", "md")?;
    let confirm_btn = button(opts.confirm_text, opts.confirm_variant, "md")?;
    append_child(&actions, &cancel_btn)?;
    append_child(&actions, &confirm_btn)?;

    append_child(&modal, &title)?;
    append_child(&modal, &message)?;
    append_child(&modal, &actions)?;
    append_child(&overlay, &modal)?;

    let callback = Rc::new(RefCell::new(Some(Box::new(on_result) as Box<dyn FnOnce(bool)>)));
    let finish = {
        let overlay = overlay.clone();
        move |result: bool| {
            overlay.remove();
            if let Some(cb) = callback.borrow_mut().take() {
                cb(result);
            }
        }
    };

    {
        let finish = finish.clone();
        on_click(&cancel_btn, move |_| finish(false))?;
    }
    {
        let finish = finish.clone();
        on_click(&confirm_btn, move |_| finish(true))?;
    }
    {
        let finish = finish.clone();
        let overlay_el = overlay.clone();
        on_click(&overlay, move |event| {
            // Закрываем только по клику в подложку, не по содержимому
            if let Some(target) = event.target() {
                if let Ok(el) = target.dyn_into::<Element>() {
                    if el == overlay_el {
                        finish(false);
                    }
                }
            }
        })?;
    }

    attach_to_body(&overlay)
}

pub struct PromptOptions<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub placeholder: &'a str,
    pub confirm_text: &'a str,
    pub confirm_variant: &'a str,
    pub multiline: bool,
}

/// Окно с текстовым вводом; None в колбэке — отмена или пустой ввод
pub fn prompt_modal<F>(opts: &PromptOptions, on_result: F) -> Result<(), JsValue>
where
    F: FnOnce(Option<String>) + 'static,
{
    let overlay = ElementBuilder::new("div")?.class("modal-overlay").build();
    let modal = ElementBuilder::new("div")?.class("modal").build();

    let title = ElementBuilder::new("h2")?
        .class("modal-title")
        .text(opts.title)
        .build();
    let message = ElementBuilder::new("p")?
        .class("modal-content")
        .text(opts.message)
        .build();

    let field = input_field(&FieldOptions {
        label: "",
        name: "prompt",
        placeholder: opts.placeholder,
        field_type: None,
        multiline: opts.multiline,
    })?;

    let actions = ElementBuilder::new("div")?.class("modal-actions").build();
    let cancel_btn = button("Отмена", "secondary", "md")?;
    let confirm_btn = button(opts.confirm_text, opts.confirm_variant, "md")?;
    append_child(&actions, &cancel_btn)?;
    append_child(&actions, &confirm_btn)?;

    append_child(&modal, &title)?;
    append_child(&modal, &message)?;
    append_child(&modal, &field.wrapper)?;
    append_child(&modal, &actions)?;
    append_child(&overlay, &modal)?;

    let callback = Rc::new(RefCell::new(Some(
        Box::new(on_result) as Box<dyn FnOnce(Option<String>)>
    )));
    let finish = {
        let overlay = overlay.clone();
        move |result: Option<String>| {
            overlay.remove();
            if let Some(cb) = callback.borrow_mut().take() {
                cb(result);
            }
        }
    };

    {
        let finish = finish.clone();
        on_click(&cancel_btn, move |_| finish(None))?;
    }
    {
        let finish = finish.clone();
        let control = field.control.clone();
        on_click(&confirm_btn, move |_| {
            let value = control.value().trim().to_string();
            finish(if value.is_empty() { None } else { Some(value) });
        })?;
    }

    attach_to_body(&overlay)
}

fn attach_to_body(overlay: &Element) -> Result<(), JsValue> {
    let body = document()
        .and_then(|doc| doc.body())
        .ok_or_else(|| JsValue::from_str("No document body"))?;
    body.append_child(overlay).map(|_| ())
}
