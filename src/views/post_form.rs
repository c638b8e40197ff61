// ============================================================================
// POST FORM - Создание и редактирование объявления
// ============================================================================
// Одна форма на оба режима: /add и /edit/:id. Файлы читаются через
// FileReader только ради превью, на сервер уходят исходные File
// в multipart-запросе.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use gloo_file::callbacks::FileReader;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlInputElement};

use crate::app::Ctx;
use crate::components::{
    button, input_field, set_button_disabled, set_button_label, FieldControl, FieldOptions,
    InputField,
};
use crate::config::{MAX_IMAGE_SIZE_BYTES, MAX_POST_IMAGES};
use crate::dom::{append_child, on_change, on_click, set_inner_html, set_text_content, ElementBuilder};
use crate::models::{Post, PostDraft};
use crate::router::RouteParams;
use crate::utils::validate::validate_draft;
use crate::views;

/// Выбранные файлы вместе с незавершёнными чтениями превью.
/// Инвариант: очищаются строго вместе — Drop читателя прерывает чтение,
/// поэтому опоздавшее превью не переживает сброс выбора.
struct PendingSelection<F, R> {
    files: Vec<F>,
    readers: Vec<R>,
}

impl<F, R> PendingSelection<F, R> {
    fn new() -> Self {
        Self {
            files: Vec::new(),
            readers: Vec::new(),
        }
    }

    fn clear(&mut self) {
        self.files.clear();
        self.readers.clear();
    }
}

struct FormFields {
    title: FieldControl,
    content: FieldControl,
    contact: FieldControl,
    city: FieldControl,
    street: FieldControl,
    price: FieldControl,
}

impl FormFields {
    fn draft(&self) -> PostDraft {
        PostDraft {
            title: self.title.value().trim().to_string(),
            content: self.content.value().trim().to_string(),
            contact: self.contact.value().trim().to_string(),
            city: optional(self.city.value()),
            street: optional(self.street.value()),
            price: optional(self.price.value()),
        }
    }

    fn fill(&self, post: &Post) {
        self.title.set_value(&post.title);
        self.content.set_value(&post.content);
        self.contact.set_value(post.contact.as_deref().unwrap_or(""));
        self.city.set_value(post.city.as_deref().unwrap_or(""));
        self.street.set_value(post.street.as_deref().unwrap_or(""));
        self.price.set_value(post.price.as_deref().unwrap_or(""));
    }
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

pub fn post_form_view(ctx: Ctx, params: RouteParams) {
    let edit_id = match params.get("id") {
        Some(raw) => match raw.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                ctx.shell.toast_error("Некорректный идентификатор объявления");
                ctx.router.navigate("/dashboard");
                return;
            }
        },
        None => None,
    };

    if let Err(err) = render(&ctx, edit_id) {
        log::error!("Не удалось отрендерить форму объявления: {:?}", err);
    }
}

fn render(ctx: &Ctx, edit_id: Option<i64>) -> Result<(), JsValue> {
    let page_title = if edit_id.is_some() {
        "Редактирование объявления"
    } else {
        "Новое объявление"
    };
    let main = views::begin_page(ctx, Some(page_title));

    let panel = ElementBuilder::new("section")?.class("panel form-panel").build();
    let title = ElementBuilder::new("h1")?
        .class("panel-title")
        .text(page_title)
        .build();
    append_child(&panel, &title)?;

    let title_field = field(&panel, "Заголовок", "title", "Например: Продам учебники", false)?;
    let content_field = field(&panel, "Описание", "content", "Подробности, состояние, условия", true)?;
    let contact_field = field(&panel, "Контакты", "contact", "@telegram или телефон", false)?;
    let city_field = field(&panel, "Город (необязательно)", "city", "Москва", false)?;
    let street_field = field(&panel, "Улица (необязательно)", "street", "Ленинский проспект", false)?;
    let price_field = field(&panel, "Цена (необязательно)", "price", "1500 ₽ или «договорная»", false)?;

    let fields = Rc::new(FormFields {
        title: title_field.control,
        content: content_field.control,
        contact: contact_field.control,
        city: city_field.control,
        street: street_field.control,
        price: price_field.control,
    });

    // ---------- Изображения ----------

    let files_block = ElementBuilder::new("div")?.class("form-field").build();
    let files_label = ElementBuilder::new("label")?
        .text(&format!("Фотографии (до {}, каждая до 5 МБ)", MAX_POST_IMAGES))
        .build();
    let file_input = ElementBuilder::new("input")?
        .class("file-input")
        .attr("type", "file")?
        .attr("accept", "image/*")?
        .attr("multiple", "")?
        .build();
    let previews = ElementBuilder::new("div")?.class("image-previews").build();
    let existing_note = ElementBuilder::new("p")?.class("form-hint").build();

    append_child(&files_block, &files_label)?;
    append_child(&files_block, &file_input)?;
    append_child(&files_block, &existing_note)?;
    append_child(&files_block, &previews)?;
    append_child(&panel, &files_block)?;

    let pending: Rc<RefCell<PendingSelection<web_sys::File, FileReader>>> =
        Rc::new(RefCell::new(PendingSelection::new()));
    let existing_count = Rc::new(RefCell::new(0usize));

    let replace_control = if edit_id.is_some() {
        let replace_label = ElementBuilder::new("label")?.class("toggle").build();
        let replace_input = ElementBuilder::new("input")?
            .attr("type", "checkbox")?
            .build();
        let replace_text = ElementBuilder::new("span")?
            .class("toggle-label")
            .text("Заменить существующие фотографии новыми")
            .build();
        append_child(&replace_label, &replace_input)?;
        append_child(&replace_label, &replace_text)?;
        append_child(&panel, &replace_label)?;
        Some(FieldControl::from_element(replace_input))
    } else {
        None
    };

    {
        let ctx = ctx.clone();
        let pending = pending.clone();
        let previews = previews.clone();
        let existing_count = existing_count.clone();
        let input_el = file_input.clone();
        on_change(&file_input, move |_| {
            let Some(input) = input_el.dyn_ref::<HtmlInputElement>() else {
                return;
            };
            let Some(list) = input.files() else {
                return;
            };

            for i in 0..list.length() {
                let Some(file) = list.get(i) else { continue };

                let total = pending.borrow().files.len() + *existing_count.borrow();
                if total >= MAX_POST_IMAGES {
                    ctx.shell.toast_error(&format!(
                        "Не больше {} фотографий в объявлении",
                        MAX_POST_IMAGES
                    ));
                    break;
                }
                if file.size() > MAX_IMAGE_SIZE_BYTES {
                    ctx.shell
                        .toast_error(&format!("Файл «{}» больше 5 МБ", file.name()));
                    continue;
                }

                pending.borrow_mut().files.push(file.clone());
                queue_preview(&file, &previews, &pending);
            }
            // Сбрасываем value, чтобы повторный выбор того же файла снова
            // вызывал change
            input.set_value("");
        })?;
    }

    {
        let pending = pending.clone();
        let previews = previews.clone();
        let clear_btn = button("Убрать выбранные фото", "ghost", "sm")?;
        on_click(&clear_btn, move |_| {
            // Drop незавершённых читателей отменяет чтение: опоздавшее
            // превью не появится после сброса выбора
            pending.borrow_mut().clear();
            set_inner_html(&previews, "");
        })?;
        append_child(&panel, &clear_btn)?;
    }

    // ---------- Кнопки ----------

    let actions = ElementBuilder::new("div")?.class("form-actions").build();
    let submit_label = if edit_id.is_some() {
        "Сохранить изменения"
    } else {
        "Опубликовать"
    };
    let submit = button(submit_label, "primary", "md")?;
    let cancel = button("Отмена", "secondary", "md")?;
    append_child(&actions, &submit)?;
    append_child(&actions, &cancel)?;
    append_child(&panel, &actions)?;
    append_child(&main, &panel)?;

    {
        let router = ctx.router.clone();
        on_click(&cancel, move |_| {
            if router.can_go_back() {
                router.go_back();
            } else {
                router.navigate("/dashboard");
            }
        })?;
    }

    {
        let ctx = ctx.clone();
        let fields = fields.clone();
        let pending = pending.clone();
        let submit_el = submit.clone();
        let submit_label = submit_label.to_string();
        on_click(&submit, move |_| {
            let draft = fields.draft();
            if let Err(message) = validate_draft(&draft) {
                ctx.shell.toast_error(&message);
                return;
            }

            set_button_disabled(&submit_el, true);
            set_button_label(&submit_el, "Отправляем...");

            let ctx = ctx.clone();
            let files = pending.borrow().files.clone();
            let replace = replace_control
                .as_ref()
                .map(|c| c.is_checked())
                .unwrap_or(false);
            let submit_el = submit_el.clone();
            let submit_label = submit_label.clone();
            spawn_local(async move {
                let result = match edit_id {
                    Some(id) => ctx.api.update_post(id, &draft, &files, replace).await,
                    None => ctx.api.create_post(&draft, &files).await,
                };
                match result {
                    Ok(_) => {
                        ctx.shell
                            .toast_success("Объявление отправлено на модерацию");
                        ctx.router.navigate("/dashboard");
                    }
                    Err(err) => {
                        log::warn!("Сохранение объявления не удалось: {}", err);
                        set_button_disabled(&submit_el, false);
                        set_button_label(&submit_el, &submit_label);
                    }
                }
            });
        })?;
    }

    // В режиме редактирования подтягиваем текущие данные
    if let Some(id) = edit_id {
        let ctx = ctx.clone();
        spawn_local(async move {
            match ctx.api.get_post(id).await {
                Ok(Some(post)) => {
                    fields.fill(&post);
                    *existing_count.borrow_mut() = post.images.len();
                    if !post.images.is_empty() {
                        set_text_content(
                            &existing_note,
                            &format!("У объявления уже есть фотографий: {}", post.images.len()),
                        );
                    }
                }
                Ok(None) => {
                    ctx.shell.toast_error("Объявление не найдено");
                    ctx.router.navigate("/dashboard");
                }
                Err(err) => log::warn!("Не удалось загрузить объявление: {}", err),
            }
        });
    }

    Ok(())
}

fn field(
    panel: &Element,
    label: &str,
    name: &str,
    placeholder: &str,
    multiline: bool,
) -> Result<InputField, JsValue> {
    let field = input_field(&FieldOptions {
        label,
        name,
        placeholder,
        field_type: None,
        multiline,
    })?;
    append_child(panel, &field.wrapper)?;
    Ok(field)
}

/// Прочитать файл как data-URL и добавить превью в контейнер
fn queue_preview(
    file: &web_sys::File,
    previews: &Element,
    pending: &Rc<RefCell<PendingSelection<web_sys::File, FileReader>>>,
) {
    let gloo_file = gloo_file::File::from(file.clone());
    let previews = previews.clone();
    let reader = gloo_file::callbacks::read_as_data_url(&gloo_file, move |result| match result {
        Ok(data_url) => {
            let render = || -> Result<(), JsValue> {
                let img = ElementBuilder::new("img")?
                    .class("image-preview")
                    .attr("src", &data_url)?
                    .attr("alt", "Превью фотографии")?
                    .build();
                append_child(&previews, &img)
            };
            if let Err(err) = render() {
                log::error!("Не удалось добавить превью: {:?}", err);
            }
        }
        Err(err) => log::warn!("Не удалось прочитать файл для превью: {}", err),
    });
    pending.borrow_mut().readers.push(reader);
}

#[cfg(test)]
mod tests {
    use super::PendingSelection;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CancelOnDrop(Rc<Cell<u32>>);

    impl Drop for CancelOnDrop {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn clearing_selection_drops_pending_readers() {
        let cancelled = Rc::new(Cell::new(0));
        let mut pending: PendingSelection<&str, CancelOnDrop> = PendingSelection::new();
        pending.files.push("one.jpg");
        pending.readers.push(CancelOnDrop(cancelled.clone()));
        pending.readers.push(CancelOnDrop(cancelled.clone()));

        pending.clear();

        assert!(pending.files.is_empty());
        assert!(pending.readers.is_empty());
        assert_eq!(cancelled.get(), 2);
    }
}
