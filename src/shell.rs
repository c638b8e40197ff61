// ============================================================================
// SHELL - Постоянная оболочка страницы
// ============================================================================
// Владеет слотом хедера, слотом контента и слоем тостов. Вьюшки рендерятся
// внутрь оболочки, сама она не пересоздаётся. Здесь же живут lease-объекты
// повторяющихся таймеров: оболочка гасит их при каждой смене контента,
// чтобы интервалы не накапливались между навигациями.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::dom::{
    add_class, append_child, create_element, force_reflow, get_element_by_id, remove_class,
    set_class_name, set_document_title, set_inner_html, set_text_content,
};

/// Lease на повторяющийся таймер: отмена — это Drop
pub struct Lease {
    _interval: Interval,
}

impl Lease {
    pub fn interval<F>(millis: u32, callback: F) -> Self
    where
        F: FnMut() + 'static,
    {
        Self {
            _interval: Interval::new(millis, callback),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    fn class_suffix(self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }
}

struct Inner {
    header_slot: web_sys::Element,
    main_slot: web_sys::Element,
    toast_layer: web_sys::Element,
    /// Таймеры текущей вьюшки; сбрасываются при каждой смене контента
    view_leases: RefCell<Vec<Lease>>,
    /// Единственный таймер опроса в хедере; заменяется при каждом
    /// перерендере хедера
    header_lease: RefCell<Option<Lease>>,
}

#[derive(Clone)]
pub struct Shell {
    inner: Rc<Inner>,
}

impl Shell {
    /// Собрать базовую разметку внутри #app
    pub fn mount() -> Result<Self, JsValue> {
        let root = get_element_by_id("app")
            .ok_or_else(|| JsValue::from_str("Не найден элемент #app"))?;
        set_inner_html(&root, "");

        let toast_layer = create_element("div")?;
        set_class_name(&toast_layer, "toast-container");

        let header_slot = create_element("div")?;
        set_class_name(&header_slot, "shell-header");

        let main_slot = create_element("main")?;
        set_class_name(&main_slot, "shell-main");

        append_child(&root, &toast_layer)?;
        append_child(&root, &header_slot)?;
        append_child(&root, &main_slot)?;

        Ok(Self {
            inner: Rc::new(Inner {
                header_slot,
                main_slot,
                toast_layer,
                view_leases: RefCell::new(Vec::new()),
                header_lease: RefCell::new(None),
            }),
        })
    }

    pub fn header_slot(&self) -> web_sys::Element {
        self.inner.header_slot.clone()
    }

    pub fn main_slot(&self) -> web_sys::Element {
        self.inner.main_slot.clone()
    }

    /// Очистить контентную область. Вместе с DOM гасим все таймеры вьюшки.
    pub fn clear_main(&self) {
        self.inner.view_leases.borrow_mut().clear();
        set_inner_html(&self.inner.main_slot, "");
    }

    /// Передать оболочке владение таймером текущей вьюшки
    pub fn adopt_lease(&self, lease: Lease) {
        self.inner.view_leases.borrow_mut().push(lease);
    }

    /// Заменить таймер опроса хедера (старый гаснет при замене)
    pub fn set_header_lease(&self, lease: Option<Lease>) {
        *self.inner.header_lease.borrow_mut() = lease;
    }

    /// Плавное появление контента страницы
    pub fn animate_page_in(&self) {
        let main = &self.inner.main_slot;
        let _ = remove_class(main, "page-enter");
        let _ = remove_class(main, "page-enter-active");

        // Форсируем reflow, чтобы анимация запускалась при каждом переходе
        force_reflow(main);
        let _ = add_class(main, "page-enter");

        if let Some(win) = web_sys::window() {
            let main = main.clone();
            let cb = Closure::once_into_js(move || {
                let _ = add_class(&main, "page-enter-active");
            });
            let _ = win.request_animation_frame(cb.unchecked_ref());
        }
    }

    /// Заголовок вкладки
    pub fn set_page_title(&self, title: Option<&str>) {
        match title {
            Some(title) => set_document_title(&format!("{} — LightNet", title)),
            None => set_document_title("LightNet — сервис объявлений"),
        }
    }

    /// Показать toast-уведомление с автоскрытием
    pub fn toast(&self, message: &str, kind: ToastKind) {
        let toast = match create_element("div") {
            Ok(el) => el,
            Err(_) => return,
        };
        set_class_name(&toast, &format!("toast toast-{}", kind.class_suffix()));
        set_text_content(&toast, message);
        if append_child(&self.inner.toast_layer, &toast).is_err() {
            return;
        }

        // Через 2 секунды запускаем анимацию скрытия, ещё через 300 мс
        // убираем элемент (страховка на случай пропавшего transitionend)
        Timeout::new(2_000, move || {
            let _ = add_class(&toast, "toast-hide");
            Timeout::new(300, move || {
                toast.remove();
            })
            .forget();
        })
        .forget();
    }

    pub fn toast_success(&self, message: &str) {
        self.toast(message, ToastKind::Success);
    }

    pub fn toast_error(&self, message: &str) {
        self.toast(message, ToastKind::Error);
    }
}
