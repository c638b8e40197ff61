// ============================================================================
// EVENT HANDLING - Подписка на события DOM
// ============================================================================
// Про утечки памяти:
// - Для слушателей на элементах страницы closure.forget() безопасен: когда
//   элемент уничтожается (например, через set_inner_html("")), браузер сам
//   снимает слушатели.
// - Глобальные слушатели (window) регистрируются строго один раз при старте
//   приложения (см. Router::init), иначе они накапливаются.
// ============================================================================

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, InputEvent, MouseEvent};

/// Повесить обработчик клика
pub fn on_click<F>(element: &Element, handler: F) -> Result<(), JsValue>
where
    F: FnMut(MouseEvent) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(MouseEvent)>);
    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    // closure.forget() обязателен, чтобы замыкание пережило текущий кадр
    closure.forget();
    Ok(())
}

/// Повесить обработчик ввода
pub fn on_input<F>(element: &Element, handler: F) -> Result<(), JsValue>
where
    F: FnMut(InputEvent) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(InputEvent)>);
    element.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Повесить обработчик change (чекбоксы, file input)
pub fn on_change<F>(element: &Element, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    element.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
