// ============================================================================
// ROUTER - Hash-роутинг SPA
// ============================================================================
// Явный объект-роутер: таблица маршрутов и стек истории живут в инстансе,
// а не в глобалах модуля. navigate() только меняет fragment — сам вызов
// вьюшки происходит асинхронно через событие hashchange.
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::app::Ctx;
use crate::views;

pub type RouteParams = HashMap<String, String>;
pub type ViewFn = Rc<dyn Fn(Ctx, RouteParams)>;

/// Декларативный guard маршрута, проверяется диспетчером до вызова вьюшки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Доступно всем
    Public,
    /// Требуется токен; иначе тост и редирект на /login
    Authenticated,
    /// Требуется роль модератора или админа; иначе экран "доступ запрещён"
    Staff,
}

pub struct Route {
    pub pattern: String,
    pub guard: Guard,
    pub view: ViewFn,
}

impl Route {
    pub fn new(pattern: &str, guard: Guard, view: ViewFn) -> Self {
        Self {
            pattern: pattern.to_string(),
            guard,
            view,
        }
    }
}

/// Стек навигации: растёт при переходах вперёд, при переходе из середины
/// обрезает "хвост"; возврат назад только сдвигает указатель
#[derive(Debug, Default)]
pub struct HistoryStack {
    entries: Vec<String>,
    index: usize,
}

impl HistoryStack {
    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.index).map(String::as_str)
    }

    /// Записать переход. Повторный переход на текущий путь не растит стек.
    pub fn record(&mut self, path: &str) {
        if self.current() == Some(path) {
            return;
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(path.to_string());
        self.index = self.entries.len() - 1;
    }

    /// Сдвинуть указатель назад и вернуть путь (стек не уменьшается)
    pub fn go_back(&mut self) -> Option<&str> {
        if !self.can_go_back() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index).map(String::as_str)
    }

    pub fn can_go_back(&self) -> bool {
        !self.entries.is_empty() && self.index > 0
    }
}

struct RouterInner {
    routes: Vec<Route>,
    history: RefCell<HistoryStack>,
}

#[derive(Clone)]
pub struct Router {
    inner: Rc<RouterInner>,
}

impl Router {
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            inner: Rc::new(RouterInner {
                routes,
                history: RefCell::new(HistoryStack::default()),
            }),
        }
    }

    /// Подписаться на hashchange и выполнить первый dispatch.
    /// Глобальный слушатель регистрируется ровно один раз за жизнь приложения.
    pub fn init(&self, ctx: &Ctx) -> Result<(), JsValue> {
        let win = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;

        let ctx_for_listener = ctx.clone();
        let closure = Closure::wrap(Box::new(move |_e: web_sys::Event| {
            ctx_for_listener.router.dispatch(&ctx_for_listener);
        }) as Box<dyn FnMut(web_sys::Event)>);
        win.add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref())?;
        // Слушатель живёт до конца работы приложения
        closure.forget();

        self.dispatch(ctx);
        Ok(())
    }

    /// Программная навигация с записью в историю
    pub fn navigate(&self, path: &str) {
        self.navigate_with_history(path, true);
    }

    /// Навигация с явным контролем истории (addToHistory=false — замена
    /// fragment без записи)
    pub fn navigate_with_history(&self, path: &str, add_to_history: bool) {
        let normalized =
            plan_navigation(&mut self.inner.history.borrow_mut(), path, add_to_history);
        set_fragment(&normalized);
    }

    /// Вернуться на предыдущий путь из стека (ничего не добавляет в историю)
    pub fn go_back(&self) {
        let previous = self
            .inner
            .history
            .borrow_mut()
            .go_back()
            .map(str::to_string);
        if let Some(path) = previous {
            set_fragment(&path);
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.inner.history.borrow().can_go_back()
    }

    /// Текущий нормализованный путь из fragment
    pub fn current_path(&self) -> String {
        let raw = web_sys::window()
            .map(|w| w.location())
            .and_then(|loc| loc.hash().ok())
            .unwrap_or_default();
        let stripped = raw.trim_start_matches('#');
        if stripped.is_empty() {
            "/".to_string()
        } else {
            normalize(stripped)
        }
    }

    /// Повторно обработать текущий маршрут (после мутаций, меняющих вид)
    pub fn refresh(&self, ctx: &Ctx) {
        self.dispatch(ctx);
    }

    /// Разбор fragment → подбор маршрута → guard → вызов вьюшки
    pub fn dispatch(&self, ctx: &Ctx) {
        let path = self.current_path();
        log::debug!("🧭 dispatch: {}", path);

        let patterns: Vec<&str> = self
            .inner
            .routes
            .iter()
            .map(|r| r.pattern.as_str())
            .collect();

        let (route, params) = match resolve(&patterns, &path) {
            Some((index, params)) => (&self.inner.routes[index], params),
            None => {
                // Нет совпадения и нет корневого шаблона — явный экран 404
                log::warn!("Маршрут не найден: {}", path);
                views::render_not_found(ctx, &path);
                return;
            }
        };

        match route.guard {
            Guard::Public => {}
            Guard::Authenticated => {
                if !ctx.session.is_authenticated() {
                    ctx.shell.toast_error("Сначала войдите в аккаунт");
                    self.navigate("/login");
                    return;
                }
            }
            Guard::Staff => {
                if !ctx.session.is_moderator() && !ctx.session.is_admin() {
                    views::render_access_denied(ctx);
                    return;
                }
            }
        }

        (route.view)(ctx.clone(), params);
    }
}

fn set_fragment(path: &str) {
    if let Some(win) = web_sys::window() {
        let _ = win.location().set_hash(&format!("#{}", path));
    }
}

/// DOM-независимая часть навигации: нормализация пути и условная
/// запись в историю
fn plan_navigation(history: &mut HistoryStack, path: &str, add_to_history: bool) -> String {
    let normalized = normalize(path);
    if add_to_history {
        history.record(&normalized);
    }
    normalized
}

fn normalize(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Сопоставление пути с шаблоном: число сегментов должно совпадать,
/// литеральные сегменты сравниваются точно, ":name" захватывает значение
fn match_pattern(pattern: &str, path: &str) -> Option<RouteParams> {
    let pattern_segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = RouteParams::new();
    for (seg, value) in pattern_segments.iter().zip(path_segments.iter()) {
        if let Some(name) = seg.strip_prefix(':') {
            params.insert(name.to_string(), (*value).to_string());
        } else if seg != value {
            return None;
        }
    }
    Some(params)
}

/// Подбор маршрута. При нескольких совпадениях побеждает ПОСЛЕДНИЙ
/// зарегистрированный (контракт поведения, сохранён намеренно).
/// Без совпадений — откат на шаблон "/".
fn resolve(patterns: &[&str], path: &str) -> Option<(usize, RouteParams)> {
    let mut best = None;
    for (index, pattern) in patterns.iter().enumerate() {
        if let Some(params) = match_pattern(pattern, path) {
            best = Some((index, params));
        }
    }
    if best.is_none() {
        if let Some(root) = patterns.iter().position(|p| *p == "/") {
            return Some((root, RouteParams::new()));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_is_segment_count_exact() {
        assert!(match_pattern("/edit/:id", "/edit/1").is_some());
        assert!(match_pattern("/edit/:id", "/edit").is_none());
        assert!(match_pattern("/edit/:id", "/edit/1/2").is_none());
    }

    #[test]
    fn params_are_captured_without_validation() {
        let params = match_pattern("/edit/:id", "/edit/abc-42").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("abc-42"));
    }

    #[test]
    fn literal_segments_must_match_exactly() {
        assert!(match_pattern("/posts/:id", "/users/1").is_none());
        assert!(match_pattern("/contacts", "/contacts").is_some());
    }

    #[test]
    fn last_registered_pattern_wins() {
        let patterns = vec!["/edit/:id", "/edit/:post_id"];
        let (index, params) = resolve(&patterns, "/edit/5").unwrap();
        assert_eq!(index, 1);
        assert_eq!(params.get("post_id").map(String::as_str), Some("5"));
    }

    #[test]
    fn unmatched_path_falls_back_to_root() {
        let patterns = vec!["/", "/contacts"];
        let (index, params) = resolve(&patterns, "/nope/nope").unwrap();
        assert_eq!(index, 0);
        assert!(params.is_empty());
    }

    #[test]
    fn unmatched_path_without_root_is_none() {
        let patterns = vec!["/contacts"];
        assert!(resolve(&patterns, "/nope").is_none());
    }

    #[test]
    fn back_restores_previous_entry_and_keeps_stack() {
        let mut history = HistoryStack::default();
        history.record("/a");
        history.record("/b");

        assert_eq!(history.go_back(), Some("/a"));
        assert!(!history.can_go_back());
        // Стек не уменьшился, только указатель
        assert_eq!(history.entries.len(), 2);
    }

    #[test]
    fn back_on_empty_history_is_noop() {
        let mut history = HistoryStack::default();
        assert!(!history.can_go_back());
        assert_eq!(history.go_back(), None);
    }

    #[test]
    fn forward_entries_are_truncated_on_branching() {
        let mut history = HistoryStack::default();
        history.record("/a");
        history.record("/b");
        history.record("/c");
        history.go_back();
        history.go_back();
        assert_eq!(history.current(), Some("/a"));

        history.record("/d");
        assert_eq!(history.entries, vec!["/a", "/d"]);
        assert_eq!(history.current(), Some("/d"));
    }

    #[test]
    fn repeated_navigation_to_same_path_does_not_grow_history() {
        let mut history = HistoryStack::default();
        history.record("/a");
        history.record("/a");
        assert_eq!(history.entries.len(), 1);
    }

    #[test]
    fn navigation_without_history_flag_leaves_stack_untouched() {
        let mut history = HistoryStack::default();

        let normalized = plan_navigation(&mut history, "a", false);
        assert_eq!(normalized, "/a");
        assert!(history.entries.is_empty());
        assert!(!history.can_go_back());
        assert_eq!(history.go_back(), None);

        // С флагом тот же переход записывается
        plan_navigation(&mut history, "/a", true);
        assert_eq!(history.current(), Some("/a"));
    }

    #[test]
    fn normalize_adds_leading_slash() {
        assert_eq!(normalize("dashboard"), "/dashboard");
        assert_eq!(normalize("/dashboard"), "/dashboard");
    }
}
