// ============================================================================
// APP - Сборка приложения и таблица маршрутов
// ============================================================================
// Ctx — единственный способ для вьюшек добраться до сессии, оболочки,
// API-клиента и роутера. Все поля дешёвые Rc-клоны.
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::router::{Guard, Route, RouteParams, Router, ViewFn};
use crate::services::{ApiClient, ErrorNotifier};
use crate::session::{LocalStorageBackend, SessionStore};
use crate::shell::Shell;
use crate::views;

#[derive(Clone)]
pub struct Ctx {
    pub session: SessionStore,
    pub shell: Shell,
    pub api: ApiClient,
    pub router: Router,
}

pub struct App;

impl App {
    /// Собрать все подсистемы и запустить первый dispatch
    pub fn start() -> Result<(), JsValue> {
        let session = SessionStore::new(Box::new(LocalStorageBackend));

        let shell = Shell::mount()?;
        let notifier: ErrorNotifier = {
            let shell = shell.clone();
            Rc::new(move |message: &str| shell.toast_error(message))
        };
        let api = ApiClient::new(session.clone(), notifier);
        let router = Router::new(routes());

        let ctx = Ctx {
            session,
            shell,
            api,
            router: router.clone(),
        };

        router.init(&ctx)?;
        log::info!("✅ Приложение запущено");
        Ok(())
    }
}

/// Таблица маршрутов. Порядок важен: при неоднозначном совпадении
/// побеждает последний зарегистрированный шаблон.
fn routes() -> Vec<Route> {
    fn view(f: fn(Ctx, RouteParams)) -> ViewFn {
        Rc::new(f)
    }

    vec![
        Route::new("/", Guard::Public, view(views::home::home_view)),
        Route::new("/home", Guard::Public, view(views::home::home_view)),
        Route::new("/login", Guard::Public, view(views::login::login_view)),
        Route::new("/register", Guard::Public, view(views::login::login_view)),
        Route::new("/contacts", Guard::Public, view(views::contacts::contacts_view)),
        Route::new("/dashboard", Guard::Authenticated, view(views::dashboard::dashboard_view)),
        Route::new("/add", Guard::Authenticated, view(views::post_form::post_form_view)),
        Route::new("/edit/:id", Guard::Authenticated, view(views::post_form::post_form_view)),
        Route::new("/moderator", Guard::Staff, view(views::moderator::moderator_view)),
        Route::new("/users", Guard::Staff, view(views::users::users_view)),
    ]
}
