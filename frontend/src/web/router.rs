//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 每次导航（包括首次加载和浏览器前进/后退）都先经过 [`NavigationGuard`]。
//!
//! 会话在页面停留期间失效不会触发跳转，下一次导航时由守卫重定向。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::context::use_session;
use super::route::Screen;
use crate::guard::NavigationGuard;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_screen: ReadSignal<Screen>,
    set_screen: WriteSignal<Screen>,
    guard: StoredValue<NavigationGuard, LocalStorage>,
}

impl RouterService {
    fn new(guard: NavigationGuard) -> Self {
        // 首次加载同样经过守卫，重定向时替换当前历史记录
        let requested = Screen::from_path(&current_path());
        let initial = guard.resolve(requested);
        if initial != requested {
            replace_history_state(initial.to_path());
        }
        let (current_screen, set_screen) = signal(initial);

        Self {
            current_screen,
            set_screen,
            guard: StoredValue::new_local(guard),
        }
    }

    /// 获取当前页面信号
    pub fn current_screen(&self) -> ReadSignal<Screen> {
        self.current_screen
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 加载
    pub fn navigate(&self, path: &str) {
        self.navigate_to(Screen::from_path(path));
    }

    pub fn navigate_to(&self, target: Screen) {
        let resolved = self.guard.with_value(|guard| guard.resolve(target));
        push_history_state(resolved.to_path());
        self.set_screen.set(resolved);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_screen = self.set_screen;
        let guard = self.guard;

        let closure = Closure::<dyn Fn()>::new(move || {
            let requested = Screen::from_path(&current_path());
            let resolved = guard.with_value(|guard| guard.resolve(requested));

            // popstate 时历史记录已经移动，重定向只能替换当前条目
            if resolved != requested {
                replace_history_state(resolved.to_path());
            }
            set_screen.set(resolved);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(guard: NavigationGuard) -> RouterService {
    let router = RouterService::new(guard);
    router.init_popstate_listener();
    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

/// 导航函数（返回一个可调用的闭包）
pub fn use_navigate() -> impl Fn(&str) + Clone {
    let router = use_router();
    move |to: &str| router.navigate(to)
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 需要先通过 `provide_session` 提供会话上下文。
#[component]
pub fn Router(children: Children) -> impl IntoView {
    provide_router(use_session().guard());
    children()
}

/// 路由出口组件
///
/// 根据当前页面渲染调用方提供的视图。
#[component]
pub fn RouterOutlet(
    /// 页面匹配函数：接收当前页面，返回对应视图
    matcher: fn(Screen) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || matcher(router.current_screen().get())
}
