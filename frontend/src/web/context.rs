//! 会话上下文
//!
//! 把 [`SessionStore`] 接入 leptos 的响应式系统：会话每次变化都会同步到
//! `is_authenticated` 信号。会话存储本身不是 `Send` 的，放在本地 arena 中。

use super::http::FetchTransport;
use super::storage::LocalStorage as BrowserStorage;
use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::gateway::AuthenticatedGateway;
use crate::guard::NavigationGuard;
use crate::session::SessionStore;
use leptos::prelude::*;
use std::rc::Rc;

/// 浏览器环境下的资源客户端
pub type WebApiClient = ApiClient<AuthenticatedGateway<FetchTransport>>;

#[derive(Clone, Copy)]
pub struct SessionContext {
    store: StoredValue<SessionStore, LocalStorage>,
    api: StoredValue<Rc<WebApiClient>, LocalStorage>,
    is_authenticated: RwSignal<bool>,
}

impl SessionContext {
    /// 从 LocalStorage 恢复会话并组装网关
    pub fn new(config: &ClientConfig) -> Self {
        let store = SessionStore::init(BrowserStorage, config.token_storage_key.clone());
        let gateway = AuthenticatedGateway::new(config, store.clone(), FetchTransport);
        let api = Rc::new(ApiClient::new(gateway, config));

        let is_authenticated = RwSignal::new(store.is_authenticated());
        store.subscribe(move |session| is_authenticated.set(session.is_authenticated));

        Self {
            store: StoredValue::new_local(store),
            api: StoredValue::new_local(api),
            is_authenticated,
        }
    }

    pub fn store(&self) -> SessionStore {
        self.store.get_value()
    }

    pub fn api(&self) -> Rc<WebApiClient> {
        self.api.get_value()
    }

    pub fn guard(&self) -> NavigationGuard {
        NavigationGuard::new(self.store())
    }

    /// 认证状态信号（供视图使用）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let is_authenticated = self.is_authenticated;
        Signal::derive(move || is_authenticated.get())
    }
}

/// 创建会话上下文并放入 Context
pub fn provide_session(config: &ClientConfig) -> SessionContext {
    let ctx = SessionContext::new(config);
    provide_context(ctx);
    ctx
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}
