//! 会话存储
//!
//! "是否已登录、以谁的身份登录" 的唯一事实来源。
//!
//! - 只有 `set_auth` / `clear_auth` / `set_user` / `clear_user` 会写入状态
//! - 网关、导航守卫等其余组件只读
//! - 所有修改都是同步的，订阅者在修改完成后立即收到新快照

use crate::storage::CredentialStorage;
use sensorwatch_shared::{AuthResponse, User};
use std::cell::RefCell;
use std::rc::Rc;

/// 会话快照
///
/// 不变式：`is_authenticated == token.is_some()`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
    pub is_authenticated: bool,
}

type Listener = Rc<dyn Fn(&Session)>;

struct SessionInner {
    state: RefCell<Session>,
    storage: Box<dyn CredentialStorage>,
    storage_key: String,
    listeners: RefCell<Vec<Listener>>,
}

/// 会话存储句柄
///
/// 克隆开销很小，所有克隆共享同一份状态。单线程使用（`!Send`）。
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<SessionInner>,
}

impl SessionStore {
    /// 从持久化存储初始化
    ///
    /// 找到非空 token 即视为已认证；启动时不做任何校验请求，
    /// token 会一直被信任，直到某次请求被服务端拒绝。
    pub fn init(storage: impl CredentialStorage + 'static, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();
        let token = storage.read(&storage_key).filter(|t| !t.is_empty());
        let is_authenticated = token.is_some();

        tracing::debug!(is_authenticated, "session restored from storage");

        Self {
            inner: Rc::new(SessionInner {
                state: RefCell::new(Session {
                    token,
                    user: None,
                    is_authenticated,
                }),
                storage: Box::new(storage),
                storage_key,
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    // --- 读取 ---

    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated
    }

    // --- 写入 ---

    /// 应用一次认证响应
    ///
    /// 只有 token 决定认证状态：没有 token 的响应（如注册后待验证邮箱）
    /// 会清除已存的凭据，但仍记录其中的用户信息。
    pub fn set_auth(&self, response: &AuthResponse) {
        let token = response.token.clone().filter(|t| !t.is_empty());

        match &token {
            Some(token) => self.persist(token),
            None => self.erase(),
        }

        let is_authenticated = token.is_some();
        self.commit(|session| {
            session.token = token;
            session.user = Some(response.user.clone());
            session.is_authenticated = is_authenticated;
        });

        tracing::info!(
            user_id = response.user.id,
            is_authenticated,
            "session updated from auth response"
        );
    }

    /// 无条件清空会话与持久化凭据
    pub fn clear_auth(&self) {
        self.erase();
        self.commit(|session| *session = Session::default());
        tracing::info!("session cleared");
    }

    /// 仅更新身份信息，不影响凭据
    pub fn set_user(&self, user: User) {
        self.commit(|session| session.user = Some(user));
    }

    pub fn clear_user(&self) {
        self.commit(|session| session.user = None);
    }

    /// 订阅会话变化
    ///
    /// 回调在每次修改后同步执行。回调内可以读取会话或追加订阅，
    /// 新订阅从下一次修改开始生效；回调内不能再修改会话。
    pub fn subscribe(&self, listener: impl Fn(&Session) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    // --- 内部工具 ---

    fn commit(&self, mutate: impl FnOnce(&mut Session)) {
        let snapshot = {
            let mut state = self.inner.state.borrow_mut();
            mutate(&mut state);
            state.clone()
        };

        let listeners: Vec<Listener> = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    fn persist(&self, token: &str) {
        if !self.inner.storage.write(&self.inner.storage_key, token) {
            tracing::warn!(key = %self.inner.storage_key, "failed to persist credential");
        }
    }

    fn erase(&self) {
        if !self.inner.storage.erase(&self.inner.storage_key) {
            tracing::warn!(key = %self.inner.storage_key, "failed to erase stored credential");
        }
    }
}
