//! 认证流程
//!
//! 把资源客户端与会话存储连接起来：登录/注册成功后写入会话，
//! 登出后无条件清空会话。
//!
//! 网关本身不处理 401，由这里的策略函数决定是否让会话失效；
//! 失效后不会强制跳转，路由在下一次导航时自然重定向到登录页。

use crate::api::ApiClient;
use crate::error::{RequestFailed, RequestResult};
use crate::gateway::RequestGateway;
use crate::session::SessionStore;
use sensorwatch_shared::{AuthResponse, LoginCredentials, RegisterCredentials};
use tokio_util::sync::CancellationToken;

/// 登录并保存会话
///
/// 失败时原样返回错误，`RequestFailed::auth_message` 即服务端消息。
pub async fn login<G: RequestGateway>(
    store: &SessionStore,
    api: &ApiClient<G>,
    credentials: &LoginCredentials,
    cancel: &CancellationToken,
) -> RequestResult<AuthResponse> {
    let response = api.auth().login(credentials, cancel).await?;
    store.set_auth(&response);
    Ok(response)
}

/// 注册
///
/// 需要邮箱验证时响应中没有 token，会话保持未认证，但记录用户信息。
pub async fn register<G: RequestGateway>(
    store: &SessionStore,
    api: &ApiClient<G>,
    credentials: &RegisterCredentials,
    cancel: &CancellationToken,
) -> RequestResult<AuthResponse> {
    let response = api.auth().register(credentials, cancel).await?;
    store.set_auth(&response);
    Ok(response)
}

/// 注销
///
/// 无论服务端调用是否成功都会清空本地会话；服务端错误仍然返回给调用方。
pub async fn logout<G: RequestGateway>(
    store: &SessionStore,
    api: &ApiClient<G>,
    cancel: &CancellationToken,
) -> RequestResult<()> {
    let result = api.auth().logout(cancel).await;
    store.clear_auth();
    result
}

/// 刷新凭据
pub async fn refresh<G: RequestGateway>(
    store: &SessionStore,
    api: &ApiClient<G>,
    cancel: &CancellationToken,
) -> RequestResult<AuthResponse> {
    let response = api
        .auth()
        .refresh(cancel)
        .await
        .invalidate_session_on_401(store)?;
    store.set_auth(&response);
    Ok(response)
}

/// 401 视为会话失效：清空会话并返回 `true`
pub fn invalidate_on_unauthorized(store: &SessionStore, error: &RequestFailed) -> bool {
    if !error.is_unauthorized() {
        return false;
    }
    tracing::info!("credential rejected by server, clearing session");
    store.clear_auth();
    true
}

/// 让调用点保持一行：`api.sensors().list(&c).await.invalidate_session_on_401(&store)?`
pub trait SessionResultExt {
    fn invalidate_session_on_401(self, store: &SessionStore) -> Self;
}

impl<T> SessionResultExt for RequestResult<T> {
    fn invalidate_session_on_401(self, store: &SessionStore) -> Self {
        if let Err(err) = &self {
            invalidate_on_unauthorized(store, err);
        }
        self
    }
}
