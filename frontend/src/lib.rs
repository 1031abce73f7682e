//! SensorWatch 前端核心
//!
//! 会话 / 授权核心与传感器监控后端的类型化客户端，视图由嵌入方提供：
//! - `session`: 会话存储（唯一的认证状态来源）
//! - `gateway`: 带凭据的请求网关
//! - `api`: 资源客户端
//! - `guard` + `web::route`: 导航守卫与声明式路由表
//! - `auth`: 登录 / 注销流程与 401 策略
//! - `web`: 浏览器适配层（仅 wasm32）
//!
//! 典型的浏览器入口：
//!
//! ```ignore
//! let config = ClientConfig::from_build_env()?;
//! telemetry::init(&config.log);
//! mount_to_body(move || {
//!     provide_session(&config);
//!     view! { <Router><RouterOutlet matcher=pages /></Router> }
//! });
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod request;
pub mod session;
pub mod storage;
pub mod telemetry;

#[cfg(test)]
mod testing;

// 浏览器适配层
// 路由表是纯逻辑，所有平台可用；其余模块依赖 DOM，只在 wasm32 下编译。
pub mod web {
    pub mod route;

    #[cfg(target_arch = "wasm32")]
    pub mod context;
    #[cfg(target_arch = "wasm32")]
    mod http;
    #[cfg(target_arch = "wasm32")]
    pub mod router;
    #[cfg(target_arch = "wasm32")]
    mod storage;

    #[cfg(target_arch = "wasm32")]
    pub use context::{SessionContext, WebApiClient, provide_session, use_session};
    #[cfg(target_arch = "wasm32")]
    pub use http::FetchTransport;
    #[cfg(target_arch = "wasm32")]
    pub use router::{Router, RouterOutlet, RouterService, use_navigate, use_router};
    #[cfg(target_arch = "wasm32")]
    pub use storage::LocalStorage;
}

pub use api::ApiClient;
pub use auth::SessionResultExt;
pub use config::{ClientConfig, LogConfig};
pub use error::{FailureKind, RequestFailed, RequestResult};
pub use gateway::{AuthenticatedGateway, RequestGateway};
pub use guard::{GuardOutcome, NavigationGuard};
pub use session::{Session, SessionStore};
pub use web::route::Screen;
