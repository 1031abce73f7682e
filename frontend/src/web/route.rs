//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 每个页面的守卫要求以声明式表格给出，由 `guard::evaluate` 统一求值。

use std::fmt::Display;

/// 应用页面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    /// 首页 (需要认证)
    #[default]
    Home,
    /// 登录页 (仅访客)
    Login,
    /// 注册页 (仅访客)
    Register,
    About,
    /// 注册传感器 (需要认证)
    RegisterSensor,
    /// 页面未找到
    NotFound,
}

/// 页面对会话的要求
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_guest: bool,
}

impl RouteMeta {
    pub const AUTH: Self = Self {
        requires_auth: true,
        requires_guest: false,
    };
    pub const GUEST: Self = Self {
        requires_auth: false,
        requires_guest: true,
    };
    pub const OPEN: Self = Self {
        requires_auth: false,
        requires_guest: false,
    };
}

#[derive(Debug, Clone, Copy)]
pub struct RouteEntry {
    pub screen: Screen,
    pub path: &'static str,
    pub meta: RouteMeta,
}

/// 路由表
///
/// 未列出的路径解析为 `Screen::NotFound`，没有任何守卫要求。
pub const ROUTES: &[RouteEntry] = &[
    RouteEntry {
        screen: Screen::Login,
        path: "/login",
        meta: RouteMeta::GUEST,
    },
    RouteEntry {
        screen: Screen::Register,
        path: "/register",
        meta: RouteMeta::GUEST,
    },
    RouteEntry {
        screen: Screen::Home,
        path: "/",
        meta: RouteMeta::AUTH,
    },
    RouteEntry {
        screen: Screen::About,
        path: "/about",
        meta: RouteMeta::AUTH,
    },
    RouteEntry {
        screen: Screen::RegisterSensor,
        path: "/register-sensor",
        meta: RouteMeta::AUTH,
    },
];

const NOT_FOUND_PATH: &str = "/404";

impl Screen {
    /// 将 URL path 解析为页面（忽略查询串、片段和末尾的 `/`）
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("/");
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };

        ROUTES
            .iter()
            .find(|entry| entry.path == normalized)
            .map(|entry| entry.screen)
            .unwrap_or(Screen::NotFound)
    }

    /// 获取页面对应的 URL path
    pub fn to_path(&self) -> &'static str {
        self.entry().map(|e| e.path).unwrap_or(NOT_FOUND_PATH)
    }

    /// 页面的守卫要求
    pub fn meta(&self) -> RouteMeta {
        self.entry().map(|e| e.meta).unwrap_or(RouteMeta::OPEN)
    }

    fn entry(&self) -> Option<&'static RouteEntry> {
        ROUTES.iter().find(|entry| entry.screen == *self)
    }
}

impl Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip() {
        for entry in ROUTES {
            assert_eq!(Screen::from_path(entry.path), entry.screen);
            assert_eq!(entry.screen.to_path(), entry.path);
        }
    }

    #[test]
    fn path_normalization() {
        assert_eq!(Screen::from_path("/about/"), Screen::About);
        assert_eq!(Screen::from_path("/login?next=%2Fabout"), Screen::Login);
        assert_eq!(Screen::from_path(""), Screen::Home);
        assert_eq!(Screen::from_path("/nope"), Screen::NotFound);
    }

    #[test]
    fn route_flags_follow_table() {
        assert_eq!(Screen::Login.meta(), RouteMeta::GUEST);
        assert_eq!(Screen::Register.meta(), RouteMeta::GUEST);
        assert_eq!(Screen::Home.meta(), RouteMeta::AUTH);
        assert_eq!(Screen::About.meta(), RouteMeta::AUTH);
        assert_eq!(Screen::RegisterSensor.meta(), RouteMeta::AUTH);
        assert_eq!(Screen::NotFound.meta(), RouteMeta::OPEN);
    }
}
