//! 导航守卫
//!
//! 每次页面切换前求值。只读取当前内存中的会话状态，不发网络请求、不会挂起。
//! `requires_auth` 的检查优先于 `requires_guest`。

use crate::session::SessionStore;
use crate::web::route::{RouteMeta, Screen};

/// 认证失败时的重定向目标
pub const LOGIN_SCREEN: Screen = Screen::Login;
/// 已认证用户访问访客页时的重定向目标
pub const HOME_SCREEN: Screen = Screen::Home;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Proceed,
    Redirect(Screen),
}

/// 核心守卫逻辑（纯函数）
pub fn evaluate(meta: RouteMeta, is_authenticated: bool) -> GuardOutcome {
    if meta.requires_auth && !is_authenticated {
        GuardOutcome::Redirect(LOGIN_SCREEN)
    } else if meta.requires_guest && is_authenticated {
        GuardOutcome::Redirect(HOME_SCREEN)
    } else {
        GuardOutcome::Proceed
    }
}

/// 绑定到会话存储的守卫
#[derive(Clone)]
pub struct NavigationGuard {
    session: SessionStore,
}

impl NavigationGuard {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    pub fn check(&self, target: Screen) -> GuardOutcome {
        let outcome = evaluate(target.meta(), self.session.is_authenticated());
        if let GuardOutcome::Redirect(to) = outcome {
            tracing::info!(from = %target, to = %to, "navigation redirected");
        }
        outcome
    }

    /// 返回实际应当展示的页面
    pub fn resolve(&self, target: Screen) -> Screen {
        match self.check(target) {
            GuardOutcome::Proceed => target,
            GuardOutcome::Redirect(to) => to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::testing::auth_response;

    #[test]
    fn guard_table_holds_for_all_combinations() {
        use GuardOutcome::*;

        // (requires_auth, requires_guest, is_authenticated, expected)
        let table = [
            (false, false, false, Proceed),
            (false, false, true, Proceed),
            (false, true, false, Proceed),
            (false, true, true, Redirect(HOME_SCREEN)),
            (true, false, false, Redirect(LOGIN_SCREEN)),
            (true, false, true, Proceed),
            // requires_auth 优先
            (true, true, false, Redirect(LOGIN_SCREEN)),
            (true, true, true, Redirect(HOME_SCREEN)),
        ];

        for (requires_auth, requires_guest, is_authenticated, expected) in table {
            let meta = RouteMeta {
                requires_auth,
                requires_guest,
            };
            assert_eq!(
                evaluate(meta, is_authenticated),
                expected,
                "auth={requires_auth} guest={requires_guest} authenticated={is_authenticated}"
            );
        }
    }

    #[test]
    fn guard_follows_session_changes() {
        let session = SessionStore::init(MemoryStorage::new(), "token");
        let guard = NavigationGuard::new(session.clone());

        assert_eq!(guard.resolve(Screen::About), Screen::Login);
        assert_eq!(guard.resolve(Screen::Register), Screen::Register);

        session.set_auth(&auth_response(Some("abc"), 1));
        assert_eq!(guard.resolve(Screen::About), Screen::About);
        assert_eq!(guard.resolve(Screen::Login), Screen::Home);

        session.clear_auth();
        assert_eq!(guard.check(Screen::RegisterSensor), GuardOutcome::Redirect(Screen::Login));
    }

    #[test]
    fn unknown_screens_always_proceed() {
        let session = SessionStore::init(MemoryStorage::new(), "token");
        let guard = NavigationGuard::new(session.clone());
        assert_eq!(guard.check(Screen::NotFound), GuardOutcome::Proceed);

        session.set_auth(&auth_response(Some("abc"), 1));
        assert_eq!(guard.check(Screen::NotFound), GuardOutcome::Proceed);
    }
}
