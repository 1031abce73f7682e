//! 凭据持久化抽象
//!
//! 会话存储只依赖此 trait；浏览器下由 `web::LocalStorage` 实现，
//! 原生环境与测试使用 [`MemoryStorage`]。

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// 键值形式的持久化存储
///
/// 写入为 fire-and-forget：返回值仅用于诊断日志，调用方不等待确认。
pub trait CredentialStorage {
    /// 读取键值，不存在或出错时返回 `None`
    fn read(&self, key: &str) -> Option<String>;
    /// 写入键值，成功返回 `true`
    fn write(&self, key: &str, value: &str) -> bool;
    /// 删除键值，成功返回 `true`
    fn erase(&self, key: &str) -> bool;
}

/// 内存存储
///
/// 克隆后共享同一份数据，可用来模拟页面刷新后重新初始化会话。
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn erase(&self, key: &str) -> bool {
        self.entries.borrow_mut().remove(key);
        true
    }
}
