//! 日志初始化
//!
//! 原生环境输出到 stdout；wasm32 下输出到浏览器控制台，并安装 panic hook。

use crate::config::LogConfig;
use tracing_subscriber::EnvFilter;

const FALLBACK_DIRECTIVE: &str = "info";

/// 安装全局 subscriber
///
/// 只有第一次调用生效，之后的调用返回 `false`。
pub fn init(config: &LogConfig) -> bool {
    let filter = build_filter(&config.level);

    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .without_time()
            .with_writer(console::ConsoleWriter::default)
            .try_init()
            .is_ok()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .is_ok()
    }
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE))
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;

    /// 缓冲一条格式化后的日志，drop 时写入 `console.log`
    #[derive(Default)]
    pub struct ConsoleWriter {
        buf: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            if self.buf.is_empty() {
                return;
            }
            let line = String::from_utf8_lossy(&self.buf);
            web_sys::console::log_1(&line.trim_end().into());
        }
    }
}
