use crate::error::TransportError;
use sensorwatch_shared::protocol::HttpMethod;
use std::collections::HashMap;
use std::rc::Rc;

#[cfg(test)]
use std::cell::RefCell;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 传输层特性 (Trait)
///
/// 只负责把请求发出去并取回状态码和响应体；
/// 非 2xx 也是 `Ok`，由网关统一归一化。
/// 浏览器环境下的 future 不是 Send 的，因此使用 `?Send`。
#[async_trait::async_trait(?Send)]
pub trait Transport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait::async_trait(?Send)]
impl<T: Transport + ?Sized> Transport for Rc<T> {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(req).await
    }
}

// =========================================================
// 测试工具: MockTransport
// =========================================================

#[cfg(test)]
enum MockReply {
    Respond(u16, String),
    Fail(String),
    Hang,
}

#[cfg(test)]
#[derive(Default)]
pub struct MockTransport {
    // ("METHOD URL", 预设响应)
    replies: RefCell<HashMap<String, MockReply>>,
    // 记录发出的请求
    pub requests: RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(method: HttpMethod, url: &str) -> String {
        format!("{} {}", method.as_str(), url)
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.mock_raw(method, url, status, &body.to_string());
    }

    pub fn mock_raw(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
        self.replies.borrow_mut().insert(
            Self::key(method, url),
            MockReply::Respond(status, body.to_string()),
        );
    }

    /// 模拟网络错误
    pub fn mock_failure(&self, method: HttpMethod, url: &str, message: &str) {
        self.replies
            .borrow_mut()
            .insert(Self::key(method, url), MockReply::Fail(message.to_string()));
    }

    /// 模拟永不返回的请求
    pub fn mock_hang(&self, method: HttpMethod, url: &str) {
        self.replies
            .borrow_mut()
            .insert(Self::key(method, url), MockReply::Hang);
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = Self::key(req.method, &req.url);
        self.requests.borrow_mut().push(req);

        let reply = match self.replies.borrow().get(&key) {
            Some(MockReply::Respond(status, body)) => Some(Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            })),
            Some(MockReply::Fail(message)) => Some(Err(TransportError::Network(message.clone()))),
            Some(MockReply::Hang) => None,
            None => Some(Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            })),
        };

        match reply {
            Some(result) => result,
            None => futures::future::pending().await,
        }
    }
}
