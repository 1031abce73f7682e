//! 认证请求网关
//!
//! 所有发往后端的请求都经过这里：
//! 1. 从会话存储读取当前凭据，存在时附加 `Authorization: Bearer <token>`
//! 2. 通过注入的 [`Transport`] 发出请求
//! 3. 将网络错误、非 2xx、解析失败统一归一化为 [`RequestFailed`]，并记录诊断日志
//!
//! 网关不会因为 401 自行清空会话，这个决定留给调用方（见 `auth` 模块）。

use crate::config::ClientConfig;
use crate::error::{RequestFailed, RequestResult};
use crate::request::{HttpRequest, Transport};
use crate::session::SessionStore;
use futures::future::{Either, select};
use sensorwatch_shared::protocol::{ApiRequest, HttpMethod};
use sensorwatch_shared::{BEARER_PREFIX, HEADER_AUTHORIZATION};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

// =========================================================
// 能力接口 (Capability Interface)
// =========================================================

/// 请求描述
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    /// 相对路径，或已是绝对 URL 的分页游标
    pub path: String,
    /// 已序列化的 JSON 请求体
    pub body: Option<String>,
    /// 是否附加会话凭据
    pub authenticated: bool,
}

/// 成功响应的原始载荷
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub status: u16,
    pub body: String,
}

/// 资源客户端唯一依赖的接口
#[async_trait::async_trait(?Send)]
pub trait RequestGateway {
    async fn perform(
        &self,
        request: RequestDescriptor,
        cancel: &CancellationToken,
    ) -> RequestResult<Payload>;
}

/// 强类型响应：状态码 + 解码后的数据
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
}

// =========================================================
// 实现层: AuthenticatedGateway
// =========================================================

pub struct AuthenticatedGateway<T: Transport> {
    base_url: String,
    session: SessionStore,
    transport: T,
}

impl<T: Transport> AuthenticatedGateway<T> {
    pub fn new(config: &ClientConfig, session: SessionStore, transport: T) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
            transport,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 凭据只发往 API 源，游标指向其他主机时不附加
    fn is_same_origin(&self, url: &str) -> bool {
        url.strip_prefix(&self.base_url)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?', '#']))
    }

    fn build(&self, request: RequestDescriptor) -> HttpRequest {
        let url = self.url(&request.path);
        let attach_credential = request.authenticated && self.is_same_origin(&url);
        let mut req =
            HttpRequest::new(&url, request.method).with_header("Accept", "application/json");

        if attach_credential {
            if let Some(token) = self.session.token() {
                req = req.with_header(HEADER_AUTHORIZATION, &format!("{}{}", BEARER_PREFIX, token));
            }
        }

        if let Some(body) = request.body {
            req = req
                .with_header("Content-Type", "application/json")
                .with_body(body);
        }
        req
    }

    async fn dispatch(
        &self,
        request: RequestDescriptor,
        cancel: &CancellationToken,
    ) -> RequestResult<Payload> {
        let path = request.path.clone();

        if cancel.is_cancelled() {
            return Err(RequestFailed::cancelled().in_op_with("gateway.send", path));
        }

        let req = self.build(request);
        let sending = std::pin::pin!(self.transport.send(req));
        let cancelled = std::pin::pin!(cancel.cancelled());

        // 取消后迟到的响应直接丢弃
        let response = match select(cancelled, sending).await {
            Either::Left(_) => {
                return Err(RequestFailed::cancelled().in_op_with("gateway.send", path));
            }
            Either::Right((result, _)) => result.map_err(|e| {
                RequestFailed::transport(e.to_string()).in_op_with("gateway.send", &path)
            })?,
        };

        if !response.is_success() {
            let message = rejection_message(response.status, &response.body);
            return Err(
                RequestFailed::rejected(response.status, message).in_op_with("gateway.send", path)
            );
        }

        Ok(Payload {
            status: response.status,
            body: response.body,
        })
    }
}

#[async_trait::async_trait(?Send)]
impl<T: Transport> RequestGateway for AuthenticatedGateway<T> {
    async fn perform(
        &self,
        request: RequestDescriptor,
        cancel: &CancellationToken,
    ) -> RequestResult<Payload> {
        let method = request.method;
        let path = request.path.clone();

        self.dispatch(request, cancel)
            .await
            .inspect_err(|err| log_failure(method, &path, err))
    }
}

// =========================================================
// 强类型调用
// =========================================================

/// 发送强类型请求并解码响应
///
/// 请求值本身即 JSON 请求体（仅 POST/PUT）；空响应体按 `null` 解码，
/// 因此 `()` / `IgnoredAny` 之类的响应类型可以接受 204。
/// `DECODE_BODY == false` 的请求只关心状态码，响应体不参与解码。
pub async fn send<G, R>(
    gateway: &G,
    request: &R,
    cancel: &CancellationToken,
) -> RequestResult<ApiResponse<R::Response>>
where
    G: RequestGateway + ?Sized,
    R: ApiRequest,
{
    let path = request.path();

    let body = if R::METHOD.has_body() {
        let json = serde_json::to_string(request).map_err(|e| {
            let err = RequestFailed::decode(None, e.to_string()).in_op_with("gateway.encode", &path);
            log_failure(R::METHOD, &path, &err);
            err
        })?;
        Some(json)
    } else {
        None
    };

    let descriptor = RequestDescriptor {
        method: R::METHOD,
        path: path.clone(),
        body,
        authenticated: R::AUTHENTICATED,
    };

    let payload = gateway.perform(descriptor, cancel).await?;
    let body = if R::DECODE_BODY { payload.body.as_str() } else { "" };
    let data = decode::<R::Response>(body).map_err(|e| {
        let err = RequestFailed::decode(Some(payload.status), e.to_string())
            .in_op_with("gateway.decode", &path);
        log_failure(R::METHOD, &path, &err);
        err
    })?;

    Ok(ApiResponse {
        status: payload.status,
        data,
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> serde_json::Result<T> {
    if body.trim().is_empty() {
        serde_json::from_str("null")
    } else {
        serde_json::from_str(body)
    }
}

/// 提取服务端错误消息
///
/// 依次尝试 `message`（字符串或字符串数组）与 `error` 字段。
fn rejection_message(status: u16, body: &str) -> String {
    let fallback = || format!("request failed with status {}", status);

    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return fallback();
    };

    match value.get("message") {
        Some(serde_json::Value::String(msg)) if !msg.is_empty() => return msg.clone(),
        Some(serde_json::Value::Array(items)) => {
            let parts: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
            if !parts.is_empty() {
                return parts.join(", ");
            }
        }
        _ => {}
    }

    value
        .get("error")
        .and_then(|v| v.as_str())
        .filter(|msg| !msg.is_empty())
        .map(str::to_string)
        .unwrap_or_else(fallback)
}

fn log_failure(method: HttpMethod, path: &str, err: &RequestFailed) {
    tracing::warn!(
        method = method.as_str(),
        path,
        status = ?err.status,
        kind = err.kind.as_str(),
        "request failed: {}",
        err.message
    );
}

#[cfg(test)]
mod tests;
