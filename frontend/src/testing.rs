//! 测试夹具

use crate::error::{RequestFailed, RequestResult};
use crate::gateway::{Payload, RequestDescriptor, RequestGateway};
use chrono::{TimeZone, Utc};
use sensorwatch_shared::{AuthResponse, User};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::VecDeque;
use tokio_util::sync::CancellationToken;

pub fn user(id: i64) -> User {
    User {
        id,
        name: format!("user-{}", id),
        email: format!("user{}@example.com", id),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn auth_response(token: Option<&str>, user_id: i64) -> AuthResponse {
    AuthResponse {
        token: token.map(str::to_string),
        user: user(user_id),
        needs_verification: None,
    }
}

pub fn auth_json(token: Option<&str>, user_id: i64) -> Value {
    let mut body = json!({
        "user": {
            "id": user_id,
            "name": format!("user-{}", user_id),
            "email": format!("user{}@example.com", user_id),
            "createdAt": "2024-01-01T00:00:00Z"
        }
    });
    if let Some(token) = token {
        body["token"] = json!(token);
    }
    body
}

pub fn alert_json(id: &str, sensor_id: &str) -> Value {
    json!({
        "id": id,
        "userId": "u1",
        "sensorId": sensor_id,
        "thresholdValue": 30.0,
        "actualValue": 31.5,
        "condition": "gt",
        "type": "temperature",
        "sentAt": "2024-06-01T12:00:00Z",
        "createdAt": "2024-06-01T12:00:00Z",
        "updatedAt": "2024-06-01T12:00:00Z",
        "sensor": { "id": sensor_id, "name": "Greenhouse" },
        "user": { "id": "u1", "name": "Ana", "email": "ana@example.com" }
    })
}

// =========================================================
// ScriptedGateway: 按顺序回放结果的网关替身
// =========================================================

#[derive(Default)]
pub struct ScriptedGateway {
    replies: RefCell<VecDeque<RequestResult<Payload>>>,
    pub seen: RefCell<Vec<RequestDescriptor>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: Value) -> Self {
        self.replies.borrow_mut().push_back(Ok(Payload {
            status,
            body: body.to_string(),
        }));
        self
    }

    pub fn fail(self, err: RequestFailed) -> Self {
        self.replies.borrow_mut().push_back(Err(err));
        self
    }
}

#[async_trait::async_trait(?Send)]
impl RequestGateway for ScriptedGateway {
    async fn perform(
        &self,
        request: RequestDescriptor,
        _cancel: &CancellationToken,
    ) -> RequestResult<Payload> {
        self.seen.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(RequestFailed::transport("no scripted reply")))
    }
}
