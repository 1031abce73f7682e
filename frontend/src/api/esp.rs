use crate::error::RequestResult;
use crate::gateway::{RequestGateway, send};
use sensorwatch_shared::protocol::{RawJson, RegisterDeviceRequest};
use tokio_util::sync::CancellationToken;

/// ESP32 设备接口
pub struct EspApi<'a, G: RequestGateway> {
    gateway: &'a G,
}

impl<'a, G: RequestGateway> EspApi<'a, G> {
    pub(super) fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// 注册设备，返回服务端原始响应
    pub async fn register_device(
        &self,
        esp_id: &str,
        cancel: &CancellationToken,
    ) -> RequestResult<RawJson> {
        let req = RegisterDeviceRequest {
            esp_id: esp_id.to_string(),
        };
        Ok(send(self.gateway, &req, cancel).await?.data)
    }
}
