//! 资源客户端
//!
//! 每个后端能力对应一个强类型异步操作，只依赖 [`RequestGateway`] 接口，
//! 从不直接接触传输层。网关归一化后的失败原样传给调用方。

mod auth;
mod esp;
mod sensors;

pub use auth::AuthApi;
pub use esp::EspApi;
pub use sensors::SensorsApi;

use crate::config::ClientConfig;
use crate::gateway::RequestGateway;
use sensorwatch_shared::protocol::SensorNameRoute;

pub struct ApiClient<G: RequestGateway> {
    gateway: G,
    sensor_name_route: SensorNameRoute,
}

impl<G: RequestGateway> ApiClient<G> {
    pub fn new(gateway: G, config: &ClientConfig) -> Self {
        Self {
            gateway,
            sensor_name_route: config.sensor_name_route,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn auth(&self) -> AuthApi<'_, G> {
        AuthApi::new(&self.gateway)
    }

    pub fn sensors(&self) -> SensorsApi<'_, G> {
        SensorsApi::new(&self.gateway, self.sensor_name_route)
    }

    pub fn esp(&self) -> EspApi<'_, G> {
        EspApi::new(&self.gateway)
    }
}
