use crate::error::RequestResult;
use crate::gateway::{RequestGateway, send};
use sensorwatch_shared::protocol::{
    AddThresholdRequest, AlertsCursorRequest, CreateSensorRequest, DeleteSensorRequest,
    ListAlertsRequest, ListSensorsRequest, ListThresholdsRequest, RawJson, RenameSensorRequest,
    SensorNameRoute, SensorReadingsRequest,
};
use sensorwatch_shared::{AlertsPage, Sensor, SensorThreshold};
use tokio_util::sync::CancellationToken;

/// 传感器、阈值与告警接口
pub struct SensorsApi<'a, G: RequestGateway> {
    gateway: &'a G,
    name_route: SensorNameRoute,
}

impl<'a, G: RequestGateway> SensorsApi<'a, G> {
    pub(super) fn new(gateway: &'a G, name_route: SensorNameRoute) -> Self {
        Self {
            gateway,
            name_route,
        }
    }

    /// 获取传感器列表
    pub async fn list(&self, cancel: &CancellationToken) -> RequestResult<Vec<Sensor>> {
        Ok(send(self.gateway, &ListSensorsRequest, cancel).await?.data)
    }

    pub async fn create(
        &self,
        id: &str,
        name: &str,
        cancel: &CancellationToken,
    ) -> RequestResult<Sensor> {
        let req = CreateSensorRequest {
            id: id.to_string(),
            name: name.to_string(),
        };
        Ok(send(self.gateway, &req, cancel).await?.data)
    }

    pub async fn delete(&self, id: &str, cancel: &CancellationToken) -> RequestResult<()> {
        let req = DeleteSensorRequest { id: id.to_string() };
        send(self.gateway, &req, cancel).await?;
        Ok(())
    }

    /// 重命名传感器，返回服务端状态码
    ///
    /// 不做乐观更新，调用方需要重新拉取列表。
    pub async fn rename_sensor(
        &self,
        sensor_id: &str,
        name: &str,
        cancel: &CancellationToken,
    ) -> RequestResult<u16> {
        let req = RenameSensorRequest {
            sensor_id: sensor_id.to_string(),
            name: name.to_string(),
            route: self.name_route,
        };
        Ok(send(self.gateway, &req, cancel).await?.status)
    }

    pub async fn add_threshold(
        &self,
        sensor_id: &str,
        threshold: f64,
        condition: &str,
        kind: &str,
        cancel: &CancellationToken,
    ) -> RequestResult<SensorThreshold> {
        let req = AddThresholdRequest {
            sensor_id: sensor_id.to_string(),
            threshold,
            condition: condition.to_string(),
            kind: kind.to_string(),
        };
        Ok(send(self.gateway, &req, cancel).await?.data)
    }

    /// 获取传感器读数（原始序列，不做建模）
    pub async fn get_readings(
        &self,
        sensor_id: &str,
        cancel: &CancellationToken,
    ) -> RequestResult<RawJson> {
        let req = SensorReadingsRequest {
            sensor_id: sensor_id.to_string(),
        };
        Ok(send(self.gateway, &req, cancel).await?.data)
    }

    pub async fn list_thresholds(
        &self,
        sensor_id: &str,
        cancel: &CancellationToken,
    ) -> RequestResult<Vec<SensorThreshold>> {
        let req = ListThresholdsRequest {
            sensor_id: sensor_id.to_string(),
        };
        Ok(send(self.gateway, &req, cancel).await?.data)
    }

    /// 获取告警历史的第一页
    pub async fn list_alerts(
        &self,
        sensor_id: &str,
        cancel: &CancellationToken,
    ) -> RequestResult<AlertsPage> {
        let req = ListAlertsRequest {
            sensor_id: sensor_id.to_string(),
        };
        Ok(send(self.gateway, &req, cancel).await?.data)
    }

    /// 跟随 `next` 游标；没有下一页时返回 `None` 且不发请求
    pub async fn next_alerts(
        &self,
        page: &AlertsPage,
        cancel: &CancellationToken,
    ) -> RequestResult<Option<AlertsPage>> {
        self.follow(page.next.as_deref(), cancel).await
    }

    /// 跟随 `previous` 游标
    pub async fn previous_alerts(
        &self,
        page: &AlertsPage,
        cancel: &CancellationToken,
    ) -> RequestResult<Option<AlertsPage>> {
        self.follow(page.previous.as_deref(), cancel).await
    }

    async fn follow(
        &self,
        cursor: Option<&str>,
        cancel: &CancellationToken,
    ) -> RequestResult<Option<AlertsPage>> {
        let Some(cursor) = cursor else {
            return Ok(None);
        };
        let req = AlertsCursorRequest {
            cursor: cursor.to_string(),
        };
        Ok(Some(send(self.gateway, &req, cancel).await?.data))
    }
}
