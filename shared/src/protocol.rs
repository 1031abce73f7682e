use crate::{
    AlertsPage, AuthResponse, LoginCredentials, MessageResponse, RegisterCredentials, Sensor,
    SensorThreshold,
};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Only POST and PUT carry a JSON body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// The request value itself is the JSON body for methods that carry one.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the session credential is attached.
    const AUTHENTICATED: bool = true;
    /// Whether the response body is decoded. Status-only endpoints set this to `false`
    /// so that plain-text bodies such as `OK` are not treated as failures.
    const DECODE_BODY: bool = true;

    /// Path relative to the API base URL, or an absolute URL for cursor requests.
    fn path(&self) -> String;
}

/// Raw JSON returned by endpoints the client does not model.
pub type RawJson = serde_json::Value;

// =========================================================
// Route constants
// =========================================================

pub mod routes {
    pub const AUTH_LOGIN: &str = "/auth/login";
    pub const AUTH_REGISTER: &str = "/auth/register";
    pub const AUTH_LOGOUT: &str = "/auth/logout";
    pub const AUTH_REFRESH: &str = "/auth/refresh";
    pub const AUTH_RESEND_VERIFICATION: &str = "/auth/resend-verification";
    pub const AUTH_VERIFY_EMAIL: &str = "/auth/verify-email";

    pub const ESP_REGISTER: &str = "/esp/register";
    pub const ESP_SENSOR_NAME: &str = "/esp/sensors/name";

    pub const SENSORS: &str = "/sensors";
    pub const SENSOR_NAME: &str = "/sensors/name";
    pub const SENSOR_THRESHOLDS: &str = "/sensor-thresholds";

    pub fn sensor(id: &str) -> String {
        format!("/sensors/{}", urlencoding::encode(id))
    }

    pub fn sensor_thresholds(sensor_id: &str) -> String {
        format!("/sensor-thresholds/{}", urlencoding::encode(sensor_id))
    }

    pub fn sensor_data(sensor_id: &str) -> String {
        format!("/sensor-data/sensor/{}", urlencoding::encode(sensor_id))
    }

    pub fn sensor_alerts(sensor_id: &str) -> String {
        format!("/alerts/{}/alerts", urlencoding::encode(sensor_id))
    }
}

// =========================================================
// Auth
// =========================================================

impl ApiRequest for LoginCredentials {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        routes::AUTH_LOGIN.to_string()
    }
}

impl ApiRequest for RegisterCredentials {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        routes::AUTH_REGISTER.to_string()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LogoutRequest {}

impl ApiRequest for LogoutRequest {
    // The logout body is not modelled; anything (or nothing) is accepted.
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;
    const DECODE_BODY: bool = false;

    fn path(&self) -> String {
        routes::AUTH_LOGOUT.to_string()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RefreshRequest {}

impl ApiRequest for RefreshRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        routes::AUTH_REFRESH.to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

impl ApiRequest for ResendVerificationRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        routes::AUTH_RESEND_VERIFICATION.to_string()
    }
}

#[derive(Serialize, Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

impl ApiRequest for VerifyEmailRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        routes::AUTH_VERIFY_EMAIL.to_string()
    }
}

// =========================================================
// Sensors
// =========================================================

/// List the caller's sensors
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListSensorsRequest;

impl ApiRequest for ListSensorsRequest {
    type Response = Vec<Sensor>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        routes::SENSORS.to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSensorRequest {
    pub id: String,
    pub name: String,
}

impl ApiRequest for CreateSensorRequest {
    type Response = Sensor;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        routes::SENSORS.to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteSensorRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for DeleteSensorRequest {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Delete;
    const DECODE_BODY: bool = false;

    fn path(&self) -> String {
        routes::sensor(&self.id)
    }
}

/// Which endpoint accepts sensor renames.
///
/// Deployments with device registration expose it under `/esp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SensorNameRoute {
    #[default]
    Sensors,
    Esp,
}

impl SensorNameRoute {
    pub fn path(&self) -> &'static str {
        match self {
            SensorNameRoute::Sensors => routes::SENSOR_NAME,
            SensorNameRoute::Esp => routes::ESP_SENSOR_NAME,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameSensorRequest {
    pub sensor_id: String,
    pub name: String,
    #[serde(skip)]
    pub route: SensorNameRoute,
}

impl ApiRequest for RenameSensorRequest {
    // Only the status code matters to callers.
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Put;
    const DECODE_BODY: bool = false;

    fn path(&self) -> String {
        self.route.path().to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddThresholdRequest {
    pub sensor_id: String,
    pub threshold: f64,
    pub condition: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ApiRequest for AddThresholdRequest {
    type Response = SensorThreshold;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        routes::SENSOR_THRESHOLDS.to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListThresholdsRequest {
    pub sensor_id: String,
}

impl ApiRequest for ListThresholdsRequest {
    type Response = Vec<SensorThreshold>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        routes::sensor_thresholds(&self.sensor_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SensorReadingsRequest {
    pub sensor_id: String,
}

impl ApiRequest for SensorReadingsRequest {
    type Response = RawJson;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        routes::sensor_data(&self.sensor_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListAlertsRequest {
    pub sensor_id: String,
}

impl ApiRequest for ListAlertsRequest {
    type Response = AlertsPage;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        routes::sensor_alerts(&self.sensor_id)
    }
}

/// Follow a `next`/`previous` cursor of an alert page verbatim.
#[derive(Debug, Serialize, Deserialize)]
pub struct AlertsCursorRequest {
    pub cursor: String,
}

impl ApiRequest for AlertsCursorRequest {
    type Response = AlertsPage;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        self.cursor.clone()
    }
}

// =========================================================
// ESP devices
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceRequest {
    pub esp_id: String,
}

impl ApiRequest for RegisterDeviceRequest {
    type Response = RawJson;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        routes::ESP_REGISTER.to_string()
    }
}
