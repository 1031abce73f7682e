//! 时间解析工具
//!
//! 后端时间戳并不总是带时区偏移：`2024-05-01T10:00:00` 这类值按 UTC 处理，
//! 避免一个时间字段让整个身份记录解码失败。

use chrono::{DateTime, NaiveDateTime, Utc};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// 解析 RFC 3339，或不带偏移的本地格式（视为 UTC）
pub fn parse_lenient(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// `#[serde(with = "crate::date::lenient_utc")]`
pub mod lenient_utc {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_lenient(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn accepts_offset_and_naive_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_lenient("2024-05-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_lenient("2024-05-01T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_lenient("2024-05-01T10:00:00"), Some(expected));
        assert_eq!(parse_lenient("2024-05-01 10:00:00.000"), Some(expected));
        assert_eq!(parse_lenient("yesterday"), None);
    }
}
