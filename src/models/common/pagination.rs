use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 分页查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub size: i64,
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// 单页最大条数
pub const MAX_PAGE_SIZE: i64 = 100;

impl PaginationQuery {
    /// 规范化为 (page, size)，page 从 1 开始，size 限制在 [1, MAX_PAGE_SIZE]
    pub fn normalized(&self) -> (u64, u64) {
        (
            self.page.max(1) as u64,
            self.size.clamp(1, MAX_PAGE_SIZE) as u64,
        )
    }
}

impl PaginationInfo {
    pub fn new(page: u64, page_size: u64, total: u64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(page_size.max(1))
        };
        Self {
            page: page as i64,
            page_size: page_size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

// 自定义反序列化函数，支持字符串到i64的转换
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Str(String),
}

/// 查询串中的可选布尔值（`flatten` 之后 serde_urlencoded 只给出字符串）
pub fn deserialize_option_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Bool(b)) => Ok(Some(b)),
        Some(Scalar::Int(1)) => Ok(Some(true)),
        Some(Scalar::Int(0)) => Ok(Some(false)),
        Some(Scalar::Str(s)) => match s.as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            "" => Ok(None),
            _ => Err(Error::custom(format!("invalid boolean: '{s}'"))),
        },
        Some(Scalar::Int(n)) => Err(Error::custom(format!("invalid boolean: {n}"))),
    }
}

/// 查询串中的可选整数
pub fn deserialize_option_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Int(n)) => Ok(Some(n)),
        Some(Scalar::Str(s)) if s.is_empty() => Ok(None),
        Some(Scalar::Str(s)) => s
            .parse()
            .map(Some)
            .map_err(|_| Error::custom(format!("invalid integer: '{s}'"))),
        Some(Scalar::Bool(b)) => Err(Error::custom(format!("invalid integer: {b}"))),
    }
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    20
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: 1, size: 20 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(flatten)]
        pagination: PaginationQuery,
    }

    #[derive(Deserialize)]
    struct Filters {
        #[serde(flatten)]
        _pagination: PaginationQuery,
        #[serde(default, deserialize_with = "deserialize_option_bool")]
        unread_only: Option<bool>,
        #[serde(default, deserialize_with = "deserialize_option_i64")]
        course_id: Option<i64>,
    }

    #[test]
    fn test_optional_scalars_from_strings() {
        let f: Filters =
            serde_json::from_str(r#"{"unread_only":"true","course_id":"7"}"#).unwrap();
        assert_eq!(f.unread_only, Some(true));
        assert_eq!(f.course_id, Some(7));

        let f: Filters = serde_json::from_str("{}").unwrap();
        assert_eq!(f.unread_only, None);
        assert_eq!(f.course_id, None);

        assert!(serde_json::from_str::<Filters>(r#"{"unread_only":"maybe"}"#).is_err());
    }

    #[test]
    fn test_normalized_clamps() {
        let q = PaginationQuery { page: 0, size: 500 };
        assert_eq!(q.normalized(), (1, MAX_PAGE_SIZE as u64));

        let q = PaginationQuery { page: 3, size: 0 };
        assert_eq!(q.normalized(), (3, 1));
    }

    #[test]
    fn test_pagination_info_pages() {
        let info = PaginationInfo::new(1, 20, 41);
        assert_eq!(info.total_pages, 3);
        assert_eq!(PaginationInfo::new(1, 20, 0).total_pages, 0);
        assert_eq!(PaginationInfo::new(2, 20, 40).total_pages, 2);
    }

    #[test]
    fn test_query_string_values_are_parsed() {
        let w: Wrapper = serde_json::from_str(r#"{"page":"2","size":"15"}"#).unwrap();
        assert_eq!(w.pagination.page, 2);
        assert_eq!(w.pagination.size, 15);

        let w: Wrapper = serde_json::from_str("{}").unwrap();
        assert_eq!(w.pagination.page, 1);
        assert_eq!(w.pagination.size, 20);
    }
}
