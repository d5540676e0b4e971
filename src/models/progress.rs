use serde::{Deserialize, Deserializer};
use std::fmt;

/// 接口返回的原始学时数值
///
/// 门户接口返回的学时可能是数字，也可能是字符串（甚至是 "N/A" 之类无法解析的值），
/// 因此保留原始文本，需要比较时再尝试解析。无法解析时视为"未知"，而不是 0。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoursValue(String);

impl HoursValue {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// 解析为学时数，无法解析时返回 `None`
    pub fn as_hours(&self) -> Option<f64> {
        self.0
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|hours| hours.is_finite())
    }
}

impl fmt::Display for HoursValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "未知")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<&str> for HoursValue {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

// 学时既可能是数字也可能是字符串，统一保存为文本
impl<'de> Deserialize<'de> for HoursValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;

        struct HoursVisitor;

        impl<'de> Visitor<'de> for HoursVisitor {
            type Value = HoursValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number, a string or null")
            }

            fn visit_str<E>(self, value: &str) -> Result<HoursValue, E>
            where
                E: serde::de::Error,
            {
                Ok(HoursValue::new(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<HoursValue, E>
            where
                E: serde::de::Error,
            {
                Ok(HoursValue::new(value.to_string()))
            }

            fn visit_u64<E>(self, value: u64) -> Result<HoursValue, E>
            where
                E: serde::de::Error,
            {
                Ok(HoursValue::new(value.to_string()))
            }

            fn visit_f64<E>(self, value: f64) -> Result<HoursValue, E>
            where
                E: serde::de::Error,
            {
                Ok(HoursValue::new(value.to_string()))
            }

            fn visit_unit<E>(self) -> Result<HoursValue, E>
            where
                E: serde::de::Error,
            {
                Ok(HoursValue::default())
            }

            fn visit_none<E>(self) -> Result<HoursValue, E>
            where
                E: serde::de::Error,
            {
                Ok(HoursValue::default())
            }
        }

        deserializer.deserialize_any(HoursVisitor)
    }
}

/// 学习进度快照，每次查询都重新获取
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudyProgress {
    /// 总学时
    #[serde(default, alias = "totalHours", alias = "total")]
    pub total_hours: HoursValue,
    /// 已完成学时
    #[serde(default, alias = "completedHours", alias = "completed")]
    pub completed_hours: HoursValue,
    /// 完成百分比
    #[serde(default, alias = "progress")]
    pub percentage: HoursValue,
}

impl StudyProgress {
    pub fn new(
        total_hours: impl Into<HoursValue>,
        completed_hours: impl Into<HoursValue>,
        percentage: impl Into<HoursValue>,
    ) -> Self {
        Self {
            total_hours: total_hours.into(),
            completed_hours: completed_hours.into(),
            percentage: percentage.into(),
        }
    }

    /// 已完成学时（可解析时）
    pub fn completed(&self) -> Option<f64> {
        self.completed_hours.as_hours()
    }
}
