//! 读数数据模型定义
//! 资产名 + 有序数据点列表，支持 JSON 序列化/反序列化

use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::OmfHintError;

/// 过滤器附加的数据点名称
pub const OMF_HINT_DATAPOINT: &str = "OMFHint";

/// 数据点取值（封闭枚举，不做运行时类型探测）
#[derive(Debug, Clone, PartialEq)]
pub enum DatapointValue {
    String(String),
    Integer(i64),
    Float(f64),
    /// 其他类型：结构化数据、数组、二进制/图像载荷等
    Other(Value),
}

impl DatapointValue {
    /// 类型名称（用于日志输出）
    pub fn type_name(&self) -> &'static str {
        match self {
            DatapointValue::String(_) => "string",
            DatapointValue::Integer(_) => "integer",
            DatapointValue::Float(_) => "float",
            DatapointValue::Other(_) => "other",
        }
    }
}

impl From<Value> for DatapointValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => DatapointValue::String(s),
            Value::Number(n) => match n.as_i64() {
                Some(i) => DatapointValue::Integer(i),
                None => match n.as_f64() {
                    Some(f) => DatapointValue::Float(f),
                    None => DatapointValue::Other(Value::Number(n)),
                },
            },
            other => DatapointValue::Other(other),
        }
    }
}

impl From<DatapointValue> for Value {
    fn from(value: DatapointValue) -> Self {
        match value {
            DatapointValue::String(s) => Value::String(s),
            DatapointValue::Integer(i) => Value::Number(i.into()),
            // NaN/无穷大无法用 JSON 表示
            DatapointValue::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
            DatapointValue::Other(v) => v,
        }
    }
}

impl From<&str> for DatapointValue {
    fn from(s: &str) -> Self {
        DatapointValue::String(s.to_string())
    }
}

impl From<String> for DatapointValue {
    fn from(s: String) -> Self {
        DatapointValue::String(s)
    }
}

impl From<i64> for DatapointValue {
    fn from(i: i64) -> Self {
        DatapointValue::Integer(i)
    }
}

impl From<f64> for DatapointValue {
    fn from(f: f64) -> Self {
        DatapointValue::Float(f)
    }
}

/// 数据点
#[derive(Debug, Clone, PartialEq)]
pub struct Datapoint {
    pub name: String,
    pub value: DatapointValue,
}

impl Datapoint {
    pub fn new(name: impl Into<String>, value: impl Into<DatapointValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// 按名称查找数据点（占位符替换时使用）
pub trait DatapointLookup {
    fn datapoint(&self, name: &str) -> Option<&DatapointValue>;
}

/// 传感器读数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReadingJson", into = "ReadingJson")]
pub struct Reading {
    pub asset_name: String,
    pub datapoints: Vec<Datapoint>,
}

impl Reading {
    pub fn new(asset_name: impl Into<String>, datapoints: Vec<Datapoint>) -> Self {
        Self {
            asset_name: asset_name.into(),
            datapoints,
        }
    }

    pub fn asset_name(&self) -> &str {
        &self.asset_name
    }

    /// 追加数据点（不删除、不重排已有数据点）
    pub fn add_datapoint(&mut self, datapoint: Datapoint) {
        self.datapoints.push(datapoint);
    }

    pub fn datapoint_count(&self) -> usize {
        self.datapoints.len()
    }

    /// 从 JSON 文本解析读数
    pub fn from_json_str(s: &str) -> Result<Self, OmfHintError> {
        let raw: ReadingJson = serde_json::from_str(s)?;
        Self::try_from(raw)
    }
}

impl DatapointLookup for Reading {
    /// 同名数据点取第一个
    fn datapoint(&self, name: &str) -> Option<&DatapointValue> {
        self.datapoints
            .iter()
            .find(|dp| dp.name == name)
            .map(|dp| &dp.value)
    }
}

impl<S: std::hash::BuildHasher> DatapointLookup for std::collections::HashMap<String, DatapointValue, S> {
    fn datapoint(&self, name: &str) -> Option<&DatapointValue> {
        self.get(name)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} datapoints)", self.asset_name, self.datapoints.len())
    }
}

/// 读数的 JSON 表示：{"asset_code": "...", "reading": {...}}
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReadingJson {
    asset_code: String,
    #[serde(default)]
    reading: Map<String, Value>,
}

impl TryFrom<ReadingJson> for Reading {
    type Error = OmfHintError;

    fn try_from(raw: ReadingJson) -> Result<Self, Self::Error> {
        if raw.asset_code.is_empty() {
            return Err(OmfHintError::ReadingParseError("empty asset_code".to_string()));
        }
        let datapoints = raw
            .reading
            .into_iter()
            .map(|(name, value)| Datapoint::new(name, DatapointValue::from(value)))
            .collect();
        Ok(Reading::new(raw.asset_code, datapoints))
    }
}

impl From<Reading> for ReadingJson {
    fn from(reading: Reading) -> Self {
        let mut map = Map::with_capacity(reading.datapoints.len());
        for dp in reading.datapoints {
            map.insert(dp.name, Value::from(dp.value));
        }
        ReadingJson {
            asset_code: reading.asset_name,
            reading: map,
        }
    }
}
