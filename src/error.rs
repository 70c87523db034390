//! 全局错误类型定义

use thiserror::Error;
use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;

#[derive(Error, Debug)]
pub enum OmfHintError {
    // 配置相关错误
    /// hints 配置不是合法 JSON，offset 为出错位置的字节偏移
    #[error("Error parsing OMF Hints: {message} at {offset}")]
    HintsParseError { message: String, offset: usize },
    /// hints 配置是合法 JSON，但顶层不是对象
    #[error("Invalid OMF Hints: {0}")]
    InvalidHints(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // 编译相关错误
    #[error("Regex compilation failed: {0}")]
    RegexCompileError(#[from] RegexError),

    // 读数相关错误
    #[error("Reading parse failed: {0}")]
    ReadingParseError(String),

    // 序列化/反序列化错误
    #[error("JSON error: {0}")]
    JsonError(#[from] SerdeJsonError),
}

impl OmfHintError {
    /// 由 serde_json 的解析错误构造，行列号换算为字节偏移
    pub fn hints_parse(source: &str, err: &SerdeJsonError) -> Self {
        Self::HintsParseError {
            message: err.to_string(),
            offset: byte_offset(source, err.line(), err.column()),
        }
    }
}

/// 行列号（均从 1 开始）换算为字节偏移
fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}

// 全局Result类型
pub type OmfResult<T> = Result<T, OmfHintError>;
