//! 资产 key 分类与正则编译
//! 纯标识符 key 走精确匹配，其余 key 按正则全串匹配编译

use once_cell::sync::Lazy;
use regex::{Error as RegexError, Regex};
use regex_syntax::Parser;

use crate::error::{OmfHintError, OmfResult};

/// 资产 key 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// 仅包含 [A-Za-z0-9_]
    Literal,
    /// 含有任何其他字符
    Pattern,
}

/// 判断 key 是精确名称还是正则
pub fn classify(key: &str) -> KeyKind {
    static LITERAL_KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^[A-Za-z0-9_]*$").unwrap()
    });

    if LITERAL_KEY_REGEX.is_match(key) {
        KeyKind::Literal
    } else {
        KeyKind::Pattern
    }
}

/// 编译后的正则模式（全串匹配语义）
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    original: String,
}

impl CompiledPattern {
    /// 编译资产 key
    ///
    /// 先解析为语法树，再将规范化后的正则包裹为 `^(?:…)$` 全串匹配。
    /// 规范化输出不含注释与 `(?x)` 等标志，包裹后语义不变；
    /// 原始 key 语法非法（如 `a)|(b`）时在解析阶段即报错。
    pub fn compile(key: &str) -> OmfResult<Self> {
        let hir = Parser::new()
            .parse(key)
            .map_err(|e| OmfHintError::RegexCompileError(RegexError::Syntax(e.to_string())))?;
        let regex = Regex::new(&format!("^(?:{})$", hir))?;
        Ok(Self {
            regex,
            original: key.to_string(),
        })
    }

    /// 资产名整体匹配（非子串匹配）
    #[inline]
    pub fn is_full_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// 配置中的原始 key
    pub fn original(&self) -> &str {
        &self.original
    }

    /// 规则描述
    pub fn describe(&self) -> &str {
        self.regex.as_str()
    }
}
