//! 编译模块：将原始 hints 配置编译为规则表
pub mod pattern;
pub mod compiler;

pub use self::pattern::{classify, CompiledPattern, KeyKind};
pub use self::compiler::{escape_hint, extract_placeholders, RuleCompiler};
