//! # Error 模块
//!
//! 定义 rengo-runtime 中使用的错误类型。
//!
//! ## 错误分级
//!
//! - [`LoadError`]：脚本文件无法读取，启动阶段致命，向调用方传播
//! - [`DisplayError`]：显示端执行失败（素材加载失败、图层越界），记录日志后继续
//! - [`ScriptSyntaxError`]：指令参数格式错误，局部恢复并记录日志，不中断执行
//! - [`RuntimeError`]：标签未找到、选择索引非法等运行期错误

use std::path::PathBuf;

use thiserror::Error;

/// 脚本加载错误
#[derive(Error, Debug)]
pub enum LoadError {
    /// 脚本文件无法打开或读取
    #[error("无法读取脚本文件 '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 指令语法错误
///
/// 解析阶段遇到的所有格式问题都会被截断恢复，错误本身只用于日志和诊断。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptSyntaxError {
    /// `@` 后没有指令名
    #[error("空指令")]
    EmptyCommand,

    /// 缺少必需参数
    #[error("指令 '{command}' 缺少参数 '{param}'")]
    MissingArgument { command: String, param: String },

    /// 图层索引不是非负整数
    #[error("指令 '{command}' 的图层索引无效: '{value}'")]
    InvalidLayer { command: String, value: String },

    /// 选择支三元组格式错误（缺少 `->` 或不完整）
    #[error("选项格式错误（第 {group} 组）: {message}")]
    MalformedChoice { group: usize, message: String },

    /// 整数参数无效，按 0 处理
    #[error("参数 '{param}' 不是整数: '{value}'，按 0 处理")]
    InvalidInteger { param: String, value: String },

    /// 条件表达式不完整
    #[error("条件表达式不完整: '{condition}'")]
    IncompleteCondition { condition: String },

    /// 条件主语不受支持（目前只支持 affection）
    #[error("不支持的条件类型 '{subject}'")]
    UnknownConditionSubject { subject: String },

    /// 未知的比较运算符，条件恒为假
    #[error("未知的比较运算符 '{operator}'，条件视为不成立")]
    UnknownOperator { operator: String },
}

/// 运行时错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// 标签未找到
    #[error("标签 '{label}' 未找到")]
    LabelNotFound { label: String },

    /// 无效的选择索引
    #[error("无效的选择索引 {index}，有效范围是 0..{max}")]
    InvalidChoiceIndex { index: usize, max: usize },

    /// 状态不匹配
    #[error("当前状态不允许此操作：期望 {expected}，实际 {actual}")]
    StateMismatch { expected: String, actual: String },

    /// 图层索引越界
    #[error("图层索引 {index} 越界（共 {count} 层）")]
    LayerOutOfRange { index: usize, count: usize },
}

/// 显示端错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// 素材加载失败
    #[error("素材加载失败 '{path}': {message}")]
    Asset { path: String, message: String },

    /// 图层等运行期错误
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// rengo-runtime 统一错误类型
#[derive(Error, Debug)]
pub enum VnError {
    /// 加载错误
    #[error("加载错误: {0}")]
    Load(#[from] LoadError),

    /// 语法错误
    #[error("语法错误: {0}")]
    Syntax(#[from] ScriptSyntaxError),

    /// 运行时错误
    #[error("运行时错误: {0}")]
    Runtime(#[from] RuntimeError),

    /// 显示端错误
    #[error("显示错误: {0}")]
    Display(#[from] DisplayError),
}

/// Result 类型别名
pub type VnResult<T> = Result<T, VnError>;
