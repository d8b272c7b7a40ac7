//! # Command 模块
//!
//! 脚本指令的类型化表示。解析器把 `@` 行转换为 [`ScriptCommand`]，
//! 执行器只处理类型化的指令，不再接触字符串参数。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::affection::AffectionTable;
use crate::choice::Choice;
use crate::display::Transition;

/// 比较运算符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// 无法识别的运算符，比较结果恒为假
    Unknown(String),
}

impl CompareOp {
    /// 比较 `lhs` 与 `rhs`
    pub fn compare(&self, lhs: i32, rhs: i32) -> bool {
        match self {
            Self::Ge => lhs >= rhs,
            Self::Le => lhs <= rhs,
            Self::Gt => lhs > rhs,
            Self::Lt => lhs < rhs,
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
            Self::Unknown(_) => false,
        }
    }
}

impl FromStr for CompareOp {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            ">=" => Self::Ge,
            "<=" => Self::Le,
            ">" => Self::Gt,
            "<" => Self::Lt,
            "==" => Self::Eq,
            "!=" => Self::Ne,
            other => Self::Unknown(other.to_string()),
        })
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ge => write!(f, ">="),
            Self::Le => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::Lt => write!(f, "<"),
            Self::Eq => write!(f, "=="),
            Self::Ne => write!(f, "!="),
            Self::Unknown(op) => write!(f, "{op}"),
        }
    }
}

/// 条件表达式
///
/// 对应 `affection <角色> <运算符> <整数>` 语法。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    /// 好感度比较
    Affection {
        character: String,
        op: CompareOp,
        value: i32,
    },
    /// 无法解析的条件，恒为假
    Invalid { text: String },
}

impl Condition {
    /// 对好感度表求值
    pub fn evaluate(&self, affection: &AffectionTable) -> bool {
        match self {
            Self::Affection {
                character,
                op,
                value,
            } => op.compare(affection.get(character), *value),
            Self::Invalid { .. } => false,
        }
    }
}

/// 脚本指令
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptCommand {
    /// `@bg <layer> <path> [<reserved> <transition> ...]`
    Background {
        layer: usize,
        path: String,
        transition: Option<Transition>,
    },

    /// `@chara <layer> <position> <path>`
    Character {
        layer: usize,
        position: String,
        path: String,
    },

    /// `@choice <text> -> <label> ...`
    Choice { options: Vec<Choice> },

    /// `@affection <character> <delta>`
    Affection { character: String, delta: i32 },

    /// `@if <condition>`
    If { condition: Condition },

    /// `@elseif <condition>`
    ElseIf { condition: Condition },

    /// `@else`
    Else,

    /// `@endif`
    EndIf,

    /// `@jump <label>`
    Jump { label: String },

    /// `@clear <layer>`
    Clear { layer: usize },

    /// 未知指令，记录日志后忽略
    Unknown { name: String },

    /// 参数缺失等无法执行的指令，记录日志后跳过
    Invalid { name: String },
}

impl ScriptCommand {
    /// 指令名
    pub fn name(&self) -> &str {
        match self {
            Self::Background { .. } => "bg",
            Self::Character { .. } => "chara",
            Self::Choice { .. } => "choice",
            Self::Affection { .. } => "affection",
            Self::If { .. } => "if",
            Self::ElseIf { .. } => "elseif",
            Self::Else => "else",
            Self::EndIf => "endif",
            Self::Jump { .. } => "jump",
            Self::Clear { .. } => "clear",
            Self::Unknown { name } | Self::Invalid { name } => name,
        }
    }

    /// 是否是条件分支标记
    pub fn is_branch_marker(&self) -> bool {
        matches!(
            self,
            Self::If { .. } | Self::ElseIf { .. } | Self::Else | Self::EndIf
        )
    }

    /// 该指令引用的跳转目标
    pub fn jump_targets(&self) -> Vec<&str> {
        match self {
            Self::Jump { label } => vec![label.as_str()],
            Self::Choice { options } => options
                .iter()
                .map(|opt| opt.target_label.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }
}
