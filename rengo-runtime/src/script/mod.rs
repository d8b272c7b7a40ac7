//! # Script 模块
//!
//! 脚本源的加载、行分类与指令解析。

pub mod command;
pub mod parser;
pub mod program;

pub use command::{CompareOp, Condition, ScriptCommand};
pub use parser::{ParsedCommand, parse_command, parse_condition};
pub use program::{ScriptLine, ScriptProgram};
