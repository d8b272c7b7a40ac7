//! # Runtime 模块
//!
//! 解释器核心，负责逐步执行脚本和维护分支状态。
//!
//! ## 模块结构
//!
//! - [`engine`]：解释器与步进协议
//! - [`executor`]：类型化指令到显示指令的转换
//! - [`branch`]：条件分支的跳过扫描

pub mod branch;
pub mod engine;
pub mod executor;

pub use engine::Interpreter;
pub use executor::{ExecuteResult, Executor};
