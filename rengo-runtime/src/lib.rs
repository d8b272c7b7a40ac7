//! # RenGO Runtime
//!
//! RenGO 视觉小说引擎的脚本解释器。
//!
//! ## 架构概述
//!
//! `rengo-runtime` 是纯逻辑核心，除了读取脚本文件外不做任何 IO，也不依赖渲染。
//! 驱动端每帧调用一次 [`Interpreter::execute_step`]，解释器通过 [`DisplaySink`]
//! 下发显示指令，显示端只通过文本就绪标志反向影响解释器：
//!
//! ```text
//! Driver                        Interpreter                    DisplaySink
//!   │── handle_input(input) ────►│                                │
//!   │── execute_step(display) ──►│── execute(DisplayCommand) ────►│
//!   │                            │◄── is_text_ready() ────────────│
//!   │◄── bool（是否未结束）──────│                                │
//! ```
//!
//! ## 脚本格式
//!
//! ```text
//! -- 注释
//! :label
//! @bg 0 bg/room.png
//! Yuki: 早上好。
//! @choice 去公园 -> park 回家 -> home
//! ```
//!
//! ## 使用示例
//!
//! ```ignore
//! use rengo_runtime::{Interpreter, RecordingDisplay, RuntimeConfig, RuntimeInput};
//!
//! let mut interpreter = Interpreter::new(RuntimeConfig::default());
//! interpreter.load_script("resource/script/first.rgo")?;
//! let mut display = RecordingDisplay::new(5);
//!
//! while interpreter.execute_step(&mut display) {
//!     interpreter.handle_input(RuntimeInput::Click, &mut display)?;
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`script`]：脚本加载与指令解析
//! - [`runtime`]：解释器与分支状态机
//! - [`affection`]：好感度表
//! - [`choice`]：选择支注册表
//! - [`display`]：显示端接口
//! - [`diagnostic`]：脚本静态检查
//! - [`error`]：错误类型定义

pub mod affection;
pub mod choice;
pub mod config;
pub mod diagnostic;
pub mod display;
pub mod error;
pub mod input;
pub mod runtime;
pub mod script;
pub mod state;

// 重导出核心类型
pub use affection::AffectionTable;
pub use choice::{Choice, ChoiceRegistry};
pub use config::{AffectionConfig, BranchScan, RuntimeConfig};
pub use diagnostic::{
    AssetKind, AssetReference, Diagnostic, DiagnosticLevel, DiagnosticResult, JumpTarget,
    analyze_program, asset_references, defined_labels, jump_targets,
};
pub use display::{DisplayCommand, DisplaySink, RecordingDisplay, Transition};
pub use error::{DisplayError, LoadError, RuntimeError, ScriptSyntaxError, VnError, VnResult};
pub use input::{InputOutcome, RuntimeInput};
pub use runtime::Interpreter;
pub use script::{ScriptCommand, ScriptProgram, parse_command};
pub use state::{ExecutionCursor, SuspendState};
