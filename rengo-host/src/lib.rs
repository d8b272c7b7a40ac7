//! # RenGO Host
//!
//! RenGO 的无渲染宿主层。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 加载与校验配置
//! - 帧循环与输入采集（由自动输入策略模拟）
//! - 将解释器下发的显示指令转换为图层与文本状态
//! - 特效推进
//!
//! Host 层不包含脚本逻辑，只负责执行解释器发出的指令。

pub mod check;
pub mod config;
pub mod display;
pub mod driver;
pub mod effects;
pub mod render_state;
pub mod text;

pub use check::{check_program, check_script_file, log_diagnostics};
pub use config::{AppConfig, ConfigError, DebugConfig, EffectConfig, TextConfig, WindowConfig};
pub use display::HeadlessDisplay;
pub use driver::{AutoInput, Driver, RunSummary};
pub use effects::{Effect, EffectSystem, MaskTransition};
pub use render_state::{ChoiceMenu, Layer, Rect, RenderState};
pub use text::{TextReveal, layout_lines};
