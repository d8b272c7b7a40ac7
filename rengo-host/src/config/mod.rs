//! # Config 模块
//!
//! 运行时配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use std::fs;
use std::path::{Path, PathBuf};

use rengo_runtime::RuntimeConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 资源根目录，脚本与素材路径都相对于它解析
    #[serde(default = "default_assets_root")]
    pub assets_root: PathBuf,

    /// 入口脚本路径（相对于 assets_root）
    #[serde(default = "default_start_script_path")]
    pub start_script_path: String,

    /// 图层数量
    #[serde(default = "default_layer_count")]
    pub layer_count: usize,

    /// 窗口配置
    #[serde(default)]
    pub window: WindowConfig,

    /// 文本显示配置
    #[serde(default)]
    pub text: TextConfig,

    /// 特效配置
    #[serde(default)]
    pub effects: EffectConfig,

    /// 解释器配置
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// 调试配置
    #[serde(default)]
    pub debug: DebugConfig,
}

/// 窗口配置
///
/// 无渲染宿主不创建窗口，尺寸只用于选择支菜单排版。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// 窗口宽度
    #[serde(default = "default_window_width")]
    pub width: u32,

    /// 窗口高度
    #[serde(default = "default_window_height")]
    pub height: u32,

    /// 窗口标题
    #[serde(default = "default_window_title")]
    pub title: String,
}

/// 文本显示配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextConfig {
    /// 每显示一个字符间隔的帧数（0 表示立即显示）
    #[serde(default = "default_char_delay_frames")]
    pub char_delay_frames: u32,

    /// 文本框每行最多的字符数
    #[serde(default = "default_max_columns")]
    pub max_columns: usize,
}

/// 特效配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectConfig {
    /// 遮罩过渡每帧推进的进度（0.0 - 1.0）
    #[serde(default = "default_transition_speed")]
    pub transition_speed: f32,
}

/// 调试配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugConfig {
    /// 启动时是否运行脚本检查
    ///
    /// - debug build 默认开启（见 `default_script_check()`）
    /// - 检查结果只输出诊断，不阻塞启动
    #[serde(default = "default_script_check")]
    pub script_check: bool,

    /// 日志级别（trace / debug / info / warn / error / off）
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// 默认值函数
fn default_assets_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_start_script_path() -> String {
    "resource/script/first.rgo".to_string()
}

fn default_layer_count() -> usize {
    5
}

fn default_window_width() -> u32 {
    1280
}

fn default_window_height() -> u32 {
    720
}

fn default_window_title() -> String {
    "Visual Novel Engine".to_string()
}

fn default_char_delay_frames() -> u32 {
    2
}

fn default_max_columns() -> usize {
    40
}

fn default_transition_speed() -> f32 {
    0.01
}

fn default_script_check() -> bool {
    cfg!(debug_assertions)
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_root: default_assets_root(),
            start_script_path: default_start_script_path(),
            layer_count: default_layer_count(),
            window: WindowConfig::default(),
            text: TextConfig::default(),
            effects: EffectConfig::default(),
            runtime: RuntimeConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
            title: default_window_title(),
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            char_delay_frames: default_char_delay_frames(),
            max_columns: default_max_columns(),
        }
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            transition_speed: default_transition_speed(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            script_check: default_script_check(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(config) => {
                info!(path = %path.display(), "配置文件加载成功");
                config
            }
            Err(e) => {
                warn!(error = %e, "配置文件不可用，使用默认配置");
                Self::default()
            }
        }
    }

    /// 加载配置文件，失败时返回原因
    ///
    /// 不写日志，调用方可以在日志初始化之后再报告结果。
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_script_path.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "必须配置 start_script_path（入口脚本路径）".to_string(),
            ));
        }

        if !self.assets_root.exists() {
            return Err(ConfigError::ValidationFailed(format!(
                "资源目录不存在: {}",
                self.assets_root.display()
            )));
        }

        let script = self.start_script_full_path();
        if !script.is_file() {
            return Err(ConfigError::ValidationFailed(format!(
                "入口脚本不存在: {}",
                script.display()
            )));
        }

        if self.layer_count == 0 {
            return Err(ConfigError::ValidationFailed(
                "layer_count 至少为 1".to_string(),
            ));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::ValidationFailed(
                "窗口尺寸必须大于 0".to_string(),
            ));
        }

        if self.text.max_columns == 0 {
            return Err(ConfigError::ValidationFailed(
                "text.max_columns 至少为 1".to_string(),
            ));
        }

        let speed = self.effects.transition_speed;
        if !(speed > 0.0 && speed <= 1.0) {
            return Err(ConfigError::ValidationFailed(
                "过渡速度必须在 (0.0, 1.0] 之间".to_string(),
            ));
        }

        let affection = &self.runtime.affection;
        if affection.min > affection.max {
            return Err(ConfigError::ValidationFailed(format!(
                "好感度下限 {} 大于上限 {}",
                affection.min, affection.max
            )));
        }

        if self.runtime.max_chain_steps == 0 {
            return Err(ConfigError::ValidationFailed(
                "runtime.max_chain_steps 至少为 1".to_string(),
            ));
        }

        self.log_level()?;
        Ok(())
    }

    /// 获取入口脚本完整路径
    pub fn start_script_full_path(&self) -> PathBuf {
        self.assets_root.join(&self.start_script_path)
    }

    /// 解析日志级别
    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        self.debug
            .log_level
            .parse::<LevelFilter>()
            .map_err(|_| ConfigError::InvalidLogLevel(self.debug.log_level.clone()))
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件不存在
    #[error("配置文件不存在: {}", .0.display())]
    NotFound(PathBuf),

    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),

    /// 日志级别无法识别
    #[error("无法识别的日志级别: '{0}'")]
    InvalidLogLevel(String),
}
