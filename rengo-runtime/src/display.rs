//! # Display 模块
//!
//! 定义解释器向显示端发出的指令，以及显示端需要实现的接口。
//!
//! ## 设计原则
//!
//! - **声明式**：[`DisplayCommand`] 描述"做什么"，不描述"怎么做"
//! - **引擎无关**：不包含任何图像、字体或窗口类型
//! - 显示端只通过 [`DisplaySink::is_text_ready`] 这一个布尔量反向影响解释器

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::choice::Choice;
use crate::error::{DisplayError, RuntimeError};

/// 过渡效果
///
/// 解析器只负责提取，不解释具体语义，参数按原样透传给显示端。
///
/// # 示例
///
/// ```text
/// @bg 0 room.png rule.png transition   -> Transition { name: "transition", args: ["rule.png"] }
/// @bg 0 room.png - fade 0.5            -> Transition { name: "fade", args: ["-", "0.5"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// 效果名称（大小写敏感）
    pub name: String,
    /// 位置参数：第一个是保留位（通常是遮罩图），其后为额外参数
    pub args: Vec<String>,
}

impl Transition {
    /// 创建无参数的过渡效果
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// 创建带位置参数的过渡效果
    pub fn with_args(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// 获取位置参数（按索引）
    pub fn get_positional(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

/// 解释器向显示端发出的指令
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayCommand {
    /// 显示对话文本（原样，说话人标记由显示端排版时处理）
    ShowText { content: String },

    /// 设置图层背景图
    SetImage {
        layer: usize,
        path: String,
        transition: Option<Transition>,
    },

    /// 设置图层立绘
    SetCharacter {
        layer: usize,
        position: String,
        path: String,
    },

    /// 清除图层的背景图与立绘
    ClearLayer { layer: usize },

    /// 显示选择支
    PresentChoices { choices: Vec<Choice> },

    /// 关闭选择支
    HideChoices,
}

/// 显示端接口
///
/// 每次调用都由解释器显式传入，解释器不持有显示端。
pub trait DisplaySink {
    /// 执行一条显示指令
    ///
    /// 素材加载失败返回 [`DisplayError::Asset`]，图层越界返回
    /// [`RuntimeError::LayerOutOfRange`]。解释器记录日志后继续执行。
    fn execute(&mut self, command: &DisplayCommand) -> Result<(), DisplayError>;

    /// 当前文本是否已完全显示
    fn is_text_ready(&self) -> bool;

    /// 立即显示完整文本
    fn complete_text(&mut self);
}

/// 记录型显示端
///
/// 不做任何渲染，只记录收到的指令，用于测试和无渲染环境。
#[derive(Debug, Clone)]
pub struct RecordingDisplay {
    /// 按顺序收到的指令
    pub commands: Vec<DisplayCommand>,
    /// 图层数量
    pub layer_count: usize,
    /// 视为加载失败的素材路径
    pub missing_assets: HashSet<String>,
    /// 新文本是否立即就绪（false 时模拟逐字显示）
    pub instant_text: bool,
    text_ready: bool,
}

impl RecordingDisplay {
    /// 创建记录型显示端，文本立即就绪
    pub fn new(layer_count: usize) -> Self {
        Self {
            commands: Vec::new(),
            layer_count,
            missing_assets: HashSet::new(),
            instant_text: true,
            text_ready: true,
        }
    }

    /// 标记某个素材为加载失败
    pub fn with_missing_asset(mut self, path: impl Into<String>) -> Self {
        self.missing_assets.insert(path.into());
        self
    }

    /// 模拟逐字显示：新文本需要一次 `complete_text` 才就绪
    pub fn with_slow_text(mut self) -> Self {
        self.instant_text = false;
        self
    }

    /// 收到过的全部对话文本
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DisplayCommand::ShowText { content } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }

    /// 最近一次显示的对话文本
    pub fn last_text(&self) -> Option<&str> {
        self.texts().last().copied()
    }

    fn check_layer(&self, layer: usize) -> Result<(), RuntimeError> {
        if layer >= self.layer_count {
            return Err(RuntimeError::LayerOutOfRange {
                index: layer,
                count: self.layer_count,
            });
        }
        Ok(())
    }

    fn check_asset(&self, path: &str) -> Result<(), DisplayError> {
        if self.missing_assets.contains(path) {
            return Err(DisplayError::Asset {
                path: path.to_string(),
                message: "文件不存在".to_string(),
            });
        }
        Ok(())
    }
}

impl DisplaySink for RecordingDisplay {
    fn execute(&mut self, command: &DisplayCommand) -> Result<(), DisplayError> {
        match command {
            DisplayCommand::SetImage { layer, path, .. }
            | DisplayCommand::SetCharacter { layer, path, .. } => {
                self.check_layer(*layer)?;
                self.check_asset(path)?;
            }
            DisplayCommand::ClearLayer { layer } => self.check_layer(*layer)?,
            DisplayCommand::ShowText { .. } => self.text_ready = self.instant_text,
            DisplayCommand::PresentChoices { .. } | DisplayCommand::HideChoices => {}
        }
        self.commands.push(command.clone());
        Ok(())
    }

    fn is_text_ready(&self) -> bool {
        self.text_ready
    }

    fn complete_text(&mut self) {
        self.text_ready = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_positional() {
        let t = Transition::with_args("transition", vec!["rule.png".to_string()]);
        assert_eq!(t.get_positional(0), Some("rule.png"));
        assert_eq!(t.get_positional(1), None);
        assert!(Transition::simple("fade").args.is_empty());
    }

    #[test]
    fn test_recording_display_layer_bounds() {
        let mut display = RecordingDisplay::new(2);
        assert!(display.execute(&DisplayCommand::ClearLayer { layer: 1 }).is_ok());
        assert_eq!(
            display.execute(&DisplayCommand::ClearLayer { layer: 2 }),
            Err(DisplayError::Runtime(RuntimeError::LayerOutOfRange {
                index: 2,
                count: 2
            }))
        );
        assert_eq!(display.commands.len(), 1);
    }

    #[test]
    fn test_recording_display_missing_asset() {
        let mut display = RecordingDisplay::new(1).with_missing_asset("gone.png");
        let result = display.execute(&DisplayCommand::SetImage {
            layer: 0,
            path: "gone.png".to_string(),
            transition: None,
        });
        assert!(matches!(result, Err(DisplayError::Asset { path, .. }) if path == "gone.png"));
        assert!(display.commands.is_empty());
    }

    #[test]
    fn test_recording_display_slow_text() {
        let mut display = RecordingDisplay::new(1).with_slow_text();
        display
            .execute(&DisplayCommand::ShowText {
                content: "你好".to_string(),
            })
            .unwrap();
        assert!(!display.is_text_ready());
        display.complete_text();
        assert!(display.is_text_ready());
        assert_eq!(display.last_text(), Some("你好"));
    }

    #[test]
    fn test_display_command_serialization() {
        let cmd = DisplayCommand::SetCharacter {
            layer: 1,
            position: "left".to_string(),
            path: "yuki.png".to_string(),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        let deserialized: DisplayCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, deserialized);
    }
}
