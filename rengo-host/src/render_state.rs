//! # RenderState 模块
//!
//! 定义渲染状态：图层、对话框与选择支菜单。
//!
//! 无渲染宿主不绘制像素，只维护"此刻屏幕上应该有什么"，供测试与日志检查。

use rengo_runtime::{Choice, RuntimeError};

use crate::text::{TextReveal, layout_lines};

/// 选择支按钮起始 Y 坐标
const CHOICE_TOP: i32 = 100;
/// 估算的单字符宽度（像素）
const CHAR_WIDTH: i32 = 16;
/// 估算的单行高度（像素）
const LINE_HEIGHT: i32 = 24;
/// 按钮水平内边距
const CHOICE_PADDING_X: i32 = 10;
/// 按钮竖直内边距
const CHOICE_PADDING_Y: i32 = 5;
/// 按钮间距
const CHOICE_GAP: i32 = 20;

/// 立绘
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSprite {
    /// 位置名（left / center / right 等，由脚本给出）
    pub position: String,
    /// 素材路径
    pub path: String,
}

/// 遮罩过渡在图层上的叠加状态
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOverlay {
    /// 遮罩素材路径
    pub mask: String,
    /// 过渡前的背景
    pub from: Option<String>,
    /// 进度（0.0 - 1.0）
    pub progress: f32,
}

/// 单个图层：最多一张背景和一张立绘
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    pub image: Option<String>,
    pub character: Option<CharacterSprite>,
    pub overlay: Option<TransitionOverlay>,
}

impl Layer {
    /// 图层上是否有内容
    pub fn is_visible(&self) -> bool {
        self.image.is_some() || self.character.is_some()
    }

    fn clear(&mut self) {
        self.image = None;
        self.character = None;
        self.overlay = None;
    }
}

/// 矩形区域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// 点是否落在矩形内（含边界）
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// 选择支菜单
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceMenu {
    pub choices: Vec<Choice>,
    /// 每个选项按钮的位置，水平居中、自上而下排列
    pub rects: Vec<Rect>,
}

impl ChoiceMenu {
    /// 按屏幕宽度排版
    pub fn layout(choices: Vec<Choice>, screen_width: u32) -> Self {
        let screen_width = i32::try_from(screen_width).unwrap_or(i32::MAX);
        let mut y = CHOICE_TOP;
        let rects = choices
            .iter()
            .map(|choice| {
                let chars = i32::try_from(choice.text.chars().count()).unwrap_or(i32::MAX);
                let text_width = chars.saturating_mul(CHAR_WIDTH);
                let x = (screen_width - text_width) / 2;
                let rect = Rect {
                    x: x - CHOICE_PADDING_X,
                    y,
                    width: text_width + CHOICE_PADDING_X * 2,
                    height: LINE_HEIGHT + CHOICE_PADDING_Y * 2,
                };
                y += LINE_HEIGHT + CHOICE_GAP;
                rect
            })
            .collect();
        Self { choices, rects }
    }

    /// 命中测试：返回鼠标所在的选项
    pub fn hit_test(&self, x: i32, y: i32) -> Option<usize> {
        self.rects.iter().position(|rect| rect.contains(x, y))
    }
}

/// 渲染状态
#[derive(Debug, Clone)]
pub struct RenderState {
    layers: Vec<Layer>,
    /// 当前持有背景的图层
    active_image_layer: Option<usize>,
    /// 当前持有立绘的图层
    active_character_layer: Option<usize>,
    /// 对话框文本
    pub text: TextReveal,
    /// 对话框每行字符数
    pub max_columns: usize,
    /// 选择支菜单（None 表示未显示）
    pub choice_menu: Option<ChoiceMenu>,
    screen_width: u32,
}

impl RenderState {
    /// 创建渲染状态
    pub fn new(layer_count: usize, screen_width: u32, char_delay: u32, max_columns: usize) -> Self {
        Self {
            layers: vec![Layer::default(); layer_count],
            active_image_layer: None,
            active_character_layer: None,
            text: TextReveal::new(char_delay),
            max_columns,
            choice_menu: None,
            screen_width,
        }
    }

    /// 图层数量
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// 获取图层
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// 获取图层（可写）
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    /// 全部图层
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    fn check_layer(&self, index: usize) -> Result<(), RuntimeError> {
        if index >= self.layers.len() {
            return Err(RuntimeError::LayerOutOfRange {
                index,
                count: self.layers.len(),
            });
        }
        Ok(())
    }

    /// 设置背景
    ///
    /// 先清除上一次持有背景的图层，同一时刻只有一个图层显示背景。
    pub fn set_image(&mut self, index: usize, path: impl Into<String>) -> Result<(), RuntimeError> {
        self.check_layer(index)?;
        if let Some(prev) = self.active_image_layer.and_then(|i| self.layers.get_mut(i)) {
            prev.image = None;
        }
        self.layers[index].image = Some(path.into());
        self.active_image_layer = Some(index);
        Ok(())
    }

    /// 设置立绘
    ///
    /// 与背景相同，先清除上一次持有立绘的图层。
    pub fn set_character(
        &mut self,
        index: usize,
        position: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<(), RuntimeError> {
        self.check_layer(index)?;
        if let Some(prev) = self.active_character_layer.and_then(|i| self.layers.get_mut(i)) {
            prev.character = None;
        }
        self.layers[index].character = Some(CharacterSprite {
            position: position.into(),
            path: path.into(),
        });
        self.active_character_layer = Some(index);
        Ok(())
    }

    /// 清除图层的背景与立绘
    pub fn clear_layer(&mut self, index: usize) -> Result<(), RuntimeError> {
        self.check_layer(index)?;
        self.layers[index].clear();
        Ok(())
    }

    /// 显示选择支
    pub fn show_choices(&mut self, choices: Vec<Choice>) {
        self.choice_menu = Some(ChoiceMenu::layout(choices, self.screen_width));
    }

    /// 关闭选择支
    pub fn hide_choices(&mut self) {
        self.choice_menu = None;
    }

    /// 对话框当前可见内容（已排版）
    pub fn text_lines(&self) -> Vec<String> {
        layout_lines(self.text.visible_text(), self.max_columns)
    }
}
