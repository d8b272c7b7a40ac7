//! # Display 模块
//!
//! 无渲染显示端：把解释器下发的 [`DisplayCommand`] 转换为 [`RenderState`] 更新。
//!
//! ## 设计说明
//!
//! - 显示端不直接渲染，只更新状态
//! - 素材只检查是否存在，不解码
//! - 过渡效果交给 [`EffectSystem`]，每帧由 [`HeadlessDisplay::update`] 推进

use std::path::{Path, PathBuf};

use rengo_runtime::{DisplayCommand, DisplayError, DisplaySink, RuntimeError, Transition};
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::effects::{EffectSystem, MASK_TRANSITION, MaskTransition};
use crate::render_state::RenderState;

/// 无渲染显示端
#[derive(Debug)]
pub struct HeadlessDisplay {
    pub render_state: RenderState,
    pub effects: EffectSystem,
    assets_root: PathBuf,
    transition_speed: f32,
}

impl HeadlessDisplay {
    /// 按应用配置创建显示端
    pub fn new(config: &AppConfig) -> Self {
        Self {
            render_state: RenderState::new(
                config.layer_count,
                config.window.width,
                config.text.char_delay_frames,
                config.text.max_columns,
            ),
            effects: EffectSystem::new(),
            assets_root: config.assets_root.clone(),
            transition_speed: config.effects.transition_speed,
        }
    }

    /// 资源根目录
    pub fn assets_root(&self) -> &Path {
        &self.assets_root
    }

    /// 推进一帧：逐字显示与特效
    pub fn update(&mut self) {
        self.render_state.text.update();
        self.effects.update(&mut self.render_state);
    }

    /// 检查素材是否存在
    fn check_asset(&self, path: &str) -> Result<(), DisplayError> {
        let full_path = self.assets_root.join(path);
        if full_path.is_file() {
            Ok(())
        } else {
            Err(DisplayError::Asset {
                path: path.to_string(),
                message: format!("文件不存在: {}", full_path.display()),
            })
        }
    }

    fn set_image(
        &mut self,
        layer: usize,
        path: &str,
        transition: Option<&Transition>,
    ) -> Result<(), DisplayError> {
        self.check_asset(path)?;

        // 过渡的起点是目标图层自己的当前背景
        let from = self
            .render_state
            .layer(layer)
            .ok_or(RuntimeError::LayerOutOfRange {
                index: layer,
                count: self.render_state.layer_count(),
            })?
            .image
            .clone();

        if let Some(transition) = transition {
            self.start_transition(layer, from, transition);
        }

        self.render_state.set_image(layer, path)?;
        debug!(layer, path, "设置背景");
        Ok(())
    }

    /// 根据过渡描述启动特效
    ///
    /// 遮罩缺失只记录警告，背景照常切换。
    fn start_transition(&mut self, layer: usize, from: Option<String>, transition: &Transition) {
        if transition.name != MASK_TRANSITION {
            warn!(name = %transition.name, "未知过渡效果，直接切换");
            return;
        }

        let Some(mask) = transition.get_positional(0) else {
            warn!("遮罩过渡缺少遮罩参数，直接切换");
            return;
        };

        if let Err(e) = self.check_asset(mask) {
            warn!(error = %e, "遮罩加载失败，直接切换");
            return;
        }

        self.effects.add(MaskTransition::new(
            layer,
            mask,
            from,
            self.transition_speed,
        ));
    }
}

impl DisplaySink for HeadlessDisplay {
    fn execute(&mut self, command: &DisplayCommand) -> Result<(), DisplayError> {
        match command {
            DisplayCommand::ShowText { content } => {
                self.render_state.text.set_text(content.as_str());
            }
            DisplayCommand::SetImage {
                layer,
                path,
                transition,
            } => {
                self.set_image(*layer, path, transition.as_ref())?;
            }
            DisplayCommand::SetCharacter {
                layer,
                position,
                path,
            } => {
                self.check_asset(path)?;
                self.render_state
                    .set_character(*layer, position.as_str(), path.as_str())?;
            }
            DisplayCommand::ClearLayer { layer } => {
                self.render_state.clear_layer(*layer)?;
            }
            DisplayCommand::PresentChoices { choices } => {
                self.render_state.show_choices(choices.clone());
            }
            DisplayCommand::HideChoices => {
                self.render_state.hide_choices();
            }
        }
        Ok(())
    }

    fn is_text_ready(&self) -> bool {
        self.render_state.text.is_ready()
    }

    fn complete_text(&mut self) {
        self.render_state.text.complete();
    }
}
