//! # Effects 模块
//!
//! 视觉特效。每种特效实现 [`Effect`]：每帧推进一次，并把当前进度写回渲染状态。
//!
//! 目前只有遮罩过渡 [`MaskTransition`]，由 `@bg ... <mask> transition` 触发。

use std::fmt;

use tracing::debug;

use crate::render_state::{RenderState, TransitionOverlay};

/// 触发遮罩过渡的效果名
pub const MASK_TRANSITION: &str = "transition";

/// 特效接口
pub trait Effect: fmt::Debug {
    /// 特效名称（用于日志）
    fn name(&self) -> &str;

    /// 推进一帧，返回是否已完成
    fn advance(&mut self) -> bool;

    /// 把当前状态写入渲染状态
    fn render(&self, state: &mut RenderState);

    /// 特效结束后的清理
    fn finish(&self, state: &mut RenderState) {
        let _ = state;
    }
}

/// 遮罩过渡：按遮罩图从旧背景渐变到新背景
#[derive(Debug, Clone, PartialEq)]
pub struct MaskTransition {
    layer: usize,
    mask: String,
    from: Option<String>,
    progress: f32,
    speed: f32,
}

impl MaskTransition {
    /// 创建遮罩过渡
    ///
    /// `from` 为过渡开始前该图层的背景。
    pub fn new(layer: usize, mask: impl Into<String>, from: Option<String>, speed: f32) -> Self {
        Self {
            layer,
            mask: mask.into(),
            from,
            progress: 0.0,
            speed,
        }
    }

    /// 当前进度（0.0 - 1.0）
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// 作用的图层
    pub fn layer(&self) -> usize {
        self.layer
    }
}

impl Effect for MaskTransition {
    fn name(&self) -> &str {
        MASK_TRANSITION
    }

    fn advance(&mut self) -> bool {
        self.progress += self.speed;
        if self.progress >= 1.0 {
            self.progress = 1.0;
            return true;
        }
        false
    }

    fn render(&self, state: &mut RenderState) {
        if let Some(layer) = state.layer_mut(self.layer) {
            layer.overlay = Some(TransitionOverlay {
                mask: self.mask.clone(),
                from: self.from.clone(),
                progress: self.progress,
            });
        }
    }

    fn finish(&self, state: &mut RenderState) {
        if let Some(layer) = state.layer_mut(self.layer) {
            layer.overlay = None;
        }
    }
}

/// 特效系统：管理所有进行中的特效
#[derive(Debug, Default)]
pub struct EffectSystem {
    effects: Vec<Box<dyn Effect + Send>>,
}

impl EffectSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加特效
    pub fn add(&mut self, effect: impl Effect + Send + 'static) {
        debug!(effect = effect.name(), "添加特效");
        self.effects.push(Box::new(effect));
    }

    /// 推进所有特效一帧，移除已完成的特效
    pub fn update(&mut self, state: &mut RenderState) {
        self.effects.retain_mut(|effect| {
            let finished = effect.advance();
            if finished {
                effect.finish(state);
                debug!(effect = effect.name(), "特效完成");
            } else {
                effect.render(state);
            }
            !finished
        });
    }

    /// 是否还有进行中的特效
    pub fn has_active_effects(&self) -> bool {
        !self.effects.is_empty()
    }

    /// 进行中的特效数量
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
