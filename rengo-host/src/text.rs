//! # Text 模块
//!
//! 对话文本的逐字显示与排版。
//!
//! 解释器只关心 [`TextReveal::is_ready`]：文本未完全显示时，点击只补全文本，
//! 不会让脚本继续执行。

/// 逐字显示状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextReveal {
    text: String,
    /// 文本总字符数
    total_chars: usize,
    /// 已显示的字符数
    revealed: usize,
    /// 每个字符之间的帧数
    char_delay: u32,
    frame_count: u32,
    ready: bool,
}

impl TextReveal {
    /// 创建空的文本状态
    pub fn new(char_delay: u32) -> Self {
        Self {
            text: String::new(),
            total_chars: 0,
            revealed: 0,
            char_delay,
            frame_count: 0,
            ready: true,
        }
    }

    /// 设置新文本，从第一个字符开始显示
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.total_chars = self.text.chars().count();
        self.revealed = 0;
        self.frame_count = 0;
        self.ready = self.char_delay == 0 || self.total_chars == 0;
        if self.ready {
            self.revealed = self.total_chars;
        }
    }

    /// 推进一帧
    pub fn update(&mut self) {
        if self.ready {
            return;
        }
        self.frame_count += 1;
        if self.frame_count >= self.char_delay {
            self.frame_count = 0;
            self.revealed += 1;
        }
        if self.revealed >= self.total_chars {
            self.ready = true;
        }
    }

    /// 立即显示完整文本
    pub fn complete(&mut self) {
        self.revealed = self.total_chars;
        self.ready = true;
    }

    /// 文本是否已完全显示
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// 清空文本
    pub fn clear(&mut self) {
        self.set_text(String::new());
    }

    /// 完整文本
    pub fn full_text(&self) -> &str {
        &self.text
    }

    /// 当前可见部分
    pub fn visible_text(&self) -> &str {
        match self.text.char_indices().nth(self.revealed) {
            Some((byte_index, _)) => &self.text[..byte_index],
            None => &self.text,
        }
    }
}

/// 把一行对话排版成多行
///
/// - 第一个词以 `:` 结尾时视为说话人，单独占一行
/// - 其余部分按空格分词，每行不超过 `max_columns` 个字符
/// - 超长的单词单独成行，不做拆分
pub fn layout_lines(text: &str, max_columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut words = text.split(' ').filter(|w| !w.is_empty()).peekable();

    if let Some(speaker) = words.next_if(|first| first.ends_with(':')) {
        lines.push(speaker.to_string());
    }

    let mut line = String::new();
    let mut width = 0usize;
    for word in words {
        let word_width = word.chars().count();
        if line.is_empty() {
            line.push_str(word);
            width = word_width;
        } else if width + 1 + word_width <= max_columns {
            line.push(' ');
            line.push_str(word);
            width += 1 + word_width;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            width = word_width;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
