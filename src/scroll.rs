/// Vertical scroll position of the transcript pane.
///
/// In follow mode the offset glides toward the bottom one tick at a time,
/// closing half of the remaining distance per tick.
#[derive(Debug, Clone)]
pub struct ScrollState {
    offset: u16,
    max_offset: u16,
    follow: bool,
    seen_len: usize,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollState {
    pub fn new() -> Self {
        Self {
            offset: 0,
            max_offset: 0,
            follow: true,
            seen_len: 0,
        }
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Records the current transcript length; a change re-enters follow mode.
    pub fn observe(&mut self, transcript_len: usize) {
        if transcript_len != self.seen_len {
            self.seen_len = transcript_len;
            self.follow = true;
        }
    }

    /// Updates the scrollable range after layout.
    pub fn set_bounds(&mut self, content_lines: u16, viewport_height: u16) {
        self.max_offset = content_lines.saturating_sub(viewport_height);
        self.offset = self.offset.min(self.max_offset);
    }

    pub fn tick(&mut self) {
        if !self.follow || self.offset >= self.max_offset {
            return;
        }
        let gap = self.max_offset - self.offset;
        self.offset += gap.div_ceil(2);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.follow = false;
        self.offset = self.offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.offset = self.offset.saturating_add(lines).min(self.max_offset);
    }
}
