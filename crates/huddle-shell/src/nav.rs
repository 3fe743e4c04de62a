//! Tab-strip geometry.
//!
//! Pure scroll state for the horizontal tab strip: overflow detection,
//! wheel-to-horizontal redirection, arrow stepping, and keeping the
//! current tab inside the visible range. All operations are deterministic
//! functions of the recorded widths, so they are directly testable.

/// Upper bound of one arrow-click scroll step, in pixels.
pub const MAX_ARROW_STEP: f32 = 150.0;

/// Direction of an arrow-click scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Left,
    Right,
}

/// Scroll state of the tab strip.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NavViewport {
    /// Current horizontal scroll offset.
    pub scroll_left: f32,
    /// Visible width of the strip.
    pub client_width: f32,
    /// Total width of the tabs.
    pub content_width: f32,
}

impl NavViewport {
    pub fn new(client_width: f32, content_width: f32) -> Self {
        Self {
            scroll_left: 0.0,
            client_width,
            content_width,
        }
    }

    /// True when the tabs are wider than the visible strip. Same widths,
    /// same answer: nothing else feeds into this.
    pub fn has_overflow(&self) -> bool {
        self.content_width > self.client_width
    }

    fn max_scroll(&self) -> f32 {
        (self.content_width - self.client_width).max(0.0)
    }

    fn clamp(&mut self) {
        self.scroll_left = self.scroll_left.clamp(0.0, self.max_scroll());
    }

    /// Redirects a vertical mouse-wheel delta to horizontal scrolling.
    pub fn handle_wheel(&mut self, delta_y: f32) {
        self.scroll_left += delta_y;
        self.clamp();
    }

    /// Scrolls by half the visible width, capped at `MAX_ARROW_STEP`.
    pub fn arrow_scroll(&mut self, direction: ScrollDirection) {
        let step = MAX_ARROW_STEP.min((self.client_width / 2.0).floor());
        match direction {
            ScrollDirection::Left => self.scroll_left -= step,
            ScrollDirection::Right => self.scroll_left += step,
        }
        self.clamp();
    }

    /// Moves the scroll offset the minimal distance that brings the item
    /// `[item_left, item_left + item_width)` fully into view. A no-op when
    /// it is already visible.
    pub fn scroll_into_view(&mut self, item_left: f32, item_width: f32) {
        let item_right = item_left + item_width;
        let visible_right = self.scroll_left + self.client_width;
        if item_left < self.scroll_left {
            self.scroll_left = item_left;
        } else if item_right > visible_right {
            self.scroll_left = item_right - self.client_width;
        }
        self.clamp();
    }
}
