use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const SHOWN_OPACITY: f32 = 0.9;
pub const FADE_IN: Duration = Duration::from_millis(100);
pub const FADE_OUT: Duration = Duration::from_millis(300);
pub const OFFSET_X: f64 = 10.0;
pub const OFFSET_Y: f64 = -20.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TooltipContent {
    pub tile: usize,
    pub name: String,
    pub category: String,
    pub value: f64,
}

#[derive(Clone, Copy, Debug)]
struct Fade {
    from: f32,
    to: f32,
    start: Instant,
    duration: Duration,
}

impl Fade {
    fn at(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start);
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.to;
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * t
    }
}

/// Hover state for the floating detail box. Content and position stick
/// around while the box fades out, so the last tile stays readable.
#[derive(Clone, Debug)]
pub struct TooltipController {
    content: Option<TooltipContent>,
    left: f64,
    top: f64,
    fade: Option<Fade>,
}

impl Default for TooltipController {
    fn default() -> Self {
        Self::new()
    }
}

impl TooltipController {
    pub fn new() -> Self {
        Self {
            content: None,
            left: 0.0,
            top: 0.0,
            fade: None,
        }
    }

    pub fn on_mouse_over(&mut self, content: TooltipContent, page_x: f64, page_y: f64, now: Instant) {
        let from = self.opacity(now);
        self.content = Some(content);
        self.left = page_x + OFFSET_X;
        self.top = page_y + OFFSET_Y;
        self.fade = Some(Fade {
            from,
            to: SHOWN_OPACITY,
            start: now,
            duration: FADE_IN,
        });
    }

    pub fn on_mouse_out(&mut self, now: Instant) {
        let from = self.opacity(now);
        self.fade = Some(Fade {
            from,
            to: 0.0,
            start: now,
            duration: FADE_OUT,
        });
    }

    pub fn opacity(&self, now: Instant) -> f32 {
        self.fade.map(|f| f.at(now)).unwrap_or(0.0)
    }

    /// True while the box is on its way in or already shown.
    pub fn is_active(&self) -> bool {
        self.fade.map(|f| f.to > 0.0).unwrap_or(false)
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.fade
            .map(|f| now.saturating_duration_since(f.start) < f.duration)
            .unwrap_or(false)
    }

    pub fn content(&self) -> Option<&TooltipContent> {
        self.content.as_ref()
    }

    /// The value mirrored into the tooltip's `data-value` attribute.
    pub fn data_value(&self) -> f64 {
        self.content.as_ref().map(|c| c.value).unwrap_or(0.0)
    }

    pub fn position(&self) -> (f64, f64) {
        (self.left, self.top)
    }

    pub fn html(&self) -> String {
        match &self.content {
            Some(c) => format!(
                "Name: {}<br>Category: {}<br>Value: {}",
                crate::render::escape(&c.name),
                crate::render::escape(&c.category),
                c.value
            ),
            None => String::new(),
        }
    }
}
