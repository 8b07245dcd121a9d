//! Transient status messages shown above the status bar.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warn,
    Error,
}

impl NoticeLevel {
    fn color(self) -> Color {
        match self {
            NoticeLevel::Info => Color::Cyan,
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Warn => Color::Yellow,
            NoticeLevel::Error => Color::Red,
        }
    }

    fn ttl(self) -> Duration {
        match self {
            NoticeLevel::Error => Duration::from_secs(6),
            _ => Duration::from_secs(4),
        }
    }
}

struct Notice {
    text: String,
    level: NoticeLevel,
    created: Instant,
}

/// FIFO queue of short-lived messages; only the oldest live one is
/// drawn, the rest wait their turn.
pub struct Notices {
    items: VecDeque<Notice>,
}

impl Notices {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    pub fn push(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.items.push_back(Notice {
            text: text.into(),
            level,
            created: Instant::now(),
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Success, text);
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Warn, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Error, text);
    }

    /// Drops expired messages. Called on every tick.
    pub fn prune(&mut self) {
        let now = Instant::now();
        while let Some(front) = self.items.front() {
            if now.duration_since(front.created) > front.level.ttl() {
                self.items.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(notice) = self.items.front() else {
            return;
        };

        let marker = match notice.level {
            NoticeLevel::Success => "✓ ",
            NoticeLevel::Warn | NoticeLevel::Error => "! ",
            NoticeLevel::Info => "",
        };
        let mut spans = vec![Span::styled(
            format!("{marker}{}", notice.text),
            Style::default()
                .fg(notice.level.color())
                .add_modifier(Modifier::BOLD),
        )];
        if self.items.len() > 1 {
            spans.push(Span::styled(
                format!("  (+{} more)", self.items.len() - 1),
                Style::default().fg(Color::DarkGray),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Default for Notices {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_keeps_fresh_messages() {
        let mut notices = Notices::new();
        notices.info("saved");
        notices.prune();
        assert!(!notices.is_empty());
    }

    #[test]
    fn test_prune_drops_expired_front() {
        let mut notices = Notices::new();
        notices.items.push_back(Notice {
            text: "old".to_string(),
            level: NoticeLevel::Info,
            created: Instant::now() - Duration::from_secs(10),
        });
        notices.error("fresh");
        notices.prune();
        assert_eq!(notices.items.len(), 1);
        assert_eq!(notices.items.front().map(|n| n.text.as_str()), Some("fresh"));
    }
}
