use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Which button the confirm dialog has highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmSelection {
    Confirm,
    Cancel,
}

impl ConfirmSelection {
    fn toggled(self) -> Self {
        match self {
            Self::Confirm => Self::Cancel,
            Self::Cancel => Self::Confirm,
        }
    }
}

/// Modal yes/no prompt. The owner decides what a confirmation means;
/// this type only tracks visibility and the highlighted button.
pub struct ConfirmDialog {
    pub visible: bool,
    title: String,
    message: Vec<String>,
    confirm_label: String,
    cancel_label: String,
    selection: ConfirmSelection,
    danger: bool,
}

impl ConfirmDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            title: String::new(),
            message: Vec::new(),
            confirm_label: "Yes".to_string(),
            cancel_label: "No".to_string(),
            selection: ConfirmSelection::Cancel,
            danger: false,
        }
    }

    /// Opens the dialog. Destructive prompts default to Cancel so a
    /// stray Enter never deletes anything.
    pub fn show(&mut self, title: impl Into<String>, message: Vec<String>) {
        self.title = title.into();
        self.message = message;
        self.confirm_label = "Yes".to_string();
        self.cancel_label = "No".to_string();
        self.selection = ConfirmSelection::Cancel;
        self.danger = true;
        self.visible = true;
    }

    /// Variant with custom button labels, Confirm highlighted first.
    pub fn show_with_labels(
        &mut self,
        title: impl Into<String>,
        message: Vec<String>,
        confirm_label: impl Into<String>,
        cancel_label: impl Into<String>,
    ) {
        self.title = title.into();
        self.message = message;
        self.confirm_label = confirm_label.into();
        self.cancel_label = cancel_label.into();
        self.selection = ConfirmSelection::Confirm;
        self.danger = false;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.message.clear();
    }

    pub fn toggle_selection(&mut self) {
        self.selection = self.selection.toggled();
    }

    pub fn is_confirm_selected(&self) -> bool {
        self.selection == ConfirmSelection::Confirm
    }

    pub fn render(&self, frame: &mut Frame) {
        if !self.visible {
            return;
        }

        let height = (self.message.len() as u16 + 7).clamp(9, 16);
        let area = centered_rect_lines(56, height, frame.area());
        frame.render_widget(Clear, area);

        let border_color = if self.danger { Color::Red } else { Color::Cyan };
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .margin(1)
            .split(inner);

        let body: Vec<Line> = self
            .message
            .iter()
            .map(|l| Line::from(l.as_str()))
            .collect();
        frame.render_widget(
            Paragraph::new(body)
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Color::White)),
            chunks[0],
        );

        let confirm_color = if self.danger { Color::Red } else { Color::Green };
        let confirm_style = if self.selection == ConfirmSelection::Confirm {
            Style::default()
                .fg(Color::Black)
                .bg(confirm_color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(confirm_color)
        };
        let cancel_style = if self.selection == ConfirmSelection::Cancel {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let buttons = Line::from(vec![
            Span::styled(format!(" {} ", self.confirm_label), confirm_style),
            Span::raw("   "),
            Span::styled(format!(" {} ", self.cancel_label), cancel_style),
        ]);
        frame.render_widget(
            Paragraph::new(buttons).alignment(Alignment::Center),
            chunks[1],
        );
    }
}

impl Default for ConfirmDialog {
    fn default() -> Self {
        Self::new()
    }
}

pub struct HelpDialog {
    pub visible: bool,
}

impl HelpDialog {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn render(&self, frame: &mut Frame) {
        if !self.visible {
            return;
        }

        let area = centered_rect(60, 80, frame.area());
        frame.render_widget(Clear, area);

        let section = |title: &'static str| {
            Line::from(Span::styled(
                title,
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(Color::Cyan),
            ))
        };
        let entry = |key: &'static str, text: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<12}"), Style::default().fg(Color::Yellow)),
                Span::raw(text),
            ])
        };

        let help_text = vec![
            section("Dashboard"),
            entry("w", "Open the application wizard"),
            entry("Tab", "Focus next panel"),
            entry("↑/↓  j/k", "Move selection"),
            entry("r", "Refresh data from the server"),
            entry("?", "Toggle this help"),
            entry("q", "Quit"),
            Line::from(""),
            section("Wizard"),
            entry("n / →", "Next step"),
            entry("p / ←", "Previous step"),
            entry("1-8", "Jump to a visited step"),
            entry("a", "Add an item on the current step"),
            entry("d", "Delete the selected item"),
            entry("l", "Link the selected company (companies)"),
            entry("r / c", "Mark as resume / cover letter (documents)"),
            entry("Esc", "Leave the wizard, draft is kept"),
            entry("Ctrl+X", "Cancel the wizard and discard the draft"),
            Line::from(""),
            section("Forms"),
            entry("Tab", "Next field"),
            entry("Shift+Tab", "Previous field"),
            entry("Enter", "Next field, submit on the last one"),
            entry("Ctrl+S", "Save from any field"),
            entry("Esc", "Close the form"),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to close",
                Style::default().fg(Color::Gray),
            )),
        ];

        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .alignment(Alignment::Left);
        frame.render_widget(help, area);
    }
}

impl Default for HelpDialog {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper to create a centered rect
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Centered rect with a fixed row height instead of a percentage.
pub(crate) fn centered_rect_lines(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let top = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(top),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
