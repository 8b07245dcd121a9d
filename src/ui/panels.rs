use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::types::{Action, Application, ApplicationStatus, EventStatus, ScheduledEvent, User};

fn truncated(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}

fn status_color(status: ApplicationStatus) -> Color {
    match status {
        ApplicationStatus::Pending => Color::Yellow,
        ApplicationStatus::FollowUpScheduled => Color::Cyan,
        ApplicationStatus::InterviewScheduled => Color::Green,
        ApplicationStatus::Accepted => Color::LightGreen,
        ApplicationStatus::Rejected => Color::Red,
        ApplicationStatus::Obsolete => Color::DarkGray,
    }
}

fn event_status_color(status: EventStatus) -> Color {
    match status {
        EventStatus::Pending => Color::Yellow,
        EventStatus::Confirmed => Color::Green,
        EventStatus::Rescheduled => Color::Cyan,
        EventStatus::Cancelled | EventStatus::Completed => Color::DarkGray,
    }
}

/// One dashboard row: the application joined with its opportunity's
/// title, resolved by the caller from the two list endpoints.
pub struct ApplicationRow {
    pub application: Application,
    pub job_title: String,
}

pub struct ApplicationsPanel {
    pub rows: Vec<ApplicationRow>,
    pub state: ListState,
    pub title: String,
    /// strftime format from `[ui] date_format`.
    pub date_format: String,
}

impl ApplicationsPanel {
    pub fn new(title: String, date_format: String) -> Self {
        Self {
            rows: Vec::new(),
            state: ListState::default(),
            title,
            date_format,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };

        let max_title_len = (area.width as usize).saturating_sub(26);

        let items: Vec<ListItem> = self
            .rows
            .iter()
            .map(|row| {
                let app = &row.application;
                let color = status_color(app.status);
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", app.application_date.format(&self.date_format)),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!("{:<width$} ", truncated(&row.job_title, max_title_len), width = max_title_len),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(app.status.label(), Style::default().fg(color)),
                ]))
            })
            .collect();

        let title = format!("{} ({})", self.title, self.rows.len());
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(border_style),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

pub struct EventsPanel {
    pub events: Vec<ScheduledEvent>,
    pub state: ListState,
    pub title: String,
    /// strftime format from `[ui] datetime_format`.
    pub datetime_format: String,
}

impl EventsPanel {
    pub fn new(title: String, datetime_format: String) -> Self {
        Self {
            events: Vec::new(),
            state: ListState::default(),
            title,
            datetime_format,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };

        let items: Vec<ListItem> = self
            .events
            .iter()
            .map(|e| {
                let color = event_status_color(e.status);
                let method = e
                    .communication_method
                    .map(|m| format!(" ({})", m.label()))
                    .unwrap_or_default();
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", e.scheduled_date.format(&self.datetime_format)),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(e.title.clone(), Style::default().fg(Color::White)),
                    Span::styled(method, Style::default().fg(Color::Gray)),
                    Span::raw(" "),
                    Span::styled(format!("[{}]", e.status.label()), Style::default().fg(color)),
                ]))
            })
            .collect();

        let title = format!("{} ({})", self.title, self.events.len());
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(border_style),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

pub struct ActionsPanel {
    pub actions: Vec<Action>,
    pub state: ListState,
    pub title: String,
}

impl ActionsPanel {
    pub fn new(title: String) -> Self {
        Self {
            actions: Vec::new(),
            state: ListState::default(),
            title,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };

        let max_note_len = (area.width as usize).saturating_sub(20);

        let items: Vec<ListItem> = self
            .actions
            .iter()
            .map(|a| {
                let (marker, marker_color) = if a.is_completed {
                    ("✓", Color::Green)
                } else {
                    ("☐", Color::Yellow)
                };
                let note = a
                    .notes
                    .as_deref()
                    .map(|n| truncated(n, max_note_len))
                    .unwrap_or_default();
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{marker} "), Style::default().fg(marker_color)),
                    Span::styled(
                        a.action_type.replace('_', " "),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                    Span::styled(note, Style::default().fg(Color::Gray)),
                ]))
            })
            .collect();

        let title = format!("{} ({})", self.title, self.actions.len());
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(border_style),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

pub struct StatusBar {
    /// Step of a stored unfinished wizard draft, if one exists.
    pub draft_step: Option<u8>,
}

impl StatusBar {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        if let Some(step) = self.draft_step {
            spans.push(Span::styled(
                format!("● Draft at step {step} "),
                Style::default().fg(Color::Yellow),
            ));
        }
        spans.push(Span::styled(
            " [w] wizard  [Tab] focus  [↑↓] select  [r] refresh  [?] help  [q] quit",
            Style::default().fg(Color::DarkGray),
        ));

        let bar = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::TOP));
        frame.render_widget(bar, area);
    }
}

pub struct HeaderBar<'a> {
    pub version: &'static str,
    pub user: Option<&'a User>,
}

impl<'a> HeaderBar<'a> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                " CandiDash",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" v{}", self.version),
                Style::default().fg(Color::Gray),
            ),
        ];

        if let Some(user) = self.user {
            spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::styled(
                user.email.clone(),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let bar = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(bar, area);
    }
}
