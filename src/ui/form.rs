//! Reusable form machinery for the wizard's create dialogs.
//!
//! A form is a static list of [`FieldSpec`]s instantiated into
//! [`FormField`] widgets. Validation runs client side before anything
//! touches the network; failures render inline under the offending
//! field and block submission.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use crossterm::event::KeyCode;
use once_cell::sync::Lazy;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use regex::Regex;
use tui_textarea::TextArea;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|_| unreachable!()));
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://\S+$").unwrap_or_else(|_| unreachable!()));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text input.
    Text,
    /// Multi-line input backed by tui-textarea.
    MultiLine,
    /// Pick one of a fixed set of (wire value, display label) options.
    Select,
    Toggle,
    /// YYYY-MM-DD.
    Date,
    /// YYYY-MM-DD HH:MM.
    DateTime,
    Number,
}

/// Extra shape check applied on top of the field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRule {
    Free,
    Email,
    Url,
}

pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: &'static str,
    pub max_length: Option<usize>,
    pub min_length: Option<usize>,
    pub options: Vec<(String, String)>,
    pub default: Option<String>,
    pub rule: ValueRule,
}

impl FieldSpec {
    fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            placeholder: "",
            max_length: None,
            min_length: None,
            options: Vec::new(),
            default: None,
            rule: ValueRule::Free,
        }
    }

    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn multiline(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::MultiLine)
    }

    pub fn select(
        name: &'static str,
        label: &'static str,
        options: Vec<(String, String)>,
    ) -> Self {
        let mut spec = Self::new(name, label, FieldKind::Select);
        spec.options = options;
        spec
    }

    pub fn toggle(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Toggle)
    }

    pub fn date(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    pub fn datetime(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::DateTime)
    }

    pub fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, text: &'static str) -> Self {
        self.placeholder = text;
        self
    }

    pub fn max_len(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn min_len(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn email(mut self) -> Self {
        self.rule = ValueRule::Email;
        self
    }

    pub fn url(mut self) -> Self {
        self.rule = ValueRule::Url;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// One interactive input widget.
pub enum FormField {
    TextInput {
        value: String,
        cursor: usize,
        placeholder: String,
        max_length: Option<usize>,
    },
    TextArea {
        textarea: Box<TextArea<'static>>,
        placeholder: String,
    },
    SelectList {
        options: Vec<(String, String)>,
        selected: usize,
        list_state: ListState,
    },
    Toggle {
        value: bool,
    },
    /// Masked single-line inputs share the text machinery but restrict
    /// the accepted characters.
    Masked {
        value: String,
        cursor: usize,
        mask: Mask,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mask {
    Date,
    DateTime,
    Number,
}

impl Mask {
    fn accepts(self, c: char) -> bool {
        match self {
            Mask::Date => c.is_ascii_digit() || c == '-',
            Mask::DateTime => c.is_ascii_digit() || c == '-' || c == ' ' || c == ':',
            Mask::Number => c.is_ascii_digit() || c == '.',
        }
    }

    fn max_len(self) -> usize {
        match self {
            Mask::Date => 10,
            Mask::DateTime => 16,
            Mask::Number => 12,
        }
    }

    fn hint(self) -> &'static str {
        match self {
            Mask::Date => "YYYY-MM-DD",
            Mask::DateTime => "YYYY-MM-DD HH:MM",
            Mask::Number => "",
        }
    }
}

impl FormField {
    pub fn from_spec(spec: &FieldSpec) -> Self {
        match spec.kind {
            FieldKind::Text => {
                let value = spec.default.clone().unwrap_or_default();
                FormField::TextInput {
                    cursor: value.len(),
                    value,
                    placeholder: spec.placeholder.to_string(),
                    max_length: spec.max_length,
                }
            }
            FieldKind::MultiLine => {
                let mut textarea = TextArea::default();
                if let Some(ref default) = spec.default {
                    textarea.insert_str(default);
                }
                FormField::TextArea {
                    textarea: Box::new(textarea),
                    placeholder: spec.placeholder.to_string(),
                }
            }
            FieldKind::Select => {
                let selected = spec
                    .default
                    .as_ref()
                    .and_then(|d| spec.options.iter().position(|(v, _)| v == d))
                    .unwrap_or(0);
                let mut list_state = ListState::default();
                list_state.select(Some(selected));
                FormField::SelectList {
                    options: spec.options.clone(),
                    selected,
                    list_state,
                }
            }
            FieldKind::Toggle => FormField::Toggle {
                value: spec.default.as_deref() == Some("true"),
            },
            FieldKind::Date | FieldKind::DateTime | FieldKind::Number => {
                let mask = match spec.kind {
                    FieldKind::Date => Mask::Date,
                    FieldKind::DateTime => Mask::DateTime,
                    _ => Mask::Number,
                };
                let value = spec.default.clone().unwrap_or_default();
                FormField::Masked {
                    cursor: value.len(),
                    value,
                    mask,
                }
            }
        }
    }

    /// The wire value: for selects this is the option value, not its
    /// display label.
    pub fn value(&self) -> String {
        match self {
            FormField::TextInput { value, .. } => value.clone(),
            FormField::TextArea { textarea, .. } => textarea.lines().join("\n"),
            FormField::SelectList {
                options, selected, ..
            } => options
                .get(*selected)
                .map(|(v, _)| v.clone())
                .unwrap_or_default(),
            FormField::Toggle { value } => value.to_string(),
            FormField::Masked { value, .. } => value.clone(),
        }
    }

    pub fn set_value(&mut self, new_value: &str) {
        match self {
            FormField::TextInput { value, cursor, .. } => {
                *value = new_value.to_string();
                *cursor = value.len();
            }
            FormField::TextArea { textarea, .. } => {
                textarea.select_all();
                textarea.cut();
                textarea.insert_str(new_value);
            }
            FormField::SelectList {
                options,
                selected,
                list_state,
            } => {
                if let Some(idx) = options.iter().position(|(v, _)| v == new_value) {
                    *selected = idx;
                    list_state.select(Some(idx));
                }
            }
            FormField::Toggle { value } => {
                *value = new_value == "true";
            }
            FormField::Masked { value, cursor, .. } => {
                *value = new_value.to_string();
                *cursor = value.len();
            }
        }
    }

    /// Handle a key event; returns true when the key was consumed.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match self {
            FormField::TextInput {
                value,
                cursor,
                max_length,
                ..
            } => match key {
                KeyCode::Char(c) => {
                    if max_length.map_or(true, |m| value.chars().count() < m) {
                        value.insert(*cursor, c);
                        *cursor += c.len_utf8();
                    }
                    true
                }
                KeyCode::Backspace => {
                    if let Some(c) = value[..*cursor].chars().next_back() {
                        *cursor -= c.len_utf8();
                        value.remove(*cursor);
                    }
                    true
                }
                KeyCode::Delete => {
                    if *cursor < value.len() {
                        value.remove(*cursor);
                    }
                    true
                }
                KeyCode::Left => {
                    if let Some(c) = value[..*cursor].chars().next_back() {
                        *cursor -= c.len_utf8();
                    }
                    true
                }
                KeyCode::Right => {
                    if let Some(c) = value[*cursor..].chars().next() {
                        *cursor += c.len_utf8();
                    }
                    true
                }
                KeyCode::Home => {
                    *cursor = 0;
                    true
                }
                KeyCode::End => {
                    *cursor = value.len();
                    true
                }
                _ => false,
            },
            FormField::TextArea { textarea, .. } => {
                textarea.input(crossterm::event::KeyEvent::new(
                    key,
                    crossterm::event::KeyModifiers::NONE,
                ));
                true
            }
            FormField::SelectList {
                options,
                selected,
                list_state,
            } => match key {
                KeyCode::Up | KeyCode::Char('k') => {
                    if *selected > 0 {
                        *selected -= 1;
                        list_state.select(Some(*selected));
                    }
                    true
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if *selected + 1 < options.len() {
                        *selected += 1;
                        list_state.select(Some(*selected));
                    }
                    true
                }
                _ => false,
            },
            FormField::Toggle { value } => match key {
                KeyCode::Char(' ') => {
                    *value = !*value;
                    true
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    *value = false;
                    true
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    *value = true;
                    true
                }
                _ => false,
            },
            FormField::Masked {
                value,
                cursor,
                mask,
            } => match key {
                KeyCode::Char(c) if mask.accepts(c) => {
                    if value.len() < mask.max_len() {
                        value.insert(*cursor, c);
                        *cursor += 1;
                    }
                    true
                }
                KeyCode::Backspace => {
                    if *cursor > 0 {
                        *cursor -= 1;
                        value.remove(*cursor);
                    }
                    true
                }
                KeyCode::Left => {
                    if *cursor > 0 {
                        *cursor -= 1;
                    }
                    true
                }
                KeyCode::Right => {
                    if *cursor < value.len() {
                        *cursor += 1;
                    }
                    true
                }
                _ => false,
            },
        }
    }

    /// Rendered height in rows, which varies with focus for selects.
    fn render_height(&self, focused: bool) -> u16 {
        match self {
            FormField::TextArea { .. } => 5,
            FormField::SelectList { options, .. } => {
                if focused {
                    (options.len() as u16).clamp(1, 5)
                } else {
                    1
                }
            }
            _ => 1,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        match self {
            FormField::TextInput {
                value,
                cursor,
                placeholder,
                max_length,
            } => {
                let mut text = value.clone();
                if focused {
                    text.insert(*cursor, '|');
                }
                let suffix = max_length
                    .map(|m| format!(" ({}/{})", value.chars().count(), m))
                    .unwrap_or_default();

                let content = if value.is_empty() && !focused {
                    Line::from(Span::styled(
                        placeholder.as_str(),
                        Style::default().fg(Color::DarkGray),
                    ))
                } else {
                    Line::from(vec![
                        Span::raw(text),
                        Span::styled(suffix, Style::default().fg(Color::DarkGray)),
                    ])
                };

                let para = Paragraph::new(content).style(Style::default().fg(if focused {
                    Color::White
                } else {
                    Color::Gray
                }));
                frame.render_widget(para, area);
            }
            FormField::TextArea {
                textarea,
                placeholder,
            } => {
                textarea.set_cursor_line_style(Style::default());
                textarea.set_cursor_style(if focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                });
                textarea.set_block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(if focused {
                            Color::Cyan
                        } else {
                            Color::Gray
                        })),
                );
                if textarea.lines().iter().all(|l| l.is_empty()) && !focused {
                    textarea.set_placeholder_text(placeholder.clone());
                    textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));
                }
                frame.render_widget(&**textarea, area);
            }
            FormField::SelectList {
                options,
                selected,
                list_state,
            } => {
                if focused {
                    let items: Vec<ListItem> = options
                        .iter()
                        .map(|(_, label)| ListItem::new(label.as_str()))
                        .collect();
                    let list = List::new(items)
                        .highlight_style(
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::REVERSED),
                        )
                        .highlight_symbol("> ");
                    frame.render_stateful_widget(list, area, list_state);
                } else {
                    let label = options
                        .get(*selected)
                        .map(|(_, l)| l.as_str())
                        .unwrap_or("");
                    let para = Paragraph::new(Line::from(vec![
                        Span::styled("▸ ", Style::default().fg(Color::DarkGray)),
                        Span::styled(label, Style::default().fg(Color::Gray)),
                    ]));
                    frame.render_widget(para, area);
                }
            }
            FormField::Toggle { value } => {
                let yes_style = if *value {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                let no_style = if *value {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                };
                let line = Line::from(vec![
                    Span::styled("[Yes]", yes_style),
                    Span::raw(" / "),
                    Span::styled("[No]", no_style),
                ]);
                frame.render_widget(Paragraph::new(line), area);
            }
            FormField::Masked {
                value,
                cursor,
                mask,
            } => {
                let mut text = value.clone();
                if focused {
                    text.insert(*cursor, '|');
                }
                let display = if value.is_empty() && !focused && !mask.hint().is_empty() {
                    Line::from(Span::styled(
                        mask.hint(),
                        Style::default().fg(Color::DarkGray),
                    ))
                } else {
                    Line::from(text)
                };
                let para = Paragraph::new(display).style(Style::default().fg(if focused {
                    Color::White
                } else {
                    Color::Gray
                }));
                frame.render_widget(para, area);
            }
        }
    }
}

/// A complete form: ordered specs, their widgets, focus, and the
/// validation errors from the last [`validate`](Self::validate) run.
pub struct EntityForm {
    title: String,
    specs: Vec<FieldSpec>,
    fields: Vec<FormField>,
    focused: usize,
    errors: HashMap<&'static str, String>,
    scroll: u16,
}

impl EntityForm {
    pub fn new(title: impl Into<String>, specs: Vec<FieldSpec>) -> Self {
        let fields = specs.iter().map(FormField::from_spec).collect();
        Self {
            title: title.into(),
            specs,
            fields,
            focused: 0,
            errors: HashMap::new(),
            scroll: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn next_field(&mut self) {
        if self.focused + 1 < self.fields.len() {
            self.focused += 1;
        }
    }

    pub fn prev_field(&mut self) {
        if self.focused > 0 {
            self.focused -= 1;
        }
    }

    pub fn is_last_field(&self) -> bool {
        self.focused + 1 >= self.fields.len()
    }

    /// Enter inserts a newline in multi-line fields instead of advancing.
    pub fn focused_is_multiline(&self) -> bool {
        matches!(
            self.specs.get(self.focused).map(|s| s.kind),
            Some(FieldKind::MultiLine)
        )
    }

    /// Routes a key to the focused field.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.handle_key(key)
        } else {
            false
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.specs.iter().position(|s| s.name == name)
    }

    pub fn value(&self, name: &str) -> String {
        self.position(name)
            .and_then(|i| self.fields.get(i))
            .map(FormField::value)
            .unwrap_or_default()
    }

    /// Trimmed value, `None` when blank.
    pub fn opt_value(&self, name: &str) -> Option<String> {
        let v = self.value(name);
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn bool_value(&self, name: &str) -> bool {
        self.value(name) == "true"
    }

    pub fn f64_value(&self, name: &str) -> Option<f64> {
        self.opt_value(name)?.parse().ok()
    }

    pub fn date_value(&self, name: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.opt_value(name)?.as_str(), "%Y-%m-%d").ok()
    }

    pub fn datetime_value(&self, name: &str) -> Option<DateTime<Utc>> {
        let raw = self.opt_value(name)?;
        let naive = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M").ok()?;
        Some(naive.and_utc())
    }

    pub fn set_value(&mut self, name: &str, value: &str) {
        if let Some(i) = self.position(name) {
            self.fields[i].set_value(value);
        }
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Records a cross-field error computed outside the per-field rules.
    pub fn set_error(&mut self, name: &'static str, message: impl Into<String>) {
        self.errors.insert(name, message.into());
    }

    /// Runs every per-field rule; returns true when the form can submit.
    pub fn validate(&mut self) -> bool {
        let mut errors: HashMap<&'static str, String> = HashMap::new();

        for (spec, field) in self.specs.iter().zip(self.fields.iter()) {
            let value = field.value();
            let trimmed = value.trim();

            if trimmed.is_empty() {
                if spec.required {
                    errors.insert(spec.name, format!("{} is required", spec.label));
                }
                continue;
            }

            if let Some(min) = spec.min_length {
                if trimmed.chars().count() < min {
                    errors.insert(
                        spec.name,
                        format!("{} must be at least {min} characters", spec.label),
                    );
                    continue;
                }
            }

            match spec.rule {
                ValueRule::Email if !EMAIL_RE.is_match(trimmed) => {
                    errors.insert(spec.name, "Enter a valid email address".to_string());
                    continue;
                }
                ValueRule::Url if !URL_RE.is_match(trimmed) => {
                    errors.insert(
                        spec.name,
                        "Enter a valid URL starting with http:// or https://".to_string(),
                    );
                    continue;
                }
                _ => {}
            }

            match spec.kind {
                FieldKind::Date => {
                    if NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_err() {
                        errors.insert(spec.name, "Use the YYYY-MM-DD format".to_string());
                    }
                }
                FieldKind::DateTime => {
                    if NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M").is_err() {
                        errors.insert(spec.name, "Use the YYYY-MM-DD HH:MM format".to_string());
                    }
                }
                FieldKind::Number => {
                    if trimmed.parse::<f64>().is_err() {
                        errors.insert(spec.name, format!("{} must be a number", spec.label));
                    }
                }
                _ => {}
            }
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    /// Renders all fields with labels and inline errors, scrolled so the
    /// focused field stays visible.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        // label + widget + optional error + one blank row
        let heights: Vec<u16> = self
            .specs
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let focused = i == self.focused;
                let error = u16::from(self.errors.contains_key(spec.name));
                1 + self.fields[i].render_height(focused) + error + 1
            })
            .collect();

        let focus_top: u16 = heights[..self.focused].iter().sum();
        let focus_bottom = focus_top + heights[self.focused];
        if focus_top < self.scroll {
            self.scroll = focus_top;
        } else if focus_bottom > self.scroll + area.height {
            self.scroll = focus_bottom.saturating_sub(area.height);
        }

        let mut y_offset: u16 = 0;
        for i in 0..self.specs.len() {
            let height = heights[i];
            let top = y_offset;
            y_offset += height;

            if top < self.scroll || top + height > self.scroll + area.height {
                continue;
            }
            let y = area.y + (top - self.scroll);
            let focused = i == self.focused;
            let spec = &self.specs[i];

            let marker = if spec.required { "*" } else { "" };
            let label_style = if focused {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let label = Paragraph::new(Line::from(Span::styled(
                format!("{}{}", spec.label, marker),
                label_style,
            )));
            frame.render_widget(
                label,
                Rect {
                    y,
                    height: 1,
                    ..area
                },
            );

            let field_height = self.fields[i].render_height(focused);
            self.fields[i].render(
                frame,
                Rect {
                    y: y + 1,
                    height: field_height,
                    ..area
                },
                focused,
            );

            if let Some(message) = self.errors.get(spec.name) {
                let error = Paragraph::new(Line::from(Span::styled(
                    format!("✗ {message}"),
                    Style::default().fg(Color::Red),
                )));
                frame.render_widget(
                    error,
                    Rect {
                        y: y + 1 + field_height,
                        height: 1,
                        ..area
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(field: &mut FormField, s: &str) {
        for c in s.chars() {
            field.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_text_input_editing() {
        let spec = FieldSpec::text("name", "Name").max_len(5);
        let mut field = FormField::from_spec(&spec);

        type_str(&mut field, "hello world");
        assert_eq!(field.value(), "hello");

        field.handle_key(KeyCode::Backspace);
        assert_eq!(field.value(), "hell");
    }

    #[test]
    fn test_select_reports_wire_value() {
        let spec = FieldSpec::select(
            "status",
            "Status",
            vec![
                ("pending".to_string(), "Pending".to_string()),
                ("accepted".to_string(), "Accepted".to_string()),
            ],
        )
        .default_value("pending");
        let mut field = FormField::from_spec(&spec);
        assert_eq!(field.value(), "pending");

        field.handle_key(KeyCode::Down);
        assert_eq!(field.value(), "accepted");
        field.handle_key(KeyCode::Down);
        assert_eq!(field.value(), "accepted");
    }

    #[test]
    fn test_date_mask_rejects_letters() {
        let spec = FieldSpec::date("when", "When");
        let mut field = FormField::from_spec(&spec);
        type_str(&mut field, "2024-ab-10");
        assert_eq!(field.value(), "2024--10");
    }

    #[test]
    fn test_required_field_blocks_submit() {
        let mut form = EntityForm::new(
            "Test",
            vec![FieldSpec::text("job_title", "Job title").required()],
        );
        assert!(!form.validate());
        assert!(form.error("job_title").is_some());

        form.set_value("job_title", "Backend Engineer");
        assert!(form.validate());
        assert!(form.error("job_title").is_none());
    }

    #[test]
    fn test_min_length_rule() {
        let mut form = EntityForm::new(
            "Test",
            vec![FieldSpec::text("job_title", "Job title").required().min_len(2)],
        );
        form.set_value("job_title", "a");
        assert!(!form.validate());

        form.set_value("job_title", "ab");
        assert!(form.validate());
    }

    #[test]
    fn test_email_rule_only_applies_when_present() {
        let mut form = EntityForm::new("Test", vec![FieldSpec::text("email", "Email").email()]);
        assert!(form.validate());

        form.set_value("email", "not-an-email");
        assert!(!form.validate());

        form.set_value("email", "jane@example.com");
        assert!(form.validate());
    }

    #[test]
    fn test_url_rule() {
        let mut form = EntityForm::new("Test", vec![FieldSpec::text("website", "Website").url()]);
        form.set_value("website", "example.com");
        assert!(!form.validate());

        form.set_value("website", "https://example.com/jobs");
        assert!(form.validate());
    }

    #[test]
    fn test_date_validation_and_getter() {
        let mut form = EntityForm::new(
            "Test",
            vec![FieldSpec::date("application_date", "Date").required()],
        );
        form.set_value("application_date", "2024-13-40");
        assert!(!form.validate());

        form.set_value("application_date", "2024-01-10");
        assert!(form.validate());
        assert_eq!(
            form.date_value("application_date"),
            Some(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
        );
    }

    #[test]
    fn test_datetime_getter() {
        let mut form = EntityForm::new(
            "Test",
            vec![FieldSpec::datetime("scheduled_date", "Scheduled").required()],
        );
        form.set_value("scheduled_date", "2024-02-01 14:30");
        assert!(form.validate());

        let dt = form.datetime_value("scheduled_date").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-02-01T14:30:00+00:00");
    }

    #[test]
    fn test_number_values() {
        let mut form = EntityForm::new(
            "Test",
            vec![
                FieldSpec::number("salary_min", "Salary min"),
                FieldSpec::number("salary_max", "Salary max"),
            ],
        );
        form.set_value("salary_min", "55000");
        assert!(form.validate());
        assert_eq!(form.f64_value("salary_min"), Some(55000.0));
        assert_eq!(form.f64_value("salary_max"), None);
    }

    #[test]
    fn test_cross_field_error_injection() {
        let mut form = EntityForm::new(
            "Test",
            vec![
                FieldSpec::number("salary_min", "Salary min"),
                FieldSpec::number("salary_max", "Salary max"),
            ],
        );
        form.validate();
        form.set_error("salary_max", "Must be greater than the minimum");
        assert!(form.has_errors());
        assert!(form.error("salary_max").is_some());
    }

    #[test]
    fn test_opt_value_trims_blanks() {
        let mut form = EntityForm::new("Test", vec![FieldSpec::text("location", "Location")]);
        form.set_value("location", "   ");
        assert_eq!(form.opt_value("location"), None);

        form.set_value("location", " Lyon ");
        assert_eq!(form.opt_value("location"), Some("Lyon".to_string()));
    }

    #[test]
    fn test_focus_navigation() {
        let mut form = EntityForm::new(
            "Test",
            vec![
                FieldSpec::text("a", "A"),
                FieldSpec::text("b", "B"),
            ],
        );
        assert!(!form.is_last_field());
        form.next_field();
        assert!(form.is_last_field());
        form.next_field();
        assert!(form.is_last_field());
        form.prev_field();
        assert!(!form.is_last_field());
    }
}
