//! Read-only recap rendered on the final wizard step.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::wizard::session::WizardState;
use crate::wizard::steps::{entities_of, EntityKind};

fn section_header(kind: EntityKind, count: usize) -> Line<'static> {
    Line::from(Span::styled(
        format!("{} ({count})", capitalize(kind.plural())),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Role or link annotation for an entity, if it carries one.
pub(crate) fn annotation(kind: EntityKind, id: i64, state: &WizardState) -> Option<&'static str> {
    match kind {
        EntityKind::Company if state.linked_company_id == Some(id) => Some("[linked]"),
        EntityKind::Document if state.resume_document_id == Some(id) => Some("[resume]"),
        EntityKind::Document if state.cover_letter_document_id == Some(id) => {
            Some("[cover letter]")
        }
        _ => None,
    }
}

pub fn summary_lines(state: &WizardState) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let ids = match (state.application_id, state.opportunity_id) {
        (Some(app), Some(opp)) => format!("Application #{app} · Opportunity #{opp}"),
        _ => "Not initialized".to_string(),
    };
    lines.push(Line::from(Span::styled(
        ids,
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::from(""));

    for &kind in EntityKind::all() {
        let entities = entities_of(kind, state);
        lines.push(section_header(kind, entities.len()));

        if entities.is_empty() {
            lines.push(Line::from(Span::styled(
                "  (none)",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            for entity in entities {
                let mut spans = vec![
                    Span::styled("  • ", Style::default().fg(Color::DarkGray)),
                    Span::styled(entity.label(), Style::default().fg(Color::White)),
                ];
                if let Some(tag) = annotation(kind, entity.id(), state) {
                    spans.push(Span::raw(" "));
                    spans.push(Span::styled(
                        tag,
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    ));
                }
                lines.push(Line::from(spans));
            }
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Finishing closes the wizard and clears the draft. Everything above is already saved.",
        Style::default().fg(Color::Gray),
    )));
    lines
}

pub fn render_summary(frame: &mut Frame, area: Rect, state: &WizardState) {
    let block = Block::default()
        .title(" Summary ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let paragraph = Paragraph::new(summary_lines(state)).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_summary_marks_linked_company_and_roles() {
        let mut state = WizardState::default();
        state.application_id = Some(10);
        state.opportunity_id = Some(20);
        state.created_companies = vec![serde_json::from_value(json!({
            "id": 1,
            "name": "Acme",
            "created_at": "2024-01-10T09:30:00Z"
        }))
        .unwrap()];
        state.linked_company_id = Some(1);
        state.created_documents = vec![serde_json::from_value(json!({
            "id": 7,
            "name": "CV 2024",
            "type": "resume",
            "format": "pdf",
            "path": "/documents/cv.pdf",
            "created_at": "2024-01-10T09:30:00Z"
        }))
        .unwrap()];
        state.resume_document_id = Some(7);

        let text: Vec<String> = summary_lines(&state).iter().map(line_text).collect();
        assert!(text[0].contains("Application #10"));
        assert!(text.iter().any(|l| l.contains("Acme") && l.contains("[linked]")));
        assert!(text.iter().any(|l| l.contains("CV 2024") && l.contains("[resume]")));
    }

    #[test]
    fn test_summary_shows_empty_sections() {
        let state = WizardState::default();
        let text: Vec<String> = summary_lines(&state).iter().map(line_text).collect();
        assert!(text[0].contains("Not initialized"));
        assert_eq!(text.iter().filter(|l| l.contains("(none)")).count(), 6);
    }
}
