//! Horizontal progress rail drawn at the top of the wizard.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::wizard::nav::WizardNav;
use crate::wizard::session::WizardState;
use crate::wizard::steps::STEPS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSlot {
    Current,
    Done,
    /// Visited or visitable via jump.
    Open,
    Locked,
}

pub fn classify_step(step: u8, nav: &WizardNav, state: &WizardState) -> StepSlot {
    if step == nav.current() {
        StepSlot::Current
    } else if nav.is_completed(step, state) {
        StepSlot::Done
    } else if nav.can_goto(step) {
        StepSlot::Open
    } else {
        StepSlot::Locked
    }
}

pub fn render_stepper(frame: &mut Frame, area: Rect, nav: &WizardNav, state: &WizardState) {
    let block = Block::default().borders(Borders::BOTTOM);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut spans: Vec<Span> = Vec::with_capacity(STEPS.len() * 2);
    for step in &STEPS {
        let slot = classify_step(step.id, nav, state);
        let (marker, style) = match slot {
            StepSlot::Current => (
                step.icon,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            StepSlot::Done => ("✓", Style::default().fg(Color::Green)),
            StepSlot::Open => (step.icon, Style::default().fg(Color::White)),
            StepSlot::Locked => (step.icon, Style::default().fg(Color::DarkGray)),
        };
        if step.id > 1 {
            spans.push(Span::styled("──", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(format!(" {marker} {} ", step.id), style));
    }

    let current = &STEPS[(nav.current() - 1) as usize];
    let lines = vec![
        Line::from(spans),
        Line::from(vec![
            Span::styled(
                format!("Step {} of {}: ", current.id, STEPS.len()),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                current.title,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", current.description),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_fresh_wizard() {
        let nav = WizardNav::new();
        let state = WizardState::default();
        assert_eq!(classify_step(1, &nav, &state), StepSlot::Current);
        assert_eq!(classify_step(2, &nav, &state), StepSlot::Locked);
        assert_eq!(classify_step(8, &nav, &state), StepSlot::Locked);
    }

    #[test]
    fn test_classify_after_progress() {
        let mut state = WizardState::default();
        state.application_id = Some(1);
        state.opportunity_id = Some(2);
        let mut nav = WizardNav::new();
        assert!(nav.next(&state));
        assert!(nav.next(&state));

        assert_eq!(classify_step(1, &nav, &state), StepSlot::Done);
        assert_eq!(classify_step(2, &nav, &state), StepSlot::Done);
        assert_eq!(classify_step(3, &nav, &state), StepSlot::Current);
        assert_eq!(classify_step(4, &nav, &state), StepSlot::Locked);
    }
}
