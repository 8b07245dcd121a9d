use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    widgets::ListState,
    Frame,
};

use super::panels::{
    ActionsPanel, ApplicationRow, ApplicationsPanel, EventsPanel, HeaderBar, StatusBar,
};
use crate::config::UiConfig;
use crate::types::{Action, Application, Opportunity, ScheduledEvent, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPanel {
    Applications,
    Events,
    Actions,
}

pub struct Dashboard {
    pub applications_panel: ApplicationsPanel,
    pub events_panel: EventsPanel,
    pub actions_panel: ActionsPanel,
    pub focused: FocusedPanel,
    /// Step of a stored unfinished wizard draft, surfaced in the status bar.
    pub draft_step: Option<u8>,
}

impl Dashboard {
    pub fn new(ui: &UiConfig) -> Self {
        Self {
            applications_panel: ApplicationsPanel::new(
                "Applications".to_string(),
                ui.date_format.clone(),
            ),
            events_panel: EventsPanel::new(
                "Upcoming events".to_string(),
                ui.datetime_format.clone(),
            ),
            actions_panel: ActionsPanel::new("Pending actions".to_string()),
            focused: FocusedPanel::Applications,
            draft_step: None,
        }
    }

    /// Joins applications with their opportunity titles, newest first.
    pub fn update_applications(
        &mut self,
        applications: Vec<Application>,
        opportunities: &[Opportunity],
    ) {
        let mut rows: Vec<ApplicationRow> = applications
            .into_iter()
            .filter(|a| !a.is_archived)
            .map(|application| {
                let job_title = opportunities
                    .iter()
                    .find(|o| o.id == application.opportunity_id)
                    .map(|o| o.job_title.clone())
                    .unwrap_or_else(|| "(unknown position)".to_string());
                ApplicationRow {
                    application,
                    job_title,
                }
            })
            .collect();
        rows.sort_by(|a, b| b.application.application_date.cmp(&a.application.application_date));
        self.applications_panel.rows = rows;
        clamp(&mut self.applications_panel.state, self.applications_panel.rows.len());
    }

    /// Keeps only events still ahead of us, soonest first.
    pub fn update_events(&mut self, mut events: Vec<ScheduledEvent>) {
        let now = Utc::now();
        events.retain(|e| e.scheduled_date >= now);
        events.sort_by_key(|e| e.scheduled_date);
        self.events_panel.events = events;
        clamp(&mut self.events_panel.state, self.events_panel.events.len());
    }

    pub fn update_actions(&mut self, mut actions: Vec<Action>) {
        actions.retain(|a| !a.is_completed);
        actions.sort_by_key(|a| a.created_at);
        self.actions_panel.actions = actions;
        clamp(&mut self.actions_panel.state, self.actions_panel.actions.len());
    }

    pub fn render(&mut self, frame: &mut Frame, user: Option<&User>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(10),
                Constraint::Length(2),
            ])
            .split(frame.area());

        let header = HeaderBar {
            version: env!("CARGO_PKG_VERSION"),
            user,
        };
        header.render(frame, chunks[0]);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(32),
                Constraint::Percentage(28),
            ])
            .split(chunks[1]);

        self.applications_panel.render(
            frame,
            main_chunks[0],
            self.focused == FocusedPanel::Applications,
        );
        self.events_panel
            .render(frame, main_chunks[1], self.focused == FocusedPanel::Events);
        self.actions_panel
            .render(frame, main_chunks[2], self.focused == FocusedPanel::Actions);

        let status = StatusBar {
            draft_step: self.draft_step,
        };
        status.render(frame, chunks[2]);
    }

    pub fn focus_next(&mut self) {
        self.focused = match self.focused {
            FocusedPanel::Applications => FocusedPanel::Events,
            FocusedPanel::Events => FocusedPanel::Actions,
            FocusedPanel::Actions => FocusedPanel::Applications,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focused = match self.focused {
            FocusedPanel::Applications => FocusedPanel::Actions,
            FocusedPanel::Events => FocusedPanel::Applications,
            FocusedPanel::Actions => FocusedPanel::Events,
        };
    }

    pub fn select_next(&mut self) {
        match self.focused {
            FocusedPanel::Applications => cycle(
                &mut self.applications_panel.state,
                self.applications_panel.rows.len(),
                true,
            ),
            FocusedPanel::Events => cycle(
                &mut self.events_panel.state,
                self.events_panel.events.len(),
                true,
            ),
            FocusedPanel::Actions => cycle(
                &mut self.actions_panel.state,
                self.actions_panel.actions.len(),
                true,
            ),
        }
    }

    pub fn select_prev(&mut self) {
        match self.focused {
            FocusedPanel::Applications => cycle(
                &mut self.applications_panel.state,
                self.applications_panel.rows.len(),
                false,
            ),
            FocusedPanel::Events => cycle(
                &mut self.events_panel.state,
                self.events_panel.events.len(),
                false,
            ),
            FocusedPanel::Actions => cycle(
                &mut self.actions_panel.state,
                self.actions_panel.actions.len(),
                false,
            ),
        }
    }

    pub fn selected_application(&self) -> Option<&ApplicationRow> {
        if self.focused == FocusedPanel::Applications {
            self.applications_panel
                .state
                .selected()
                .and_then(|i| self.applications_panel.rows.get(i))
        } else {
            None
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(&UiConfig::default())
    }
}

fn cycle(state: &mut ListState, len: usize, forward: bool) {
    if len == 0 {
        return;
    }
    let i = state.selected().map_or(0, |i| {
        if forward {
            if i + 1 >= len {
                0
            } else {
                i + 1
            }
        } else if i == 0 {
            len - 1
        } else {
            i - 1
        }
    });
    state.select(Some(i));
}

fn clamp(state: &mut ListState, len: usize) {
    match state.selected() {
        Some(_) if len == 0 => state.select(None),
        Some(i) if i >= len => state.select(Some(len - 1)),
        None if len > 0 => state.select(Some(0)),
        _ => {}
    }
}
