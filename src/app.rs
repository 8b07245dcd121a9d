//! Application shell: terminal lifecycle, the event loop, and the glue
//! between the dashboard, the wizard, and the API client.
//!
//! The wizard itself never performs requests. Its key handler returns a
//! [`WizardEvent`]; `dispatch_wizard_event` runs the matching API call
//! and reports the outcome back through the screen's `on_*` methods.

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::time::Duration;

use crate::api::{ApiClient, Backend};
use crate::config::Config;
use crate::types::{ApplicationUpdate, OpportunityUpdate, User};
use crate::ui::dialogs::HelpDialog;
use crate::ui::{ConfirmDialog, Dashboard, Notices};
use crate::wizard::steps::step_by_id;
use crate::wizard::storage::{FileStorage, WizardStorage};
use crate::wizard::{
    peek_draft, CreatedEntity, EntityKind, EntityPayload, WizardEvent, WizardScreen, WizardStore,
};

pub struct App {
    config: Config,
    client: ApiClient,
    user: User,
    dashboard: Dashboard,
    /// Present while the wizard is open; the dashboard is hidden behind it.
    wizard: Option<WizardScreen>,
    /// "Resume draft?" prompt shown before the wizard opens.
    resume_prompt: ConfirmDialog,
    help_dialog: HelpDialog,
    notices: Notices,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, client: ApiClient, user: User) -> Self {
        let dashboard = Dashboard::new(&config.ui);
        Self {
            config,
            client,
            user,
            dashboard,
            wizard: None,
            resume_prompt: ConfirmDialog::new(),
            help_dialog: HelpDialog::new(),
            notices: Notices::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        if let Err(e) = self.refresh_data().await {
            self.notices
                .error(format!("Could not load dashboard data: {e}"));
        }
        self.refresh_draft_badge();

        let tick_rate = Duration::from_millis(self.config.ui.tick_rate_ms);

        while !self.should_quit {
            terminal.draw(|f| {
                if let Some(ref mut wizard) = self.wizard {
                    wizard.render(f);
                } else {
                    self.dashboard.render(f, Some(&self.user));
                }
                self.resume_prompt.render(f);
                self.help_dialog.render(f);

                // One-line toast strip just above the bottom bar.
                let area = f.area();
                if area.height > 3 {
                    let strip = Rect {
                        x: area.x + 1,
                        y: area.y + area.height - 3,
                        width: area.width.saturating_sub(2),
                        height: 1,
                    };
                    self.notices.render(f, strip);
                }
            })?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key).await?;
                    }
                }
            }

            self.notices.prune();
        }

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Help overlay swallows the next key press
        if self.help_dialog.visible {
            self.help_dialog.visible = false;
            return Ok(());
        }

        if self.resume_prompt.visible {
            self.handle_resume_prompt_key(key.code).await;
            return Ok(());
        }

        if key.code == KeyCode::Char('?')
            && self.wizard.as_ref().is_none_or(|w| !w.is_editing())
        {
            self.help_dialog.toggle();
            return Ok(());
        }

        if self.wizard.is_some() {
            let event = self.wizard.as_mut().and_then(|w| w.handle_key(key));
            if let Some(event) = event {
                self.dispatch_wizard_event(event).await;
            }
            return Ok(());
        }

        // Dashboard keys
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('w') => {
                self.start_wizard().await;
            }
            KeyCode::Tab => {
                self.dashboard.focus_next();
            }
            KeyCode::BackTab => {
                self.dashboard.focus_prev();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.dashboard.select_prev();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.dashboard.select_next();
            }
            KeyCode::Char('r') => {
                match self.refresh_data().await {
                    Ok(()) => self.notices.info("Refreshed"),
                    Err(e) => self.notices.error(format!("Refresh failed: {e}")),
                }
                self.refresh_draft_badge();
            }
            _ => {}
        }

        Ok(())
    }

    async fn handle_resume_prompt_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Left
            | KeyCode::Right
            | KeyCode::Tab
            | KeyCode::Char('h')
            | KeyCode::Char('l') => {
                self.resume_prompt.toggle_selection();
            }
            KeyCode::Enter => {
                let resume = self.resume_prompt.is_confirm_selected();
                self.resume_prompt.hide();
                if resume {
                    self.open_wizard_resuming().await;
                } else {
                    self.open_wizard_fresh();
                }
            }
            KeyCode::Esc => {
                self.resume_prompt.hide();
            }
            _ => {}
        }
    }

    // -- wizard lifecycle ---------------------------------------------------

    fn storage(&self) -> Box<dyn WizardStorage> {
        Box::new(FileStorage::new(self.config.wizard_store_dir()))
    }

    /// Entry point for the `w` key: offer to resume a stored draft, or
    /// open a fresh wizard when there is none.
    async fn start_wizard(&mut self) {
        let mut storage = self.storage();
        match peek_draft(storage.as_mut(), self.user.id) {
            Some(draft) => {
                let step_title = step_by_id(draft.step).map_or("", |s| s.title);
                self.resume_prompt.show_with_labels(
                    "Resume draft?",
                    vec![
                        format!(
                            "An unfinished application is at step {} ({step_title}).",
                            draft.step
                        ),
                        format!(
                            "Last touched {}.",
                            draft.last_updated.format("%Y-%m-%d %H:%M")
                        ),
                        String::new(),
                        "Starting over keeps server records but drops the draft.".to_string(),
                    ],
                    "Resume",
                    "Start over",
                );
            }
            None => self.open_wizard_fresh(),
        }
    }

    fn open_wizard_fresh(&mut self) {
        let store = WizardStore::fresh(self.user.id, self.storage());
        self.wizard = Some(WizardScreen::new(store));
        self.dashboard.draft_step = None;
    }

    /// Reopens the stored draft after verifying its records still exist
    /// on the server. The server's link fields win over the snapshot.
    async fn open_wizard_resuming(&mut self) {
        let mut store = WizardStore::open(self.user.id, self.storage());
        let (Some(application_id), Some(opportunity_id)) = (
            store.state().application_id,
            store.state().opportunity_id,
        ) else {
            self.open_wizard_fresh();
            return;
        };

        let application = match self.client.get_application(application_id).await {
            Ok(application) => application,
            Err(e) if e.is_not_found() => {
                store.clear();
                self.notices
                    .warn("The draft's records are gone from the server; starting over");
                self.open_wizard_fresh();
                return;
            }
            Err(e) => {
                self.notices
                    .error(format!("Could not verify the draft: {e}"));
                return;
            }
        };
        let opportunity = match self.client.get_opportunity(opportunity_id).await {
            Ok(opportunity) => opportunity,
            Err(e) if e.is_not_found() => {
                store.clear();
                self.notices
                    .warn("The draft's records are gone from the server; starting over");
                self.open_wizard_fresh();
                return;
            }
            Err(e) => {
                self.notices
                    .error(format!("Could not verify the draft: {e}"));
                return;
            }
        };

        store.adopt_server_links(
            opportunity.company_id,
            application.resume_used_id,
            application.cover_letter_id,
        );
        self.wizard = Some(WizardScreen::new(store));
        self.dashboard.draft_step = None;
    }

    async fn close_wizard(&mut self) {
        self.wizard = None;
        if let Err(e) = self.refresh_data().await {
            self.notices.error(format!("Refresh failed: {e}"));
        }
        self.refresh_draft_badge();
    }

    // -- wizard event dispatch ----------------------------------------------

    async fn dispatch_wizard_event(&mut self, event: WizardEvent) {
        match event {
            WizardEvent::SubmitInit(request) => match self.client.init_application(&request).await
            {
                Ok(application) => {
                    self.notices
                        .success(format!("Application #{} created", application.id));
                    if let Some(wizard) = self.wizard.as_mut() {
                        wizard.on_init_success(&application);
                    }
                }
                Err(e) => {
                    tracing::warn!("Wizard init failed: {}", e);
                    self.notices
                        .error(format!("Could not create the application: {e}"));
                    if let Some(wizard) = self.wizard.as_mut() {
                        wizard.on_init_failure();
                    }
                }
            },
            WizardEvent::CreateEntity(payload) => self.create_entity(payload).await,
            WizardEvent::DeleteEntity(kind, id) => self.delete_entity(kind, id).await,
            WizardEvent::SetPrimaryCompany(company_id) => {
                let Some(opportunity_id) =
                    self.wizard.as_ref().and_then(|w| w.state().opportunity_id)
                else {
                    if let Some(wizard) = self.wizard.as_mut() {
                        wizard.on_link_failure();
                    }
                    return;
                };
                let update = OpportunityUpdate::company_link(company_id);
                match self.client.update_opportunity(opportunity_id, &update).await {
                    Ok(_) => {
                        if let Some(wizard) = self.wizard.as_mut() {
                            wizard.on_primary_company_applied(company_id);
                        }
                    }
                    Err(e) => {
                        self.notices
                            .error(format!("Could not update the company link: {e}"));
                        if let Some(wizard) = self.wizard.as_mut() {
                            wizard.on_link_failure();
                        }
                    }
                }
            }
            WizardEvent::SetResumeDocument(document_id) => {
                self.apply_application_link(ApplicationUpdate::resume_link(document_id), |w| {
                    w.on_resume_document_applied(document_id);
                })
                .await;
            }
            WizardEvent::SetCoverLetterDocument(document_id) => {
                self.apply_application_link(
                    ApplicationUpdate::cover_letter_link(document_id),
                    |w| {
                        w.on_cover_letter_applied(document_id);
                    },
                )
                .await;
            }
            WizardEvent::Finish => {
                if let Some(mut wizard) = self.wizard.take() {
                    wizard.discard_draft();
                }
                self.notices.success("Application saved");
                self.close_wizard().await;
            }
            WizardEvent::CancelConfirmed => {
                if let Some(mut wizard) = self.wizard.take() {
                    wizard.discard_draft();
                }
                self.notices.info("Draft discarded");
                self.close_wizard().await;
            }
            WizardEvent::Closed => {
                self.notices.info("Draft saved; press w to pick it back up");
                self.close_wizard().await;
            }
            WizardEvent::Notice(text) => self.notices.warn(text),
        }
    }

    async fn create_entity(&mut self, payload: EntityPayload) {
        let kind = payload.kind();
        let result = match &payload {
            EntityPayload::Company(create) => self
                .client
                .create_company(create)
                .await
                .map(CreatedEntity::Company),
            EntityPayload::Contact(create) => self
                .client
                .create_contact(create)
                .await
                .map(CreatedEntity::Contact),
            EntityPayload::Document(create) => self
                .client
                .create_document(create)
                .await
                .map(CreatedEntity::Document),
            EntityPayload::Product(create) => self
                .client
                .create_product(create)
                .await
                .map(CreatedEntity::Product),
            EntityPayload::Event(create) => self
                .client
                .create_event(create)
                .await
                .map(CreatedEntity::Event),
            EntityPayload::Action(create) => self
                .client
                .create_action(create)
                .await
                .map(CreatedEntity::Action),
        };

        match result {
            Ok(entity) => {
                self.notices.success(format!("Added {}", kind.singular()));
                if let Some(wizard) = self.wizard.as_mut() {
                    wizard.on_create_success(entity);
                }
            }
            Err(e) => {
                tracing::warn!("Create {} failed: {}", kind.singular(), e);
                self.notices
                    .error(format!("Could not create the {}: {e}", kind.singular()));
                if let Some(wizard) = self.wizard.as_mut() {
                    wizard.on_create_failure();
                }
            }
        }
    }

    async fn delete_entity(&mut self, kind: EntityKind, id: i64) {
        let result = match kind {
            EntityKind::Company => self.client.delete_company(id).await,
            EntityKind::Contact => self.client.delete_contact(id).await,
            EntityKind::Document => self.client.delete_document(id).await,
            EntityKind::Product => self.client.delete_product(id).await,
            EntityKind::Event => self.client.delete_event(id).await,
            EntityKind::Action => self.client.delete_action(id).await,
        };

        match result {
            Ok(()) => {
                self.notices.success(format!("Deleted {}", kind.singular()));
                if let Some(wizard) = self.wizard.as_mut() {
                    wizard.on_delete_success(kind, id);
                }
            }
            Err(e) => {
                tracing::warn!("Delete {} {} failed: {}", kind.singular(), id, e);
                self.notices
                    .error(format!("Could not delete the {}: {e}", kind.singular()));
                if let Some(wizard) = self.wizard.as_mut() {
                    wizard.on_delete_failure();
                }
            }
        }
    }

    async fn apply_application_link(
        &mut self,
        update: ApplicationUpdate,
        on_applied: impl FnOnce(&mut WizardScreen),
    ) {
        let Some(application_id) = self.wizard.as_ref().and_then(|w| w.state().application_id)
        else {
            if let Some(wizard) = self.wizard.as_mut() {
                wizard.on_link_failure();
            }
            return;
        };
        match self.client.update_application(application_id, &update).await {
            Ok(_) => {
                if let Some(wizard) = self.wizard.as_mut() {
                    on_applied(wizard);
                }
            }
            Err(e) => {
                self.notices
                    .error(format!("Could not update the document link: {e}"));
                if let Some(wizard) = self.wizard.as_mut() {
                    wizard.on_link_failure();
                }
            }
        }
    }

    // -- dashboard data -----------------------------------------------------

    async fn refresh_data(&mut self) -> Result<()> {
        let opportunities = self.client.list_opportunities().await?;
        let applications = self.client.list_applications().await?;
        let events = self.client.list_events().await?;
        let actions = self.client.list_actions().await?;

        self.dashboard
            .update_applications(applications, &opportunities);
        self.dashboard.update_events(events);
        self.dashboard.update_actions(actions);
        Ok(())
    }

    /// Shows or clears the dashboard's draft badge.
    fn refresh_draft_badge(&mut self) {
        let mut storage = self.storage();
        self.dashboard.draft_step =
            peek_draft(storage.as_mut(), self.user.id).map(|draft| draft.step);
    }
}
