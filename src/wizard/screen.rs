//! The wizard screen: key handling, step rendering, and the events it
//! hands to the app layer.
//!
//! The screen never talks to the server. Keys that need a server call
//! return a [`WizardEvent`]; the app performs the request and reports
//! back through the `on_*` methods, which apply the change to the
//! session. Until that callback arrives the affected surface is locked
//! by a pending flag, so there is at most one request in flight.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::types::{
    Action, ActionCreate, Application, Company, CompanyCreate, Contact, ContactCreate, Document,
    DocumentCreate, Product, ProductCreate, ScheduledEvent, ScheduledEventCreate,
    WizardInitRequest,
};
use crate::ui::dialogs::{centered_rect, ConfirmDialog};
use crate::ui::form::EntityForm;
use crate::ui::stepper::render_stepper;
use crate::ui::summary::{annotation, render_summary};
use crate::wizard::forms;
use crate::wizard::nav::WizardNav;
use crate::wizard::session::{WizardState, WizardStore};
use crate::wizard::step_list::StepList;
use crate::wizard::steps::{entities_of, step_by_id, EntityKind};

/// A server-side effect requested by the wizard. The app layer performs
/// the call and reports the outcome back to the screen.
#[derive(Debug)]
pub enum WizardEvent {
    SubmitInit(WizardInitRequest),
    CreateEntity(EntityPayload),
    DeleteEntity(EntityKind, i64),
    SetPrimaryCompany(Option<i64>),
    SetResumeDocument(Option<i64>),
    SetCoverLetterDocument(Option<i64>),
    /// Step 8 confirmed; the app clears the draft and closes the wizard.
    Finish,
    /// The cancel prompt was confirmed; discard the draft and close.
    CancelConfirmed,
    /// Leave the wizard, keeping the draft for later.
    Closed,
    /// Something to tell the user, with no server call involved.
    Notice(String),
}

#[derive(Debug)]
pub enum EntityPayload {
    Company(CompanyCreate),
    Contact(ContactCreate),
    Document(DocumentCreate),
    Product(ProductCreate),
    Event(ScheduledEventCreate),
    Action(ActionCreate),
}

impl EntityPayload {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityPayload::Company(_) => EntityKind::Company,
            EntityPayload::Contact(_) => EntityKind::Contact,
            EntityPayload::Document(_) => EntityKind::Document,
            EntityPayload::Product(_) => EntityKind::Product,
            EntityPayload::Event(_) => EntityKind::Event,
            EntityPayload::Action(_) => EntityKind::Action,
        }
    }
}

/// A record the server accepted, fed back into the session.
pub enum CreatedEntity {
    Company(Company),
    Contact(Contact),
    Document(Document),
    Product(Product),
    Event(ScheduledEvent),
    Action(Action),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmAction {
    DeleteSelected,
    CancelWizard,
}

pub struct WizardScreen {
    store: WizardStore,
    nav: WizardNav,
    /// List machinery for steps 2..=7, absent on steps 1 and 8.
    list: Option<StepList>,
    /// Modal create form, open while the list is in adding mode.
    form: Option<EntityForm>,
    /// Inline step-1 form, present until init succeeds.
    init_form: Option<EntityForm>,
    init_pending: bool,
    link_pending: bool,
    confirm: ConfirmDialog,
    confirm_action: Option<ConfirmAction>,
}

impl WizardScreen {
    /// Builds the screen over an opened (or fresh) session, resuming at
    /// the step the state calls for.
    pub fn new(store: WizardStore) -> Self {
        let nav = WizardNav::resume(store.state());
        let mut screen = Self {
            store,
            nav,
            list: None,
            form: None,
            init_form: None,
            init_pending: false,
            link_pending: false,
            confirm: ConfirmDialog::new(),
            confirm_action: None,
        };
        screen.store.set_last_step(screen.nav.current());
        screen.enter_step();
        screen
    }

    pub fn current_step(&self) -> u8 {
        self.nav.current()
    }

    pub fn state(&self) -> &WizardState {
        self.store.state()
    }

    pub fn store_mut(&mut self) -> &mut WizardStore {
        &mut self.store
    }

    /// Resets the session and removes the stored draft.
    pub fn discard_draft(&mut self) {
        self.store.clear();
    }

    /// True while a form or dialog is capturing keystrokes. The app keeps
    /// global shortcuts out of the way while this holds.
    pub fn is_editing(&self) -> bool {
        self.form.is_some() || self.init_form.is_some() || self.confirm.visible
    }

    fn is_busy(&self) -> bool {
        self.init_pending
            || self.link_pending
            || self.list.as_ref().is_some_and(StepList::pending)
    }

    fn current_len(&self) -> usize {
        self.list
            .as_ref()
            .map_or(0, |l| l.kind().count(self.store.state()))
    }

    /// Rebuilds the per-step widgets after a navigation change.
    fn enter_step(&mut self) {
        let step = self.nav.current();
        self.form = None;
        self.list = EntityKind::for_step(step).map(|kind| {
            let mut list = StepList::new(kind);
            list.clamp_selection(kind.count(self.store.state()));
            list
        });
        self.init_form = if step == 1 && !self.store.state().initialized() {
            Some(EntityForm::new("Get started", forms::init_fields()))
        } else {
            None
        };
    }

    // -- key handling -------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<WizardEvent> {
        if self.confirm.visible {
            return self.handle_confirm_key(key);
        }
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('x'))
        {
            self.open_cancel_prompt();
            return None;
        }
        // Ctrl+S saves from any field, which matters when the focused
        // field is a textarea where Enter inserts a newline.
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('s'))
        {
            if self.init_form.is_some() {
                if self.init_pending {
                    return None;
                }
                return self.submit_init();
            }
            if self.form.is_some() {
                if self.list.as_ref().is_some_and(StepList::pending) {
                    return None;
                }
                return self.submit_entity();
            }
            return None;
        }
        if self.init_form.is_some() {
            return self.handle_init_form_key(key);
        }
        if self.form.is_some() {
            return self.handle_entity_form_key(key);
        }
        self.handle_browse_key(key)
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Option<WizardEvent> {
        match key.code {
            KeyCode::Left
            | KeyCode::Right
            | KeyCode::Tab
            | KeyCode::Char('h')
            | KeyCode::Char('l') => {
                self.confirm.toggle_selection();
                None
            }
            KeyCode::Char('y') => self.apply_confirmed(),
            KeyCode::Char('n') | KeyCode::Esc => {
                self.decline_confirm();
                None
            }
            KeyCode::Enter => {
                if self.confirm.is_confirm_selected() {
                    self.apply_confirmed()
                } else {
                    self.decline_confirm();
                    None
                }
            }
            _ => None,
        }
    }

    fn apply_confirmed(&mut self) -> Option<WizardEvent> {
        self.confirm.hide();
        match self.confirm_action.take()? {
            ConfirmAction::DeleteSelected => {
                let list = self.list.as_mut()?;
                let kind = list.kind();
                let id = list.confirm_delete()?;
                Some(WizardEvent::DeleteEntity(kind, id))
            }
            ConfirmAction::CancelWizard => Some(WizardEvent::CancelConfirmed),
        }
    }

    fn decline_confirm(&mut self) {
        self.confirm.hide();
        if self.confirm_action.take() == Some(ConfirmAction::DeleteSelected) {
            if let Some(list) = self.list.as_mut() {
                list.cancel_delete();
            }
        }
    }

    fn handle_init_form_key(&mut self, key: KeyEvent) -> Option<WizardEvent> {
        if self.init_pending {
            return None;
        }
        let multiline = self
            .init_form
            .as_ref()
            .is_some_and(EntityForm::focused_is_multiline);
        let form = self.init_form.as_mut()?;
        match key.code {
            KeyCode::Esc => Some(WizardEvent::Closed),
            KeyCode::Tab => {
                form.next_field();
                None
            }
            KeyCode::BackTab => {
                form.prev_field();
                None
            }
            KeyCode::Enter if !multiline => {
                if form.is_last_field() {
                    self.submit_init()
                } else {
                    form.next_field();
                    None
                }
            }
            code => {
                form.handle_key(code);
                None
            }
        }
    }

    fn submit_init(&mut self) -> Option<WizardEvent> {
        let request = {
            let form = self.init_form.as_mut()?;
            if !forms::validate_init(form) {
                return None;
            }
            forms::init_request(form)
        };
        self.init_pending = true;
        Some(WizardEvent::SubmitInit(request))
    }

    fn handle_entity_form_key(&mut self, key: KeyEvent) -> Option<WizardEvent> {
        if self.list.as_ref().is_some_and(StepList::pending) {
            return None;
        }
        let multiline = self
            .form
            .as_ref()
            .is_some_and(EntityForm::focused_is_multiline);
        match key.code {
            KeyCode::Esc => {
                if let Some(list) = self.list.as_mut() {
                    list.cancel_add();
                }
                self.form = None;
                None
            }
            KeyCode::Tab => {
                if let Some(form) = self.form.as_mut() {
                    form.next_field();
                }
                None
            }
            KeyCode::BackTab => {
                if let Some(form) = self.form.as_mut() {
                    form.prev_field();
                }
                None
            }
            KeyCode::Enter if !multiline => {
                let last = self.form.as_ref().is_some_and(EntityForm::is_last_field);
                if last {
                    self.submit_entity()
                } else {
                    if let Some(form) = self.form.as_mut() {
                        form.next_field();
                    }
                    None
                }
            }
            code => {
                if let Some(form) = self.form.as_mut() {
                    form.handle_key(code);
                }
                None
            }
        }
    }

    fn submit_entity(&mut self) -> Option<WizardEvent> {
        let kind = self.list.as_ref()?.kind();
        let application_id = self.store.state().application_id.unwrap_or_default();
        let payload = {
            let form = self.form.as_mut()?;
            if !form.validate() {
                return None;
            }
            match kind {
                EntityKind::Company => EntityPayload::Company(forms::company_create(form)),
                EntityKind::Contact => EntityPayload::Contact(forms::contact_create(form)),
                EntityKind::Document => EntityPayload::Document(forms::document_create(form)),
                EntityKind::Product => EntityPayload::Product(forms::product_create(form)),
                EntityKind::Event => EntityPayload::Event(forms::event_create(form)),
                EntityKind::Action => {
                    EntityPayload::Action(forms::action_create(form, application_id))
                }
            }
        };
        if !self.list.as_mut()?.begin_submit() {
            return None;
        }
        Some(WizardEvent::CreateEntity(payload))
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Option<WizardEvent> {
        if matches!(key.code, KeyCode::Esc) {
            return Some(WizardEvent::Closed);
        }
        if self.is_busy() {
            return None;
        }
        match key.code {
            KeyCode::Char('n') | KeyCode::Right | KeyCode::Enter => self.advance(),
            KeyCode::Char('p') | KeyCode::Left => {
                if self.nav.back() {
                    self.store.set_last_step(self.nav.current());
                    self.enter_step();
                }
                None
            }
            KeyCode::Char(c @ '1'..='8') => {
                self.jump(c as u8 - b'0');
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let len = self.current_len();
                if let Some(list) = self.list.as_mut() {
                    list.select_prev(len);
                }
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.current_len();
                if let Some(list) = self.list.as_mut() {
                    list.select_next(len);
                }
                None
            }
            KeyCode::Char('a') => self.open_add(),
            KeyCode::Char('d') => self.request_delete(),
            KeyCode::Char('l') => self.toggle_primary_company(),
            KeyCode::Char('r') => self.toggle_document_role(DocumentRole::Resume),
            KeyCode::Char('c') => self.toggle_document_role(DocumentRole::CoverLetter),
            _ => None,
        }
    }

    fn advance(&mut self) -> Option<WizardEvent> {
        if self.nav.is_last() {
            return Some(WizardEvent::Finish);
        }
        if self.nav.next(self.store.state()) {
            self.store.set_last_step(self.nav.current());
            self.enter_step();
        }
        None
    }

    fn jump(&mut self, step: u8) {
        if self.nav.goto(step) {
            self.store.set_last_step(step);
            self.enter_step();
        }
    }

    fn open_add(&mut self) -> Option<WizardEvent> {
        let kind = self.list.as_ref()?.kind();
        if kind == EntityKind::Product && self.store.state().created_companies.is_empty() {
            return Some(WizardEvent::Notice(
                "Products need a company; add one on step 2 first".to_string(),
            ));
        }
        if self.list.as_mut()?.open_add() {
            self.form = Some(self.build_form(kind));
        }
        None
    }

    fn build_form(&self, kind: EntityKind) -> EntityForm {
        let state = self.store.state();
        let fields = match kind {
            EntityKind::Company => forms::company_fields(),
            EntityKind::Contact => forms::contact_fields(state),
            EntityKind::Document => forms::document_fields(),
            EntityKind::Product => forms::product_fields(state),
            EntityKind::Event => forms::event_fields(),
            EntityKind::Action => forms::action_fields(state),
        };
        EntityForm::new(format!("New {}", kind.singular()), fields)
    }

    fn request_delete(&mut self) -> Option<WizardEvent> {
        let (kind, id, label) = {
            let list = self.list.as_ref()?;
            let kind = list.kind();
            let entities = entities_of(kind, self.store.state());
            let entity = entities.get(list.selected())?;
            (kind, entity.id(), entity.label())
        };
        if self.list.as_mut()?.request_delete(id, label.clone()) {
            self.confirm_action = Some(ConfirmAction::DeleteSelected);
            self.confirm.show(
                format!("Delete {}?", kind.singular()),
                vec![
                    label,
                    String::new(),
                    "This also deletes it on the server.".to_string(),
                ],
            );
        }
        None
    }

    fn toggle_primary_company(&mut self) -> Option<WizardEvent> {
        let list = self.list.as_ref()?;
        if list.kind() != EntityKind::Company {
            return None;
        }
        let state = self.store.state();
        let entities = entities_of(EntityKind::Company, state);
        let id = entities.get(list.selected())?.id();
        let target = if state.linked_company_id == Some(id) {
            None
        } else {
            Some(id)
        };
        self.link_pending = true;
        Some(WizardEvent::SetPrimaryCompany(target))
    }

    fn toggle_document_role(&mut self, role: DocumentRole) -> Option<WizardEvent> {
        let list = self.list.as_ref()?;
        if list.kind() != EntityKind::Document {
            return None;
        }
        let state = self.store.state();
        let entities = entities_of(EntityKind::Document, state);
        let id = entities.get(list.selected())?.id();
        let current = match role {
            DocumentRole::Resume => state.resume_document_id,
            DocumentRole::CoverLetter => state.cover_letter_document_id,
        };
        let target = if current == Some(id) { None } else { Some(id) };
        self.link_pending = true;
        Some(match role {
            DocumentRole::Resume => WizardEvent::SetResumeDocument(target),
            DocumentRole::CoverLetter => WizardEvent::SetCoverLetterDocument(target),
        })
    }

    fn open_cancel_prompt(&mut self) {
        self.confirm_action = Some(ConfirmAction::CancelWizard);
        self.confirm.show(
            "Cancel application?",
            vec![
                "This discards the local draft.".to_string(),
                "Records already created stay on the server.".to_string(),
            ],
        );
    }

    // -- server outcome callbacks -------------------------------------------

    pub fn on_init_success(&mut self, application: &Application) {
        self.store
            .set_init_ids(application.id, application.opportunity_id);
        self.init_pending = false;
        self.init_form = None;
        if self.nav.next(self.store.state()) {
            self.store.set_last_step(self.nav.current());
        }
        self.enter_step();
    }

    /// Keeps the form (and its values) open for another attempt.
    pub fn on_init_failure(&mut self) {
        self.init_pending = false;
    }

    pub fn on_create_success(&mut self, entity: CreatedEntity) {
        match entity {
            CreatedEntity::Company(c) => self.store.add_company(c),
            CreatedEntity::Contact(c) => self.store.add_contact(c),
            CreatedEntity::Document(d) => self.store.add_document(d),
            CreatedEntity::Product(p) => self.store.add_product(p),
            CreatedEntity::Event(e) => self.store.add_event(e),
            CreatedEntity::Action(a) => self.store.add_action(a),
        }
        self.form = None;
        let len = self.current_len();
        if let Some(list) = self.list.as_mut() {
            list.creation_succeeded();
            list.clamp_selection(len);
        }
    }

    pub fn on_create_failure(&mut self) {
        if let Some(list) = self.list.as_mut() {
            list.creation_failed();
        }
    }

    pub fn on_delete_success(&mut self, kind: EntityKind, id: i64) {
        match kind {
            EntityKind::Company => self.store.remove_company(id),
            EntityKind::Contact => self.store.remove_contact(id),
            EntityKind::Document => self.store.remove_document(id),
            EntityKind::Product => self.store.remove_product(id),
            EntityKind::Event => self.store.remove_event(id),
            EntityKind::Action => self.store.remove_action(id),
        }
        let len = self.current_len();
        if let Some(list) = self.list.as_mut() {
            list.delete_succeeded(len);
        }
    }

    pub fn on_delete_failure(&mut self) {
        if let Some(list) = self.list.as_mut() {
            list.delete_failed();
        }
    }

    pub fn on_primary_company_applied(&mut self, company_id: Option<i64>) {
        self.store.set_linked_company_id(company_id);
        self.link_pending = false;
    }

    pub fn on_resume_document_applied(&mut self, document_id: Option<i64>) {
        self.store.set_resume_document_id(document_id);
        self.link_pending = false;
    }

    pub fn on_cover_letter_applied(&mut self, document_id: Option<i64>) {
        self.store.set_cover_letter_document_id(document_id);
        self.link_pending = false;
    }

    pub fn on_link_failure(&mut self) {
        self.link_pending = false;
    }

    // -- rendering ----------------------------------------------------------

    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(2),
            ])
            .split(frame.area());

        render_stepper(frame, chunks[0], &self.nav, self.store.state());

        match self.nav.current() {
            1 => self.render_step_one(frame, chunks[1]),
            8 => render_summary(frame, chunks[1], self.store.state()),
            _ => self.render_entity_list(frame, chunks[1]),
        }

        self.render_footer(frame, chunks[2]);

        if self.form.is_some() {
            self.render_form_dialog(frame);
        }
        self.confirm.render(frame);
    }

    fn render_step_one(&mut self, frame: &mut Frame, area: Rect) {
        if self.init_form.is_some() {
            let pending = self.init_pending;
            let block = Block::default()
                .title(" Get started ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan));
            let inner = block.inner(area);
            frame.render_widget(block, area);
            if let Some(form) = self.init_form.as_mut() {
                let form_area = Rect {
                    x: inner.x + 1,
                    y: inner.y,
                    width: inner.width.saturating_sub(2),
                    height: inner.height.saturating_sub(1),
                };
                form.render(frame, form_area);
            }
            if pending {
                let line = Paragraph::new(Span::styled(
                    "Creating application...",
                    Style::default().fg(Color::Yellow),
                ));
                frame.render_widget(
                    line,
                    Rect {
                        x: inner.x + 1,
                        y: inner.y + inner.height.saturating_sub(1),
                        width: inner.width.saturating_sub(2),
                        height: 1,
                    },
                );
            }
            return;
        }

        let state = self.store.state();
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Application created.",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "  Application #{}  ·  Opportunity #{}",
                    state.application_id.unwrap_or_default(),
                    state.opportunity_id.unwrap_or_default()
                ),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  Press n to continue to companies.",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let block = Block::default()
            .title(" Get started ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_entity_list(&mut self, frame: &mut Frame, area: Rect) {
        let Some(list) = self.list.as_ref() else {
            return;
        };
        let kind = list.kind();
        let selected = list.selected();
        let state = self.store.state();
        let entities = entities_of(kind, state);

        let step_title = step_by_id(self.nav.current()).map_or("", |s| s.title);
        let title = format!(" {} ({}) ", step_title, entities.len());
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        if entities.is_empty() {
            let hint = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("  {}", kind.empty_hint()),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "  Press a to add one, or n to skip this step.",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .block(block);
            frame.render_widget(hint, area);
            return;
        }

        let items: Vec<ListItem> = entities
            .iter()
            .map(|entity| {
                let mut spans = vec![Span::styled(
                    entity.label(),
                    Style::default().fg(Color::White),
                )];
                if let Some(tag) = annotation(kind, entity.id(), state) {
                    spans.push(Span::raw(" "));
                    spans.push(Span::styled(
                        tag,
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let widget = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        list_state.select(Some(selected));
        frame.render_stateful_widget(widget, area, &mut list_state);
    }

    fn render_form_dialog(&mut self, frame: &mut Frame) {
        let pending = self.list.as_ref().is_some_and(StepList::pending);
        let Some(form) = self.form.as_mut() else {
            return;
        };

        let area = centered_rect(70, 80, frame.area());
        frame.render_widget(Clear, area);
        let block = Block::default()
            .title(format!(" {} ", form.title()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .margin(1)
            .split(inner);
        form.render(frame, chunks[0]);

        let hint = if pending {
            Span::styled("Saving...", Style::default().fg(Color::Yellow))
        } else {
            Span::styled(
                "[Tab] next  [Shift+Tab] prev  [Ctrl+S] save  [Esc] close",
                Style::default().fg(Color::DarkGray),
            )
        };
        frame.render_widget(Paragraph::new(Line::from(hint)), chunks[1]);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        if self.is_busy() {
            spans.push(Span::styled(
                "Working...  ",
                Style::default().fg(Color::Yellow),
            ));
        }
        spans.push(Span::styled(
            self.footer_hint(),
            Style::default().fg(Color::DarkGray),
        ));
        let bar = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::TOP));
        frame.render_widget(bar, area);
    }

    fn footer_hint(&self) -> String {
        let step = self.nav.current();
        if step == 1 {
            if self.init_form.is_some() {
                return " [Tab] next field  [Ctrl+S] create  [Esc] leave  [Ctrl+X] cancel"
                    .to_string();
            }
            return " [n] continue  [Esc] leave  [Ctrl+X] cancel".to_string();
        }
        if step == 8 {
            return " [Enter] finish  [p] back  [1-8] jump  [Esc] leave  [Ctrl+X] cancel"
                .to_string();
        }
        let role_keys = match self.list.as_ref().map(StepList::kind) {
            Some(EntityKind::Company) => "[l] primary  ",
            Some(EntityKind::Document) => "[r] resume  [c] cover  ",
            _ => "",
        };
        format!(
            " [a] add  [d] delete  {role_keys}[n] next  [p] back  [1-8] jump  [Esc] leave"
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum DocumentRole {
    Resume,
    CoverLetter,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::session::session_key;
    use crate::wizard::storage::MemoryStorage;
    use serde_json::json;

    fn press(screen: &mut WizardScreen, code: KeyCode) -> Option<WizardEvent> {
        screen.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(screen: &mut WizardScreen, s: &str) {
        for c in s.chars() {
            press(screen, KeyCode::Char(c));
        }
    }

    fn fresh_screen() -> WizardScreen {
        WizardScreen::new(WizardStore::fresh(1, Box::new(MemoryStorage::new())))
    }

    fn application(id: i64, opportunity_id: i64) -> Application {
        serde_json::from_value(json!({
            "id": id,
            "application_date": "2024-01-10",
            "status": "pending",
            "opportunity_id": opportunity_id,
            "created_at": "2024-01-10T09:30:00Z"
        }))
        .unwrap()
    }

    fn company(id: i64, name: &str) -> Company {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "created_at": "2024-01-10T09:30:00Z"
        }))
        .unwrap()
    }

    fn document(id: i64, name: &str) -> Document {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "type": "resume",
            "format": "pdf",
            "path": "/documents/cv.pdf",
            "created_at": "2024-01-10T09:30:00Z"
        }))
        .unwrap()
    }

    fn submit_form(screen: &mut WizardScreen) -> Option<WizardEvent> {
        screen.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
    }

    fn initialized_screen() -> WizardScreen {
        let mut screen = fresh_screen();
        type_str(&mut screen, "Backend Engineer");
        let event = submit_form(&mut screen);
        assert!(matches!(event, Some(WizardEvent::SubmitInit(_))));
        screen.on_init_success(&application(10, 20));
        screen
    }

    #[test]
    fn test_fresh_wizard_starts_on_init_form() {
        let screen = fresh_screen();
        assert_eq!(screen.current_step(), 1);
        assert!(screen.init_form.is_some());
    }

    #[test]
    fn test_init_submit_and_advance() {
        let screen = initialized_screen();
        assert_eq!(screen.current_step(), 2);
        assert!(screen.state().initialized());
        assert_eq!(screen.state().application_id, Some(10));
    }

    #[test]
    fn test_init_validation_blocks_submit() {
        let mut screen = fresh_screen();
        // job title left empty
        assert!(submit_form(&mut screen).is_none());
        assert!(!screen.init_pending);
    }

    #[test]
    fn test_init_double_submit_blocked_while_pending() {
        let mut screen = fresh_screen();
        type_str(&mut screen, "Backend Engineer");
        assert!(matches!(
            submit_form(&mut screen),
            Some(WizardEvent::SubmitInit(_))
        ));
        assert!(submit_form(&mut screen).is_none());

        screen.on_init_failure();
        // values survive a failed attempt
        assert!(matches!(
            submit_form(&mut screen),
            Some(WizardEvent::SubmitInit(_))
        ));
    }

    #[test]
    fn test_create_company_flow() {
        let mut screen = initialized_screen();
        assert!(press(&mut screen, KeyCode::Char('a')).is_none());
        assert!(screen.form.is_some());

        type_str(&mut screen, "Acme");
        let event = submit_form(&mut screen);
        let Some(WizardEvent::CreateEntity(payload)) = event else {
            panic!("expected create event");
        };
        assert_eq!(payload.kind(), EntityKind::Company);

        screen.on_create_success(CreatedEntity::Company(company(1, "Acme")));
        assert!(screen.form.is_none());
        assert_eq!(screen.state().created_companies.len(), 1);
    }

    #[test]
    fn test_create_failure_keeps_form_open() {
        let mut screen = initialized_screen();
        press(&mut screen, KeyCode::Char('a'));
        type_str(&mut screen, "Acme");
        assert!(submit_form(&mut screen).is_some());

        screen.on_create_failure();
        assert!(screen.form.is_some());
        // retry fires again
        assert!(matches!(
            submit_form(&mut screen),
            Some(WizardEvent::CreateEntity(_))
        ));
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let mut screen = initialized_screen();
        screen.on_create_success(CreatedEntity::Company(company(1, "Acme")));

        assert!(press(&mut screen, KeyCode::Char('d')).is_none());
        assert!(screen.confirm.visible);

        // default selection is No; Enter declines
        assert!(press(&mut screen, KeyCode::Enter).is_none());
        assert!(!screen.confirm.visible);
        assert_eq!(screen.state().created_companies.len(), 1);

        press(&mut screen, KeyCode::Char('d'));
        let event = press(&mut screen, KeyCode::Char('y'));
        assert!(matches!(
            event,
            Some(WizardEvent::DeleteEntity(EntityKind::Company, 1))
        ));
        screen.on_delete_success(EntityKind::Company, 1);
        assert!(screen.state().created_companies.is_empty());
    }

    #[test]
    fn test_primary_company_toggle() {
        let mut screen = initialized_screen();
        screen.on_create_success(CreatedEntity::Company(company(1, "Acme")));

        let event = press(&mut screen, KeyCode::Char('l'));
        assert!(matches!(
            event,
            Some(WizardEvent::SetPrimaryCompany(Some(1)))
        ));
        screen.on_primary_company_applied(Some(1));
        assert_eq!(screen.state().linked_company_id, Some(1));

        // toggling again unlinks
        let event = press(&mut screen, KeyCode::Char('l'));
        assert!(matches!(event, Some(WizardEvent::SetPrimaryCompany(None))));
    }

    #[test]
    fn test_document_role_keys() {
        let mut screen = initialized_screen();
        press(&mut screen, KeyCode::Char('4'));
        assert_eq!(screen.current_step(), 2); // jump beyond ceiling ignored

        // walk forward to documents
        press(&mut screen, KeyCode::Char('n'));
        press(&mut screen, KeyCode::Char('n'));
        assert_eq!(screen.current_step(), 4);
        screen.on_create_success(CreatedEntity::Document(document(7, "CV")));

        let event = press(&mut screen, KeyCode::Char('r'));
        assert!(matches!(
            event,
            Some(WizardEvent::SetResumeDocument(Some(7)))
        ));
        screen.on_resume_document_applied(Some(7));

        let event = press(&mut screen, KeyCode::Char('c'));
        assert!(matches!(
            event,
            Some(WizardEvent::SetCoverLetterDocument(Some(7)))
        ));
        screen.on_cover_letter_applied(Some(7));
        assert_eq!(screen.state().cover_letter_document_id, Some(7));
        assert_eq!(screen.state().resume_document_id, None);
    }

    #[test]
    fn test_product_add_requires_company() {
        let mut screen = initialized_screen();
        press(&mut screen, KeyCode::Char('n'));
        press(&mut screen, KeyCode::Char('n'));
        press(&mut screen, KeyCode::Char('n'));
        assert_eq!(screen.current_step(), 5);

        let event = press(&mut screen, KeyCode::Char('a'));
        assert!(matches!(event, Some(WizardEvent::Notice(_))));
        assert!(screen.form.is_none());
    }

    #[test]
    fn test_jump_within_ceiling_and_back() {
        let mut screen = initialized_screen();
        for _ in 0..4 {
            press(&mut screen, KeyCode::Char('n'));
        }
        assert_eq!(screen.current_step(), 6);

        press(&mut screen, KeyCode::Char('3'));
        assert_eq!(screen.current_step(), 3);
        // ceiling preserved: jumping forward to 6 still allowed
        press(&mut screen, KeyCode::Char('6'));
        assert_eq!(screen.current_step(), 6);
        press(&mut screen, KeyCode::Char('8'));
        assert_eq!(screen.current_step(), 6);
    }

    #[test]
    fn test_finish_from_summary() {
        let mut screen = initialized_screen();
        for _ in 0..5 {
            press(&mut screen, KeyCode::Char('n'));
        }
        assert_eq!(screen.current_step(), 7);
        press(&mut screen, KeyCode::Char('n'));
        assert_eq!(screen.current_step(), 8);

        let event = press(&mut screen, KeyCode::Enter);
        assert!(matches!(event, Some(WizardEvent::Finish)));
    }

    #[test]
    fn test_escape_closes_keeping_draft() {
        let mut screen = initialized_screen();
        let event = press(&mut screen, KeyCode::Esc);
        assert!(matches!(event, Some(WizardEvent::Closed)));
        assert!(screen.state().initialized());
    }

    #[test]
    fn test_cancel_prompt_flow() {
        let mut screen = initialized_screen();
        let none = screen.handle_key(KeyEvent::new(
            KeyCode::Char('x'),
            KeyModifiers::CONTROL,
        ));
        assert!(none.is_none());
        assert!(screen.confirm.visible);

        let event = press(&mut screen, KeyCode::Char('y'));
        assert!(matches!(event, Some(WizardEvent::CancelConfirmed)));
    }

    #[test]
    fn test_resume_lands_on_last_step() {
        let storage = MemoryStorage::new();
        let mut store = WizardStore::open(1, Box::new(storage));
        store.set_init_ids(10, 20);
        store.set_last_step(5);

        let screen = WizardScreen::new(store);
        assert_eq!(screen.current_step(), 5);
        // all earlier steps jumpable again
        assert!(screen.nav.can_goto(2));
        assert!(!screen.nav.can_goto(6));
    }

    #[test]
    fn test_navigation_locked_while_request_in_flight() {
        let mut screen = initialized_screen();
        press(&mut screen, KeyCode::Char('a'));
        type_str(&mut screen, "Acme");
        assert!(submit_form(&mut screen).is_some());

        // form input frozen until the callback lands
        assert!(press(&mut screen, KeyCode::Esc).is_none());
        screen.on_create_success(CreatedEntity::Company(company(1, "Acme")));
        press(&mut screen, KeyCode::Char('n'));
        assert_eq!(screen.current_step(), 3);
    }

    #[test]
    fn test_last_step_persisted_for_resume() {
        let mut screen = initialized_screen();
        press(&mut screen, KeyCode::Char('n'));
        assert_eq!(screen.state().last_step, 3);

        // leaving and reopening the same storage resumes at 3
        let raw = serde_json::to_string(&crate::wizard::session::WizardSession {
            state: screen.state().clone(),
            last_updated: chrono::Utc::now(),
        })
        .unwrap();
        let storage = MemoryStorage::new().with_entry(&session_key(1), &raw);
        let reopened = WizardScreen::new(WizardStore::open(1, Box::new(storage)));
        assert_eq!(reopened.current_step(), 3);
    }
}
