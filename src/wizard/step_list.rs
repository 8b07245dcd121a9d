//! Interaction state for the six list steps.
//!
//! One [`StepList`] instance drives whichever entity kind the current
//! step manages: list selection, the add-form dialog, the delete
//! confirmation, and the single in-flight mutation flag. It carries no
//! entity data itself; the session state owns that, and rendering reads
//! both side by side.
//!
//! The pending flag is the double-submit guard: while a create or
//! delete is on the wire, further submissions are refused until the
//! result comes back.

use crate::wizard::steps::EntityKind;

#[derive(Debug, Clone, PartialEq)]
pub enum ListMode {
    Browsing,
    /// Create form dialog is open. The form itself lives in the screen.
    Adding,
    /// Delete confirmation is showing for this entity.
    ConfirmingDelete { id: i64, label: String },
}

#[derive(Debug)]
pub struct StepList {
    kind: EntityKind,
    selected: usize,
    mode: ListMode,
    pending: bool,
}

impl StepList {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            selected: 0,
            mode: ListMode::Browsing,
            pending: false,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn mode(&self) -> &ListMode {
        &self.mode
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn pending(&self) -> bool {
        self.pending
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    /// Keeps the selection in range after the list shrank.
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn open_add(&mut self) -> bool {
        if self.pending || self.mode != ListMode::Browsing {
            return false;
        }
        self.mode = ListMode::Adding;
        true
    }

    pub fn cancel_add(&mut self) {
        if !self.pending && self.mode == ListMode::Adding {
            self.mode = ListMode::Browsing;
        }
    }

    /// Arms the submit. Returns false while a mutation is already in
    /// flight, which is what blocks a double Enter.
    pub fn begin_submit(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Server accepted the create: close the form, back to the list.
    pub fn creation_succeeded(&mut self) {
        self.pending = false;
        self.mode = ListMode::Browsing;
    }

    /// Server refused the create: keep the form open with its values so
    /// the user can correct and resubmit.
    pub fn creation_failed(&mut self) {
        self.pending = false;
    }

    pub fn request_delete(&mut self, id: i64, label: String) -> bool {
        if self.pending || self.mode != ListMode::Browsing {
            return false;
        }
        self.mode = ListMode::ConfirmingDelete { id, label };
        true
    }

    pub fn cancel_delete(&mut self) {
        if matches!(self.mode, ListMode::ConfirmingDelete { .. }) && !self.pending {
            self.mode = ListMode::Browsing;
        }
    }

    /// Confirms the pending delete, closing the dialog and arming the
    /// in-flight flag. Returns the id to delete, or `None` when nothing
    /// was awaiting confirmation.
    pub fn confirm_delete(&mut self) -> Option<i64> {
        if self.pending {
            return None;
        }
        let ListMode::ConfirmingDelete { id, .. } = self.mode else {
            return None;
        };
        self.mode = ListMode::Browsing;
        self.pending = true;
        Some(id)
    }

    pub fn delete_succeeded(&mut self, remaining: usize) {
        self.pending = false;
        self.clamp_selection(remaining);
    }

    /// The entity stays in the list; nothing moves.
    pub fn delete_failed(&mut self) {
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_wraps() {
        let mut list = StepList::new(EntityKind::Company);
        list.select_next(3);
        list.select_next(3);
        assert_eq!(list.selected(), 2);
        list.select_next(3);
        assert_eq!(list.selected(), 0);
        list.select_prev(3);
        assert_eq!(list.selected(), 2);
    }

    #[test]
    fn test_selection_on_empty_list() {
        let mut list = StepList::new(EntityKind::Contact);
        list.select_next(0);
        list.select_prev(0);
        assert_eq!(list.selected(), 0);
    }

    #[test]
    fn test_clamp_after_removal() {
        let mut list = StepList::new(EntityKind::Document);
        list.select_next(3);
        list.select_next(3);
        assert_eq!(list.selected(), 2);

        list.clamp_selection(2);
        assert_eq!(list.selected(), 1);
        list.clamp_selection(0);
        assert_eq!(list.selected(), 0);
    }

    #[test]
    fn test_double_submit_is_refused() {
        let mut list = StepList::new(EntityKind::Company);
        assert!(list.open_add());
        assert!(list.begin_submit());
        assert!(!list.begin_submit());

        list.creation_failed();
        assert!(list.begin_submit());
    }

    #[test]
    fn test_creation_success_closes_form() {
        let mut list = StepList::new(EntityKind::Event);
        list.open_add();
        list.begin_submit();
        list.creation_succeeded();
        assert_eq!(*list.mode(), ListMode::Browsing);
        assert!(!list.pending());
    }

    #[test]
    fn test_creation_failure_keeps_form_open() {
        let mut list = StepList::new(EntityKind::Event);
        list.open_add();
        list.begin_submit();
        list.creation_failed();
        assert_eq!(*list.mode(), ListMode::Adding);
        assert!(!list.pending());
    }

    #[test]
    fn test_delete_flow() {
        let mut list = StepList::new(EntityKind::Contact);
        assert!(list.request_delete(7, "Jane Doe".to_string()));
        assert!(matches!(
            list.mode(),
            ListMode::ConfirmingDelete { id: 7, .. }
        ));

        assert_eq!(list.confirm_delete(), Some(7));
        assert!(list.pending());
        assert_eq!(*list.mode(), ListMode::Browsing);

        list.delete_succeeded(0);
        assert!(!list.pending());
    }

    #[test]
    fn test_delete_cancel() {
        let mut list = StepList::new(EntityKind::Contact);
        list.request_delete(7, "Jane Doe".to_string());
        list.cancel_delete();
        assert_eq!(*list.mode(), ListMode::Browsing);
        assert_eq!(list.confirm_delete(), None);
    }

    #[test]
    fn test_no_add_while_pending() {
        let mut list = StepList::new(EntityKind::Action);
        list.request_delete(1, "follow up".to_string());
        list.confirm_delete();
        assert!(!list.open_add());

        list.delete_failed();
        assert!(list.open_add());
    }
}
