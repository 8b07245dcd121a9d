pub mod dashboard;
pub mod dialogs;
pub mod form;
pub mod notices;
pub mod panels;
pub mod stepper;
pub mod summary;

pub use dashboard::{Dashboard, FocusedPanel};
pub use dialogs::{ConfirmDialog, HelpDialog};
pub use form::{EntityForm, FieldKind, FieldSpec};
pub use notices::{NoticeLevel, Notices};
