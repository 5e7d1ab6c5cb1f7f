//! Per-row action buttons.

use std::fmt;
use std::sync::Arc;

/// Visual style of an action control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionKind {
    #[default]
    Link,
    Primary,
    Default,
    Dashed,
    Text,
}

/// Called with the row's record when its action is clicked.
pub type ActionHandler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// An action offered on every row, rendered in the trailing actions column.
///
/// # Example
///
/// ```ignore
/// let delete = RowAction::new("Delete", move |user: &User| {
///     if commands.send(Command::Delete(user.id)).is_err() {
///         log::warn!("Delete of {} dropped", user.id);
///     }
/// })
/// .danger();
/// ```
pub struct RowAction<T> {
    pub label: String,
    pub kind: ActionKind,
    pub danger: bool,
    pub disabled: bool,
    pub loading: bool,
    on_click: ActionHandler<T>,
}

impl<T> RowAction<T> {
    pub fn new(label: impl Into<String>, on_click: impl Fn(&T) + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            kind: ActionKind::default(),
            danger: false,
            disabled: false,
            loading: false,
            on_click: Arc::new(on_click),
        }
    }

    pub fn kind(mut self, kind: ActionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Style the control as destructive.
    pub fn danger(mut self) -> Self {
        self.danger = true;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub(crate) fn invoke(&self, record: &T) {
        (self.on_click)(record)
    }

    /// The control rendered for this action on a grid that is (or isn't) disabled.
    pub(crate) fn control(&self, index: usize, grid_disabled: bool) -> ActionControl {
        ActionControl {
            index,
            label: self.label.clone(),
            kind: self.kind,
            danger: self.danger,
            disabled: grid_disabled || self.disabled,
            loading: self.loading,
        }
    }
}

impl<T> Clone for RowAction<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            kind: self.kind,
            danger: self.danger,
            disabled: self.disabled,
            loading: self.loading,
            on_click: Arc::clone(&self.on_click),
        }
    }
}

impl<T> fmt::Debug for RowAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAction")
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("danger", &self.danger)
            .field("disabled", &self.disabled)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

/// A rendered action control in one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionControl {
    /// Position of the action in the grid's action list.
    pub index: usize,
    pub label: String,
    pub kind: ActionKind,
    pub danger: bool,
    /// Grid disabled OR the action's own flag.
    pub disabled: bool,
    pub loading: bool,
}

impl ActionControl {
    /// Whether a click on this control does anything.
    pub fn is_interactive(&self) -> bool {
        !self.disabled && !self.loading
    }
}
