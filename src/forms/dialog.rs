/// Progress of the open dialog's submission
#[derive(Debug, Clone)]
pub struct Submission<Err> {
    pub pending: bool,
    pub error: Option<Err>,
}

impl<Err> Default for Submission<Err> {
    fn default() -> Self {
        Self {
            pending: false,
            error: None,
        }
    }
}

/// The one dialog a screen may have open.
///
/// Create, edit and delete confirmation are variants of a single value, so
/// two dialogs can never be open at once.
#[derive(Debug, Clone)]
pub enum DialogState<E, Err> {
    Closed,
    Creating(Submission<Err>),
    Editing {
        target: E,
        submission: Submission<Err>,
    },
    ConfirmingDelete {
        target: E,
        submission: Submission<Err>,
    },
}

impl<E, Err> Default for DialogState<E, Err> {
    fn default() -> Self {
        Self::Closed
    }
}

impl<E, Err> DialogState<E, Err> {
    pub fn creating() -> Self {
        Self::Creating(Submission::default())
    }

    pub fn editing(target: E) -> Self {
        Self::Editing {
            target,
            submission: Submission::default(),
        }
    }

    pub fn confirming_delete(target: E) -> Self {
        Self::ConfirmingDelete {
            target,
            submission: Submission::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn is_pending(&self) -> bool {
        self.submission().is_some_and(|s| s.pending)
    }

    /// Record being edited or deleted
    pub fn target(&self) -> Option<&E> {
        match self {
            Self::Editing { target, .. } | Self::ConfirmingDelete { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn submission(&self) -> Option<&Submission<Err>> {
        match self {
            Self::Closed => None,
            Self::Creating(submission)
            | Self::Editing { submission, .. }
            | Self::ConfirmingDelete { submission, .. } => Some(submission),
        }
    }

    pub fn submission_mut(&mut self) -> Option<&mut Submission<Err>> {
        match self {
            Self::Closed => None,
            Self::Creating(submission)
            | Self::Editing { submission, .. }
            | Self::ConfirmingDelete { submission, .. } => Some(submission),
        }
    }

    pub fn error(&self) -> Option<&Err> {
        self.submission().and_then(|s| s.error.as_ref())
    }

    /// Mark the submission in flight and clear the last error. Returns `false`
    /// when closed or already pending.
    pub fn start(&mut self) -> bool {
        match self.submission_mut() {
            Some(s) if !s.pending => {
                s.pending = true;
                s.error = None;
                true
            }
            _ => false,
        }
    }

    /// Keep the dialog open with `error`
    pub fn fail(&mut self, error: Err) {
        if let Some(s) = self.submission_mut() {
            s.pending = false;
            s.error = Some(error);
        }
    }

    pub fn close(&mut self) {
        *self = Self::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Dialog = DialogState<&'static str, String>;

    #[test]
    fn test_default_is_closed() {
        let dialog = Dialog::default();
        assert!(!dialog.is_open());
        assert!(dialog.submission().is_none());
        assert!(dialog.target().is_none());
    }

    #[test]
    fn test_start_then_fail_keeps_dialog_open() {
        let mut dialog = Dialog::creating();
        assert!(dialog.start());
        assert!(dialog.is_pending());
        assert!(!dialog.start());

        dialog.fail("boom".to_string());
        assert!(dialog.is_open());
        assert!(!dialog.is_pending());
        assert_eq!(dialog.error().map(String::as_str), Some("boom"));

        assert!(dialog.start());
        assert!(dialog.error().is_none());
    }

    #[test]
    fn test_opening_replaces_previous_dialog() {
        let mut dialog = Dialog::editing("p1");
        assert_eq!(dialog.target(), Some(&"p1"));

        dialog = Dialog::confirming_delete("p2");
        assert_eq!(dialog.target(), Some(&"p2"));
        assert!(matches!(dialog, DialogState::ConfirmingDelete { .. }));
    }

    #[test]
    fn test_closed_cannot_start() {
        let mut dialog = Dialog::Closed;
        assert!(!dialog.start());
        dialog.fail("ignored".to_string());
        assert!(dialog.error().is_none());
    }
}
