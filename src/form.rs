use thiserror::Error;

use crate::contact::{ContactId, ContactRecord, Field};
use crate::store::ContactStore;

/// Why a submission was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingRequired(Field),
}

/// What mode the form is in, and for edits, which record it targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit(ContactId),
}

/// What a successful submission did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(ContactId),
    Updated(ContactId),
}

/// The in-progress draft bound to the form inputs, plus the create/edit
/// state machine.
///
/// Two states: `Create` (submit appends) and `Edit(id)` (submit overwrites
/// the target and falls back to `Create`). The session lives for the whole
/// run; there is no terminal state. Every successful submission resets the
/// draft to the template record.
#[derive(Debug)]
pub struct FormSession {
    draft: ContactRecord,
    template: ContactRecord,
    mode: Mode,
}

impl FormSession {
    pub fn new() -> Self {
        Self::with_template(ContactRecord::template())
    }

    /// The template is normally [`ContactRecord::template`] but can be
    /// overridden from configuration.
    pub fn with_template(template: ContactRecord) -> Self {
        Self {
            draft: template.clone(),
            template,
            mode: Mode::Create,
        }
    }

    pub fn draft(&self) -> &ContactRecord {
        &self.draft
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Edit(_))
    }

    /// Set one draft attribute. No cross-field validation happens here.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Replace the whole draft at once (the UI syncs its input widgets in
    /// one shot before submitting).
    pub fn set_draft(&mut self, draft: ContactRecord) {
        self.draft = draft;
    }

    /// Load `id`'s record into the draft and enter edit mode.
    ///
    /// Starting an edit while another is pending first commits the pending
    /// draft to its original target. Returns false (and stays in its
    /// current state) when `id` is not in the store.
    pub fn begin_edit(&mut self, store: &mut ContactStore, id: ContactId) -> bool {
        if let Mode::Edit(pending) = self.mode {
            if pending != id {
                store.update(pending, self.draft.clone());
            }
        }
        let Some(contact) = store.get(id) else {
            debug_assert!(false, "begin_edit of unknown contact id {id}");
            return false;
        };
        self.draft = contact.record.clone();
        self.mode = Mode::Edit(id);
        true
    }

    /// Abandon the draft: back to create mode with a fresh template.
    pub fn cancel_edit(&mut self) {
        self.mode = Mode::Create;
        self.draft = self.template.clone();
    }

    /// Commit the draft: append in create mode, overwrite the target in
    /// edit mode. Rejects drafts with an empty required field and leaves
    /// both the draft and the store untouched in that case.
    pub fn submit(&mut self, store: &mut ContactStore) -> Result<SubmitOutcome, FormError> {
        if let Some(field) = self.draft.missing_required() {
            return Err(FormError::MissingRequired(field));
        }

        let outcome = match self.mode {
            Mode::Create => SubmitOutcome::Created(store.create(self.draft.clone())),
            Mode::Edit(id) => {
                store.update(id, self.draft.clone());
                self.mode = Mode::Create;
                SubmitOutcome::Updated(id)
            }
        };
        self.draft = self.template.clone();
        Ok(outcome)
    }
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}
