//! Form editor: staged drafts for create and edit

use thiserror::Error;

use crate::core::entity::{FieldError, Record};
use crate::core::identity::RecordId;
use crate::core::store::{Entry, RecordStore};

/// Which dialog a section currently has open
#[derive(Debug, Clone, PartialEq)]
pub enum FormState<T> {
    Closed,
    Creating(T),
    Editing { id: RecordId, draft: T },
}

impl<T> Default for FormState<T> {
    fn default() -> Self {
        FormState::Closed
    }
}

/// Outcome of committing a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Created(RecordId),
    Updated(RecordId),
    /// The record being edited was deleted meanwhile; nothing was written
    Vanished(RecordId),
}

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("no form is open")]
    NotOpen,

    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Stages a draft record for field-by-field editing
#[derive(Debug, Clone)]
pub struct FormEditor<T> {
    state: FormState<T>,
}

impl<T: Record> Default for FormEditor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> FormEditor<T> {
    pub fn new() -> Self {
        Self {
            state: FormState::Closed,
        }
    }

    pub fn state(&self) -> &FormState<T> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, FormState::Closed)
    }

    /// Open the create dialog with blank defaults
    pub fn open_create(&mut self) {
        self.state = FormState::Creating(T::blank());
    }

    /// Open the edit dialog on a copy of `entry`
    pub fn open_edit(&mut self, entry: &Entry<T>) {
        self.state = FormState::Editing {
            id: entry.id,
            draft: entry.record.clone(),
        };
    }

    pub fn draft(&self) -> Option<&T> {
        match &self.state {
            FormState::Closed => None,
            FormState::Creating(draft) | FormState::Editing { draft, .. } => Some(draft),
        }
    }

    /// Assign one field of the draft; the store is untouched
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match &mut self.state {
            FormState::Closed => Err(FormError::NotOpen),
            FormState::Creating(draft) | FormState::Editing { draft, .. } => {
                draft.set_field(name, value)?;
                Ok(())
            }
        }
    }

    /// Write the draft into `store` and close the form
    pub fn commit(&mut self, store: &mut RecordStore<T>) -> Result<Commit, FormError> {
        match std::mem::replace(&mut self.state, FormState::Closed) {
            FormState::Closed => Err(FormError::NotOpen),
            FormState::Creating(draft) => Ok(Commit::Created(store.create(draft).id)),
            FormState::Editing { id, draft } => match store.update(id, draft) {
                Some(_) => Ok(Commit::Updated(id)),
                None => Ok(Commit::Vanished(id)),
            },
        }
    }

    /// Discard the draft without touching the store
    pub fn cancel(&mut self) {
        self.state = FormState::Closed;
    }
}
