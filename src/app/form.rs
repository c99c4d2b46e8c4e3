//! Modal form state
//!
//! Holds whatever the user is currently typing: a fresh draft in add mode, or
//! a full copy of an existing record in edit mode. Exactly one of
//! {closed, add, edit} is active at any time; a failed submit leaves the
//! modal open for retry, closing always clears both drafts.

use crate::constants::MSG_FIELDS_REQUIRED;
use crate::types::{Category, CategoryDraft, FormMode};

#[derive(Default)]
pub struct FormState {
    pub mode: FormMode,
    pub draft: CategoryDraft,
    pub edit_draft: Option<Category>,
    pub validation_error: Option<String>,
}

impl FormState {
    pub fn is_open(&self) -> bool {
        self.mode != FormMode::Closed
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Edit => "Editar Categoría",
            _ => "Agregar Categoría",
        }
    }

    /// Open the modal with an empty draft
    pub fn open_add(&mut self) {
        self.mode = FormMode::Add;
        self.draft = CategoryDraft::default();
        self.edit_draft = None;
        self.validation_error = None;
    }

    /// Open the modal on a copy of an existing record
    pub fn open_edit(&mut self, record: &Category) {
        self.mode = FormMode::Edit;
        self.edit_draft = Some(record.clone());
        self.validation_error = None;
    }

    /// Close and discard both drafts, regardless of prior content
    pub fn close(&mut self) {
        self.mode = FormMode::Closed;
        self.draft = CategoryDraft::default();
        self.edit_draft = None;
        self.validation_error = None;
    }

    /// Mutable name/image fields of whichever draft is active, for direct
    /// text-edit binding
    pub fn fields_mut(&mut self) -> (&mut String, &mut String) {
        match (self.mode, self.edit_draft.as_mut()) {
            (FormMode::Edit, Some(cat)) => (&mut cat.name, &mut cat.image),
            _ => (&mut self.draft.name, &mut self.draft.image),
        }
    }

    /// Request body for the active draft
    pub fn submission(&self) -> CategoryDraft {
        match (self.mode, self.edit_draft.as_ref()) {
            (FormMode::Edit, Some(cat)) => CategoryDraft::from(cat),
            _ => self.draft.clone(),
        }
    }

    pub fn edit_id(&self) -> Option<i64> {
        self.edit_draft.as_ref().map(|c| c.id)
    }

    /// Both fields required. On failure sets the user-visible error and
    /// returns false; no request may be sent.
    pub fn validate(&mut self) -> bool {
        if self.submission().is_valid() {
            self.validation_error = None;
            true
        } else {
            self.validation_error = Some(MSG_FIELDS_REQUIRED.to_string());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Category {
        Category {
            id: 3,
            name: "Muebles".into(),
            image: "https://example.com/muebles.png".into(),
        }
    }

    #[test]
    fn starts_closed_with_empty_draft() {
        let form = FormState::default();
        assert_eq!(form.mode, FormMode::Closed);
        assert_eq!(form.draft, CategoryDraft::default());
        assert!(form.edit_draft.is_none());
    }

    #[test]
    fn open_add_clears_any_previous_draft() {
        let mut form = FormState::default();
        form.open_add();
        form.draft.name = "stale".into();
        form.open_add();
        assert_eq!(form.mode, FormMode::Add);
        assert!(form.draft.name.is_empty());
        assert!(form.draft.image.is_empty());
    }

    #[test]
    fn open_edit_copies_the_record() {
        let mut form = FormState::default();
        form.open_edit(&record());
        assert_eq!(form.mode, FormMode::Edit);
        assert_eq!(form.edit_draft.as_ref().unwrap(), &record());
        assert_eq!(form.edit_id(), Some(3));
    }

    #[test]
    fn close_resets_everything_from_any_mode() {
        let mut form = FormState::default();
        form.open_add();
        form.draft.name = "Ropa".into();
        form.close();
        assert_eq!(form.mode, FormMode::Closed);
        assert_eq!(form.draft, CategoryDraft::default());

        form.open_edit(&record());
        form.close();
        assert_eq!(form.mode, FormMode::Closed);
        assert!(form.edit_draft.is_none());
        assert!(form.validation_error.is_none());
    }

    #[test]
    fn fields_route_to_the_active_draft() {
        let mut form = FormState::default();
        form.open_add();
        *form.fields_mut().0 = "Ropa".into();
        assert_eq!(form.draft.name, "Ropa");

        form.open_edit(&record());
        *form.fields_mut().1 = "https://example.com/nuevo.png".into();
        assert_eq!(
            form.edit_draft.as_ref().unwrap().image,
            "https://example.com/nuevo.png"
        );
        // add draft untouched by edit mode typing
        assert_eq!(form.draft.name, "Ropa");
    }

    #[test]
    fn validate_rejects_empty_fields_with_message() {
        let mut form = FormState::default();
        form.open_add();
        assert!(!form.validate());
        assert_eq!(form.validation_error.as_deref(), Some(MSG_FIELDS_REQUIRED));

        form.draft.name = "Ropa".into();
        assert!(!form.validate());

        form.draft.image = "https://example.com/ropa.png".into();
        assert!(form.validate());
        assert!(form.validation_error.is_none());
    }

    #[test]
    fn edit_submission_carries_the_edited_values() {
        let mut form = FormState::default();
        form.open_edit(&record());
        *form.fields_mut().0 = "Hogar".into();
        let body = form.submission();
        assert_eq!(body.name, "Hogar");
        assert_eq!(body.image, record().image);
    }
}
