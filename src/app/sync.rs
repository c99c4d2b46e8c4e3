//! Remote synchronization logic
//!
//! Every user action maps to exactly one blocking API call performed on a
//! worker thread; the outcome is handed back through the shared `SyncState`
//! and applied on the UI thread by `poll_sync_results`. While a request is in
//! flight the modal shows a spinner instead of its submit button, so a second
//! mutating action cannot start.

use super::form::FormState;
use super::App;
use crate::api;
use crate::constants::*;
use crate::types::*;
use eframe::egui;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

fn deliver(state: &Arc<Mutex<SyncState>>, outcome: ApiOutcome) {
    let mut s = state.lock().unwrap();
    s.in_flight = false;
    s.outcome = Some(outcome);
}

/// Marks the shared state in-flight; false if a request is already running
fn begin(state: &Arc<Mutex<SyncState>>) -> bool {
    let mut s = state.lock().unwrap();
    if s.in_flight {
        return false;
    }
    s.in_flight = true;
    true
}

impl App {
    pub fn is_request_in_flight(&self) -> bool {
        self.sync_state.lock().unwrap().in_flight
    }

    /// Re-fetch the whole collection. On failure the previous collection is
    /// kept and the error goes to the log only.
    pub fn refresh(&mut self, ctx: &egui::Context) {
        if !begin(&self.sync_state) {
            return;
        }
        debug!(url = CATEGORIES_URL, "Fetching categories");
        let state = self.sync_state.clone();
        let client = self.client.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let outcome = match api::list(&client) {
                Ok(categories) => ApiOutcome::Listed(categories),
                Err(e) => ApiOutcome::Failed(ApiOp::List, e.to_string()),
            };
            deliver(&state, outcome);
            ctx.request_repaint();
        });
    }

    /// Validate and POST the add draft
    pub fn submit_add(&mut self, ctx: &egui::Context) {
        if !self.form.validate() {
            debug!("Add rejected by validation, no request sent");
            return;
        }
        if !begin(&self.sync_state) {
            return;
        }
        let draft = self.form.submission();
        info!(name = %draft.name, "Creating category");
        let state = self.sync_state.clone();
        let client = self.client.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let outcome = match api::create(&client, &draft) {
                Ok(category) => ApiOutcome::Created(category),
                Err(e) => ApiOutcome::Failed(ApiOp::Create, e.to_string()),
            };
            deliver(&state, outcome);
            ctx.request_repaint();
        });
    }

    /// Validate and PUT the edit draft, keyed by its id
    pub fn submit_edit(&mut self, ctx: &egui::Context) {
        if !self.form.validate() {
            debug!("Edit rejected by validation, no request sent");
            return;
        }
        let Some(id) = self.form.edit_id() else {
            return;
        };
        if !begin(&self.sync_state) {
            return;
        }
        let draft = self.form.submission();
        info!(id, name = %draft.name, "Updating category");
        let state = self.sync_state.clone();
        let client = self.client.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let outcome = match api::update(&client, id, &draft) {
                Ok(category) => ApiOutcome::Updated(category),
                Err(e) => ApiOutcome::Failed(ApiOp::Update, e.to_string()),
            };
            deliver(&state, outcome);
            ctx.request_repaint();
        });
    }

    /// Ask for confirmation before deleting; nothing is sent yet
    pub fn request_delete(&mut self, record: Category) {
        self.confirm_delete = Some(record);
    }

    /// User declined the confirmation: no request, state unchanged
    pub fn cancel_delete(&mut self) {
        self.confirm_delete = None;
    }

    /// User confirmed: DELETE by id. If another request is still running the
    /// confirmation stays pending instead of being dropped.
    pub fn confirm_delete_accepted(&mut self, ctx: &egui::Context) {
        let Some(record) = self.confirm_delete.clone() else {
            return;
        };
        if !begin(&self.sync_state) {
            return;
        }
        self.confirm_delete = None;
        info!(id = record.id, name = %record.name, "Deleting category");
        let state = self.sync_state.clone();
        let client = self.client.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let outcome = match api::delete(&client, record.id) {
                Ok(()) => ApiOutcome::Deleted(record.id),
                Err(e) => ApiOutcome::Failed(ApiOp::Delete, e.to_string()),
            };
            deliver(&state, outcome);
            ctx.request_repaint();
        });
    }

    /// Apply whatever the worker thread posted since the last frame
    pub fn poll_sync_results(&mut self, ctx: &egui::Context) {
        let outcome = self.sync_state.lock().unwrap().outcome.take();
        let Some(outcome) = outcome else {
            return;
        };

        let fetched = matches!(outcome, ApiOutcome::Listed(_));
        let updated_id = match &outcome {
            ApiOutcome::Updated(category) => Some(category.id),
            _ => None,
        };
        let applied = apply_outcome(&mut self.categories, &mut self.form, outcome);
        self.apply_filter();

        // The edit may have changed the image URL; the cached picture for
        // that id is stale either way.
        if let Some(id) = updated_id {
            self.invalidate_thumbnail(id);
        }

        if let Some(message) = applied.toast {
            self.show_toast(message);
        }
        if applied.needs_refresh {
            self.refresh(ctx);
        }
        if fetched {
            self.start_thumbnail_prefetch(ctx);
        }
    }
}

struct Applied {
    toast: Option<&'static str>,
    needs_refresh: bool,
}

/// Collection/form mutation for one API outcome. Failures never touch the
/// collection: the modal simply stays open (add/edit) or the action no-ops
/// (list/delete).
fn apply_outcome(
    categories: &mut Vec<Category>,
    form: &mut FormState,
    outcome: ApiOutcome,
) -> Applied {
    match outcome {
        ApiOutcome::Listed(list) => {
            info!(count = list.len(), "Categories fetched");
            *categories = list;
            Applied { toast: None, needs_refresh: false }
        }
        ApiOutcome::Created(category) => {
            info!(id = category.id, name = %category.name, "Category created");
            categories.push(category);
            form.close();
            Applied { toast: Some(MSG_ADDED), needs_refresh: false }
        }
        ApiOutcome::Updated(category) => {
            info!(id = category.id, "Category updated");
            form.close();
            Applied { toast: Some(MSG_EDITED), needs_refresh: true }
        }
        ApiOutcome::Deleted(id) => {
            info!(id, "Category deleted");
            Applied { toast: Some(MSG_DELETED), needs_refresh: true }
        }
        ApiOutcome::Failed(op, e) => {
            error!(op = op.as_str(), error = %e, "Request failed");
            Applied { toast: None, needs_refresh: false }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.into(),
            image: format!("https://example.com/{}.png", id),
        }
    }

    #[test]
    fn listed_replaces_the_collection() {
        let mut categories = vec![cat(1, "old")];
        let mut form = FormState::default();
        apply_outcome(
            &mut categories,
            &mut form,
            ApiOutcome::Listed(vec![cat(2, "Ropa"), cat(3, "Zapatos")]),
        );
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].id, 2);
    }

    #[test]
    fn created_appends_exactly_one_entry_with_server_id() {
        let mut categories = vec![cat(1, "Ropa")];
        let mut form = FormState::default();
        form.open_add();
        let applied = apply_outcome(
            &mut categories,
            &mut form,
            ApiOutcome::Created(cat(99, "Muebles")),
        );
        assert_eq!(categories.len(), 2);
        assert_eq!(categories.last().unwrap().id, 99);
        assert_eq!(applied.toast, Some(MSG_ADDED));
        assert!(!applied.needs_refresh);
        assert!(!form.is_open());
    }

    #[test]
    fn updated_closes_the_modal_and_requests_a_refresh() {
        let mut categories = vec![cat(1, "Ropa")];
        let mut form = FormState::default();
        form.open_edit(&categories[0]);
        let applied = apply_outcome(
            &mut categories,
            &mut form,
            ApiOutcome::Updated(cat(1, "Hogar")),
        );
        // collection is refreshed from the server, not patched locally
        assert_eq!(categories[0].name, "Ropa");
        assert!(applied.needs_refresh);
        assert_eq!(applied.toast, Some(MSG_EDITED));
        assert!(!form.is_open());
    }

    #[test]
    fn deleted_requests_a_refresh_with_toast() {
        let mut categories = vec![cat(1, "Ropa")];
        let mut form = FormState::default();
        let applied = apply_outcome(&mut categories, &mut form, ApiOutcome::Deleted(1));
        assert!(applied.needs_refresh);
        assert_eq!(applied.toast, Some(MSG_DELETED));
    }

    #[test]
    fn failed_create_keeps_modal_open_and_collection_identical() {
        let mut categories = vec![cat(1, "Ropa")];
        let before = categories.clone();
        let mut form = FormState::default();
        form.open_add();
        form.draft.name = "Muebles".into();
        form.draft.image = "https://example.com/m.png".into();
        let applied = apply_outcome(
            &mut categories,
            &mut form,
            ApiOutcome::Failed(ApiOp::Create, "HTTP 500".into()),
        );
        assert_eq!(categories, before);
        assert!(form.is_open());
        assert_eq!(form.draft.name, "Muebles");
        assert!(applied.toast.is_none());
        assert!(!applied.needs_refresh);
    }

    #[test]
    fn confirmed_delete_is_kept_while_another_request_is_running() {
        let mut app = App::new_for_tests();
        app.categories = vec![cat(1, "Ropa")];
        // a refresh is still in flight
        app.sync_state.lock().unwrap().in_flight = true;

        let ctx = egui::Context::default();
        app.request_delete(app.categories[0].clone());
        app.confirm_delete_accepted(&ctx);

        // the confirmation must survive until the slot frees up, not vanish
        assert!(app.confirm_delete.is_some());
        assert!(app.sync_state.lock().unwrap().outcome.is_none());
    }

    #[test]
    fn declining_the_confirmation_sends_nothing_and_keeps_the_collection() {
        let mut app = App::new_for_tests();
        app.categories = vec![cat(1, "Ropa"), cat(2, "Zapatos")];
        app.apply_filter();
        let before = app.categories.clone();

        app.request_delete(app.categories[0].clone());
        app.cancel_delete();

        assert!(app.confirm_delete.is_none());
        assert_eq!(app.categories, before);
        let state = app.sync_state.lock().unwrap();
        assert!(!state.in_flight);
        assert!(state.outcome.is_none());
    }

    #[test]
    fn updated_outcome_drops_the_cached_thumbnail() {
        let mut app = App::new_for_tests();
        app.categories = vec![cat(1, "Ropa")];
        app.thumbnail_cache.insert(1, None);
        {
            let mut state = app.sync_state.lock().unwrap();
            state.outcome = Some(ApiOutcome::Updated(cat(1, "Ropa")));
            // keeps the follow-up refresh from spawning a request in the test
            state.in_flight = true;
        }

        let ctx = egui::Context::default();
        app.poll_sync_results(&ctx);

        assert!(!app.thumbnail_cache.contains_key(&1));
    }

    #[test]
    fn failed_list_and_delete_are_silent_noops() {
        let mut categories = vec![cat(1, "Ropa"), cat(2, "Zapatos")];
        let before = categories.clone();
        let mut form = FormState::default();
        for op in [ApiOp::List, ApiOp::Delete] {
            let applied = apply_outcome(
                &mut categories,
                &mut form,
                ApiOutcome::Failed(op, "connection refused".into()),
            );
            assert_eq!(categories, before);
            assert!(applied.toast.is_none());
            assert!(!applied.needs_refresh);
        }
    }
}
