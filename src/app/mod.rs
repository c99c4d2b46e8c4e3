//! App module - contains the main application state and logic

pub(crate) mod form;
mod sync;
mod thumbnails;

use crate::settings::Settings;
use crate::theme;
use crate::types::*;
use crate::utils::get_cache_dir;
use eframe::egui;
use form::FormState;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    // Authoritative local copy of the remote collection
    pub(crate) categories: Vec<Category>,
    pub(crate) filtered_indices: Vec<usize>,
    pub(crate) search_query: String,
    pub(crate) sort_column: Option<SortColumn>,
    pub(crate) sort_direction: SortDirection,
    // Modal form
    pub(crate) form: FormState,
    // Record awaiting delete confirmation
    pub(crate) confirm_delete: Option<Category>,
    // Background request state (one in flight at a time)
    pub(crate) sync_state: Arc<Mutex<SyncState>>,
    pub(crate) client: reqwest::blocking::Client,
    pub(crate) initial_fetch_done: bool,
    // Toast notification
    pub(crate) toast_message: Option<String>,
    pub(crate) toast_start: Option<std::time::Instant>,
    pub(crate) central_panel_rect: Option<egui::Rect>,
    // Thumbnail cache
    pub(crate) thumbnail_cache: HashMap<i64, Option<egui::TextureHandle>>,
    pub(crate) thumbnails_fetching: std::collections::HashSet<i64>,
    pub(crate) cache_dir: PathBuf,
    // Window geometry (saved on exit)
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, data_dir: PathBuf) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let cache_dir = get_cache_dir();
        std::fs::create_dir_all(&cache_dir).ok();

        Self {
            categories: Vec::new(),
            filtered_indices: Vec::new(),
            search_query: String::new(),
            sort_column: Some(SortColumn::Id),
            sort_direction: SortDirection::Ascending,
            form: FormState::default(),
            confirm_delete: None,
            sync_state: Arc::new(Mutex::new(SyncState::default())),
            client: reqwest::blocking::Client::new(),
            initial_fetch_done: false,
            toast_message: None,
            toast_start: None,
            central_panel_rect: None,
            thumbnail_cache: HashMap::new(),
            thumbnails_fetching: std::collections::HashSet::new(),
            cache_dir,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        }
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
        };
        settings.save(&self.data_dir);
    }

    /// Recompute visible row order from the search box and sort state
    pub fn apply_filter(&mut self) {
        self.filtered_indices = filter_and_sort(
            &self.categories,
            &self.search_query,
            self.sort_column,
            self.sort_direction,
        );
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_start = Some(std::time::Instant::now());
    }
}

#[cfg(test)]
impl App {
    /// Bare state without an eframe creation context, for unit tests
    pub(crate) fn new_for_tests() -> Self {
        let tmp = std::env::temp_dir().join("categorias-crud-tests");
        Self {
            categories: Vec::new(),
            filtered_indices: Vec::new(),
            search_query: String::new(),
            sort_column: Some(SortColumn::Id),
            sort_direction: SortDirection::Ascending,
            form: FormState::default(),
            confirm_delete: None,
            sync_state: Arc::new(Mutex::new(SyncState::default())),
            client: reqwest::blocking::Client::new(),
            initial_fetch_done: true,
            toast_message: None,
            toast_start: None,
            central_panel_rect: None,
            thumbnail_cache: HashMap::new(),
            thumbnails_fetching: std::collections::HashSet::new(),
            cache_dir: tmp.clone(),
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir: tmp,
        }
    }
}

/// Visible row order: case-insensitive name match (or exact id), then sort
fn filter_and_sort(
    categories: &[Category],
    query: &str,
    sort_column: Option<SortColumn>,
    sort_direction: SortDirection,
) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    let mut indices: Vec<usize> = categories
        .iter()
        .enumerate()
        .filter(|(_, cat)| {
            needle.is_empty()
                || cat.name.to_lowercase().contains(&needle)
                || cat.id.to_string() == needle
        })
        .map(|(i, _)| i)
        .collect();

    if let Some(col) = sort_column {
        indices.sort_by(|&a, &b| {
            let (ca, cb) = (&categories[a], &categories[b]);
            let ord = match col {
                SortColumn::Id => ca.id.cmp(&cb.id),
                SortColumn::Name => ca.name.to_lowercase().cmp(&cb.name.to_lowercase()),
            };
            match sort_direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Category> {
        vec![
            Category { id: 2, name: "Ropa".into(), image: "r".into() },
            Category { id: 1, name: "Zapatos".into(), image: "z".into() },
            Category { id: 3, name: "Electrónica".into(), image: "e".into() },
        ]
    }

    #[test]
    fn empty_query_keeps_everything_sorted_by_id() {
        let rows = filter_and_sort(&sample(), "", Some(SortColumn::Id), SortDirection::Ascending);
        assert_eq!(rows, vec![1, 0, 2]);
    }

    #[test]
    fn name_search_is_case_insensitive() {
        let rows = filter_and_sort(&sample(), "ROPA", None, SortDirection::Ascending);
        assert_eq!(rows, vec![0]);
    }

    #[test]
    fn id_query_matches_exactly() {
        let rows = filter_and_sort(&sample(), "3", None, SortDirection::Ascending);
        assert_eq!(rows, vec![2]);
    }

    #[test]
    fn descending_name_sort_reverses_order() {
        let rows = filter_and_sort(
            &sample(),
            "",
            Some(SortColumn::Name),
            SortDirection::Descending,
        );
        assert_eq!(rows, vec![1, 0, 2]); // Zapatos, Ropa, Electrónica
    }
}
