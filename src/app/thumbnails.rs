//! Category image loading
//!
//! Images are fetched once on a background thread, cached on disk keyed by
//! category id, and decoded into textures memoized per frame. A missing or
//! failed image leaves the letter-avatar placeholder in place.

use super::App;
use eframe::egui;
use tracing::{debug, warn};

fn thumb_path(cache_dir: &std::path::Path, id: i64) -> std::path::PathBuf {
    cache_dir.join("thumbnails").join(format!("{}.img", id))
}

impl App {
    /// Fetch every image not yet on disk. Called after each successful list
    /// fetch; already-fetched ids are skipped.
    pub fn start_thumbnail_prefetch(&mut self, ctx: &egui::Context) {
        let thumb_dir = self.cache_dir.join("thumbnails");
        std::fs::create_dir_all(&thumb_dir).ok();

        let targets: Vec<(i64, String)> = self
            .categories
            .iter()
            .filter(|cat| {
                !self.thumbnails_fetching.contains(&cat.id)
                    && !thumb_path(&self.cache_dir, cat.id).exists()
            })
            .map(|cat| (cat.id, cat.image.clone()))
            .collect();

        if targets.is_empty() {
            return;
        }
        for (id, _) in &targets {
            self.thumbnails_fetching.insert(*id);
        }

        debug!(count = targets.len(), "Starting thumbnail prefetch");

        let cache_dir = self.cache_dir.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let client = reqwest::blocking::Client::new();
            for (id, url) in targets {
                match client.get(&url).send() {
                    Ok(response) if response.status().is_success() => {
                        if let Ok(bytes) = response.bytes() {
                            std::fs::write(thumb_path(&cache_dir, id), &bytes).ok();
                            ctx.request_repaint();
                        }
                    }
                    Ok(response) => {
                        warn!(id, status = %response.status(), "Thumbnail fetch rejected");
                    }
                    Err(e) => {
                        warn!(id, error = %e, "Thumbnail fetch failed");
                    }
                }
            }
        });
    }

    /// Drop the cached image for an id so the next prefetch picks up a
    /// changed URL. Called when an edit comes back from the server.
    pub fn invalidate_thumbnail(&mut self, id: i64) {
        self.thumbnail_cache.remove(&id);
        self.thumbnails_fetching.remove(&id);
        let _ = std::fs::remove_file(thumb_path(&self.cache_dir, id));
    }

    /// Texture for a category image, decoded from the disk cache on first use
    pub fn load_thumbnail(&mut self, ctx: &egui::Context, id: i64) -> Option<egui::TextureHandle> {
        if let Some(cached) = self.thumbnail_cache.get(&id) {
            return cached.clone();
        }

        let path = thumb_path(&self.cache_dir, id);
        if !path.exists() {
            return None;
        }

        let texture = std::fs::read(&path)
            .ok()
            .and_then(|bytes| image::load_from_memory(&bytes).ok())
            .map(|img| {
                let rgba = img.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let pixels = rgba.into_raw();
                ctx.load_texture(
                    format!("category_{}", id),
                    egui::ColorImage::from_rgba_unmultiplied(size, &pixels),
                    egui::TextureOptions::LINEAR,
                )
            });
        self.thumbnail_cache.insert(id, texture.clone());
        texture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidate_removes_memo_fetch_mark_and_disk_entry() {
        let mut app = App::new_for_tests();
        app.cache_dir = std::env::temp_dir().join("categorias-crud-thumb-invalidate");
        std::fs::create_dir_all(app.cache_dir.join("thumbnails")).unwrap();
        std::fs::write(thumb_path(&app.cache_dir, 5), b"old image bytes").unwrap();
        app.thumbnail_cache.insert(5, None);
        app.thumbnails_fetching.insert(5);

        app.invalidate_thumbnail(5);

        assert!(!thumb_path(&app.cache_dir, 5).exists());
        assert!(!app.thumbnail_cache.contains_key(&5));
        assert!(!app.thumbnails_fetching.contains(&5));
    }

    #[test]
    fn invalidating_an_unknown_id_is_harmless() {
        let mut app = App::new_for_tests();
        app.invalidate_thumbnail(404);
        assert!(app.thumbnail_cache.is_empty());
    }
}
