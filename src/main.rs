#![windows_subsystem = "windows"]
//! Categorías CRUD - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod api;
mod app;
mod constants;
mod settings;
mod theme;
mod types;
mod ui;
mod utils;

use app::App;
use constants::*;
use eframe::egui;
use tracing::info;
use types::*;
use ui::components;
use utils::get_data_dir;

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "categorias-crud.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,categorias_crud=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, api = API_BASE_URL, "Categorías CRUD starting");

    // Load saved window position/size
    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(900.0, 640.0)))
        .with_min_inner_size([720.0, 480.0])
        .with_title("Categorías CRUD");

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Categorías CRUD",
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, data_dir);
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP & UI RENDERING
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Fetch the collection once at startup
        if !self.initial_fetch_done {
            self.initial_fetch_done = true;
            self.refresh(ctx);
        }

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        // Apply results posted by background request threads
        self.poll_sync_results(ctx);

        self.render_form_modal(ctx);
        self.render_confirm_modal(ctx);

        // Header bar: title, search, refresh, add
        egui::TopBottomPanel::top("header_bar")
            .exact_height(56.0)
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::symmetric(16, 10)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new("CRUD de Categorías")
                            .size(theme::FONT_TITLE)
                            .strong(),
                    );
                    ui.add_space(theme::SPACING_SM);
                    ui.label(
                        egui::RichText::new(format!("{} categorías", self.categories.len()))
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_DIM),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let add_btn = ui.add(theme::button_accent(format!(
                            "{}  Agregar Categoría",
                            egui_phosphor::regular::PLUS
                        )));
                        if add_btn.clicked() {
                            self.form.open_add();
                        }

                        ui.add_space(theme::SPACING_SM);
                        if self.is_request_in_flight() {
                            ui.spinner();
                        } else {
                            let refresh_btn = ui
                                .add(theme::button(egui_phosphor::regular::ARROWS_CLOCKWISE))
                                .on_hover_text("Recargar");
                            if refresh_btn.clicked() {
                                self.refresh(ctx);
                            }
                        }

                        ui.add_space(theme::SPACING_SM);
                        // Search box with border style
                        egui::Frame::new()
                            .fill(theme::BG_INPUT)
                            .stroke(egui::Stroke::new(1.0, theme::BORDER_SUBTLE))
                            .corner_radius(theme::RADIUS_DEFAULT)
                            .inner_margin(egui::Margin::symmetric(8, 6))
                            .show(ui, |ui| {
                                ui.spacing_mut().item_spacing.x = 4.0;
                                ui.horizontal(|ui| {
                                    ui.add(
                                        egui::Label::new(
                                            egui::RichText::new(
                                                egui_phosphor::regular::MAGNIFYING_GLASS,
                                            )
                                            .size(14.0)
                                            .color(theme::TEXT_DIM),
                                        )
                                        .selectable(false),
                                    );
                                    let search = ui.add(
                                        egui::TextEdit::singleline(&mut self.search_query)
                                            .hint_text("Buscar categoría...")
                                            .frame(false)
                                            .desired_width(180.0),
                                    );
                                    if search.changed() {
                                        self.apply_filter();
                                    }
                                });
                            });
                    });
                });
            });

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::symmetric(16, 8)),
            )
            .show(ctx, |ui| {
                self.central_panel_rect = Some(ui.max_rect());
                self.render_list_view(ui, ctx);
            });

        self.render_toast(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Exiting, saving settings");
        self.save_settings();
    }
}

impl App {
    // ========================================================================
    // LIST VIEW
    // ========================================================================

    fn render_list_view(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        use egui_extras::{Column, TableBuilder};

        if self.categories.is_empty() {
            if self.is_request_in_flight() {
                ui.vertical_centered(|ui| {
                    ui.add_space(80.0);
                    ui.spinner();
                    ui.add_space(theme::SPACING_MD);
                    ui.label(egui::RichText::new("Cargando categorías...").color(theme::TEXT_MUTED));
                });
            } else {
                ui.vertical_centered(|ui| {
                    ui.add_space(80.0);
                    ui.label(
                        egui::RichText::new(egui_phosphor::regular::TRAY)
                            .size(36.0)
                            .color(theme::TEXT_DIM),
                    );
                    ui.add_space(theme::SPACING_MD);
                    ui.label(egui::RichText::new("Sin categorías").color(theme::TEXT_MUTED));
                });
            }
            return;
        }

        let row_height = theme::ROW_HEIGHT;
        let actions_width = 190.0;
        let thumb_col_width = theme::THUMB_SIZE + 16.0;
        let id_width = 56.0;
        let free = ui.available_width() - thumb_col_width - id_width - actions_width;

        let table = TableBuilder::new(ui)
            .striped(false)
            .resizable(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::exact(thumb_col_width))
            .column(Column::exact(id_width))
            .column(Column::exact(free * 0.45).clip(true))
            .column(Column::exact(free * 0.55).clip(true))
            .column(Column::exact(actions_width));

        table
            .header(theme::HEADER_HEIGHT, |mut header| {
                header.col(|_ui| {});
                self.sortable_header(&mut header, "ID", SortColumn::Id);
                self.sortable_header(&mut header, "NOMBRE", SortColumn::Name);
                header.col(|ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("IMAGEN")
                                .size(theme::FONT_LABEL)
                                .strong()
                                .color(theme::TEXT_MUTED),
                        )
                        .selectable(false),
                    );
                });
                header.col(|_ui| {});
            })
            .body(|body| {
                let indices = self.filtered_indices.clone();

                body.rows(row_height, indices.len(), |mut row| {
                    let cat = self.categories[indices[row.index()]].clone();

                    // Thumbnail or letter avatar
                    row.col(|ui| {
                        let size = theme::THUMB_SIZE;
                        if let Some(texture) = self.load_thumbnail(ctx, cat.id) {
                            ui.add(
                                egui::Image::new(egui::load::SizedTexture::new(
                                    texture.id(),
                                    egui::vec2(size, size),
                                ))
                                .corner_radius(theme::RADIUS_DEFAULT),
                            );
                        } else {
                            components::letter_avatar(ui, &cat.name, size);
                        }
                    });

                    row.col(|ui| {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(cat.id.to_string()).color(theme::TEXT_DIM),
                            )
                            .selectable(false),
                        );
                    });

                    row.col(|ui| {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(&cat.name)
                                    .strong()
                                    .size(theme::FONT_BODY),
                            )
                            .truncate()
                            .selectable(false),
                        );
                    });

                    // Image URL - click opens in browser
                    row.col(|ui| {
                        let url_label = ui.add(
                            egui::Label::new(
                                egui::RichText::new(&cat.image)
                                    .size(theme::FONT_LABEL)
                                    .color(theme::TEXT_MUTED),
                            )
                            .truncate()
                            .sense(egui::Sense::click()),
                        );
                        if url_label.on_hover_text("Abrir en el navegador").clicked() {
                            let _ = open::that(&cat.image);
                        }
                    });

                    row.col(|ui| {
                        let edit_btn = ui.add(theme::button_warning(format!(
                            "{}  Editar",
                            egui_phosphor::regular::PENCIL_SIMPLE
                        )));
                        if edit_btn.clicked() {
                            self.form.open_edit(&cat);
                        }
                        let delete_btn = ui.add(theme::button_danger(format!(
                            "{}  Eliminar",
                            egui_phosphor::regular::TRASH
                        )));
                        if delete_btn.clicked() {
                            self.request_delete(cat.clone());
                        }
                    });
                });
            });
    }

    fn sortable_header(
        &mut self,
        header: &mut egui_extras::TableRow<'_, '_>,
        label: &str,
        column: SortColumn,
    ) {
        header.col(|ui| {
            let is_sorted = self.sort_column == Some(column);
            let icon = if is_sorted {
                match self.sort_direction {
                    SortDirection::Ascending => egui_phosphor::regular::CARET_UP,
                    SortDirection::Descending => egui_phosphor::regular::CARET_DOWN,
                }
            } else {
                egui_phosphor::regular::CARET_UP_DOWN
            };
            let color = if is_sorted {
                egui::Color32::WHITE
            } else {
                theme::TEXT_MUTED
            };
            let resp = ui.add(
                egui::Label::new(
                    egui::RichText::new(format!("{} {}", label, icon))
                        .size(theme::FONT_LABEL)
                        .strong()
                        .color(color),
                )
                .selectable(false)
                .sense(egui::Sense::click()),
            );

            if resp.clicked() {
                if self.sort_column == Some(column) {
                    match self.sort_direction {
                        SortDirection::Ascending => {
                            self.sort_direction = SortDirection::Descending
                        }
                        SortDirection::Descending => self.sort_column = None,
                    }
                } else {
                    self.sort_column = Some(column);
                    self.sort_direction = SortDirection::Ascending;
                }
                self.apply_filter();
            }
        });
    }

    // ========================================================================
    // MODALS
    // ========================================================================

    fn render_form_modal(&mut self, ctx: &egui::Context) {
        if !self.form.is_open() {
            return;
        }
        let in_flight = self.is_request_in_flight();
        let is_edit = self.form.mode == FormMode::Edit;

        // Built-in Modal with backdrop, escape-to-close, click-outside handling
        let modal_area = egui::Modal::default_area(egui::Id::new("category_modal"))
            .default_width(380.0 + theme::SPACING_XL * 2.0);
        let modal = egui::Modal::new(egui::Id::new("category_modal"))
            .area(modal_area)
            .backdrop_color(egui::Color32::from_black_alpha(180))
            .frame(theme::modal_frame());
        let modal_response = modal.show(ctx, |ui| {
            ui.set_min_width(380.0);
            ui.set_max_width(380.0);

            ui.label(egui::RichText::new(self.form.title()).size(16.0).strong());
            ui.add_space(theme::SPACING_SM);
            ui.separator();
            ui.add_space(theme::SPACING_MD);

            {
                let (name, image) = self.form.fields_mut();
                components::form_field(ui, "Nombre", "Nombre de la categoría", name);
                components::form_field(ui, "Imagen", "URL de la imagen", image);
            }

            if let Some(message) = self.form.validation_error.clone() {
                components::inline_error(ui, &message);
                ui.add_space(theme::SPACING_MD);
            }

            ui.add_space(theme::SPACING_MD);
            ui.horizontal(|ui| {
                ui.set_min_height(28.0);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if in_flight {
                        ui.spinner();
                        ui.label(egui::RichText::new("Guardando...").color(theme::TEXT_MUTED));
                    } else {
                        let submit_label = if is_edit {
                            format!("{}  Guardar Cambios", egui_phosphor::regular::CHECK)
                        } else {
                            format!("{}  Agregar Categoría", egui_phosphor::regular::PLUS)
                        };
                        let submit_btn = ui.add(theme::button_accent(submit_label));
                        if submit_btn.clicked() {
                            if is_edit {
                                self.submit_edit(ctx);
                            } else {
                                self.submit_add(ctx);
                            }
                        }
                        ui.add_space(theme::SPACING_MD);
                        let cancel_btn = ui.add(theme::button(format!(
                            "{}  {}",
                            egui_phosphor::regular::X,
                            MSG_CANCEL
                        )));
                        if cancel_btn.clicked() {
                            self.form.close();
                        }
                    }
                });
            });
        });
        if modal_response.should_close() && !in_flight {
            self.form.close();
        }
    }

    fn render_confirm_modal(&mut self, ctx: &egui::Context) {
        let Some(record) = self.confirm_delete.clone() else {
            return;
        };
        let in_flight = self.is_request_in_flight();

        let modal_area = egui::Modal::default_area(egui::Id::new("confirm_delete_modal"))
            .default_width(340.0 + theme::SPACING_XL * 2.0);
        let modal = egui::Modal::new(egui::Id::new("confirm_delete_modal"))
            .area(modal_area)
            .backdrop_color(egui::Color32::from_black_alpha(180))
            .frame(theme::modal_frame());
        let modal_response = modal.show(ctx, |ui| {
            ui.set_min_width(340.0);
            ui.set_max_width(340.0);

            ui.vertical_centered(|ui| {
                ui.add_space(theme::SPACING_MD);
                ui.label(
                    egui::RichText::new(egui_phosphor::regular::WARNING)
                        .size(36.0)
                        .color(theme::STATUS_WARNING),
                );
                ui.add_space(theme::SPACING_MD);
                ui.label(egui::RichText::new(MSG_CONFIRM_TITLE).size(16.0).strong());
                ui.add_space(theme::SPACING_SM);
                ui.label(egui::RichText::new(&record.name).color(theme::TEXT_SECONDARY));
                ui.add_space(theme::SPACING_SM);
                ui.label(egui::RichText::new(MSG_CONFIRM_BODY).color(theme::TEXT_MUTED));
                ui.add_space(theme::SPACING_XL);

                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if in_flight {
                            ui.spinner();
                            ui.label(
                                egui::RichText::new("Procesando...").color(theme::TEXT_MUTED),
                            );
                        } else {
                            let confirm_btn = ui.add(theme::button_danger(format!(
                                "{}  {}",
                                egui_phosphor::regular::TRASH,
                                MSG_CONFIRM_YES
                            )));
                            if confirm_btn.clicked() {
                                self.confirm_delete_accepted(ctx);
                            }
                            ui.add_space(theme::SPACING_MD);
                            let cancel_btn = ui.add(theme::button(MSG_CANCEL));
                            if cancel_btn.clicked() {
                                self.cancel_delete();
                            }
                        }
                    });
                });
            });
        });
        // Escape / click outside counts as declining
        if modal_response.should_close() {
            self.cancel_delete();
        }
    }

    // ========================================================================
    // TOAST
    // ========================================================================

    /// Bottom-right of central panel, 3s visible then fade, pause on hover
    fn render_toast(&mut self, ctx: &egui::Context) {
        let (Some(msg), Some(panel_rect)) = (self.toast_message.clone(), self.central_panel_rect)
        else {
            return;
        };

        let visible_duration = 3.0;
        let fade_duration = 0.5;
        let total_duration = visible_duration + fade_duration;
        let margin = 12.0;

        let toast_pos = egui::pos2(panel_rect.right() - margin, panel_rect.bottom() - margin);

        let response = egui::Area::new(egui::Id::new("status_toast"))
            .fixed_pos(toast_pos)
            .pivot(egui::Align2::RIGHT_BOTTOM)
            .show(ctx, |ui| {
                let elapsed = self
                    .toast_start
                    .map(|t| t.elapsed().as_secs_f32())
                    .unwrap_or(0.0);
                let alpha = if elapsed > visible_duration {
                    (total_duration - elapsed) / fade_duration
                } else {
                    1.0
                };

                egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(
                        0x1a,
                        0x1a,
                        0x1e,
                        (230.0 * alpha) as u8,
                    ))
                    .stroke(egui::Stroke::new(
                        1.0,
                        egui::Color32::from_rgba_unmultiplied(
                            theme::STATUS_SUCCESS.r(),
                            theme::STATUS_SUCCESS.g(),
                            theme::STATUS_SUCCESS.b(),
                            (100.0 * alpha) as u8,
                        ),
                    ))
                    .corner_radius(6.0)
                    .inner_margin(egui::Margin::symmetric(16, 10))
                    .show(ui, |ui| {
                        let text = format!("{}  {}", egui_phosphor::regular::CHECK_CIRCLE, msg);
                        ui.label(egui::RichText::new(text).color(
                            egui::Color32::from_rgba_unmultiplied(
                                255,
                                255,
                                255,
                                (255.0 * alpha) as u8,
                            ),
                        ));
                    });
            });

        // Pause timer while hovering
        if response.response.hovered() {
            self.toast_start = Some(std::time::Instant::now());
        }

        let elapsed = self
            .toast_start
            .map(|t| t.elapsed().as_secs_f32())
            .unwrap_or(0.0);
        if elapsed >= total_duration {
            self.toast_message = None;
            self.toast_start = None;
        } else {
            ctx.request_repaint();
        }
    }
}
