//! UI rendering methods for the map viewer.

use crate::WandererMapApp;
use crate::assets::AssetLoadState;
use crate::colors;
use crate::constants::{POPUP_OFFSET, SCROLL_ZOOM_STEP, SIDEBAR_WIDTH};
use crate::coordinates::{
    bounds_to_screen, latlng_to_screen, screen_to_container, screen_to_latlng, to_point,
};
use crate::overlays::{draw_markers, draw_pending_marker, marker_at, place_markers};
use eframe::egui;
use wanderer_map::bookmarks::{FormPopupOptions, TemplateOptions};
use wanderer_map::{BookmarkEvent, BookmarkForm, Category, Level, LevelVisibility};

/// What the user did with the bookmark form this frame.
enum FormAction {
    Submit,
    Cancel,
}

/// Adds up scroll deltas until they amount to whole zoom levels, so a
/// trackpad's stream of small deltas zooms as smoothly as a wheel.
#[derive(Debug, Default)]
pub struct ScrollZoom {
    accumulated: f32,
}

impl ScrollZoom {
    /// Feeds one frame of vertical scroll; returns the zoom levels to step by.
    pub fn feed(&mut self, delta: f32) -> i32 {
        // Reversing direction drops what was collected the other way
        if delta * self.accumulated < 0.0 {
            self.accumulated = 0.0;
        }
        self.accumulated += delta;

        let steps = (self.accumulated / SCROLL_ZOOM_STEP).trunc();
        self.accumulated -= steps * SCROLL_ZOOM_STEP;
        steps as i32
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

impl WandererMapApp {
    /// Handles keyboard shortcuts for zoom, markers and closing popups.
    pub fn handle_keyboard_input(&mut self, ctx: &egui::Context) {
        // Typing a bookmark name must not zoom the map
        if ctx.wants_keyboard_input() {
            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                self.bookmarks.handle(BookmarkEvent::Close);
            }
            return;
        }

        let mut close = false;
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals) {
                self.view.zoom_in();
            }
            if i.key_pressed(egui::Key::Minus) {
                self.view.zoom_out();
            }
            if i.key_pressed(egui::Key::Num0) {
                self.view.reset_view();
            }
            if i.key_pressed(egui::Key::M) {
                self.overlays.all_markers = !self.overlays.all_markers;
            }
            if i.key_pressed(egui::Key::L) {
                self.overlays.labels = !self.overlays.labels;
            }
            close = i.key_pressed(egui::Key::Escape);
        });

        if close {
            self.bookmarks.handle(BookmarkEvent::Close);
        }
    }

    /// Renders the bottom status bar with controls hint and cursor position.
    pub fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    "Scroll: Zoom | Drag: Pan | Right-click: Bookmark | +/-: Zoom | 0: Reset | M: Markers | L: Labels",
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("Zoom {:.0}", self.view.zoom()));
                    if let Some(latlng) = self.cursor_latlng {
                        ui.label(format!("{:.1}, {:.1}", latlng.lat, latlng.lng));
                    }
                });
            });
        });
    }

    /// Renders the left sidebar panel.
    pub fn show_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("sidebar")
            .exact_width(SIDEBAR_WIDTH)
            .resizable(false)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.show_sidebar_content(ui);
                });
            });
    }

    /// Renders the sidebar content: bookmark list and overlay toggles.
    fn show_sidebar_content(&mut self, ui: &mut egui::Ui) {
        ui.add_space(4.0);

        ui.strong("Bookmarks");
        ui.separator();

        let mut events = Vec::new();
        let options = self.bookmarks.options();
        let selected = self.bookmarks.popup_bookmark().map(|b| b.id.clone());

        if options.add_new_option && ui.button("Add new").clicked() {
            events.push(BookmarkEvent::New {
                latlng: self.view.center(),
            });
        }

        if self.bookmarks.store().is_empty() {
            ui.label(egui::RichText::new(&options.empty_message).italics().weak());
        } else {
            for bookmark in self.bookmarks.store().iter() {
                let data = options.get_bookmark_data_for_template(bookmark);
                ui.horizontal(|ui| {
                    if ui
                        .small_button("×")
                        .on_hover_text(&options.form_popup.template_options.remove_menu_text)
                        .clicked()
                    {
                        events.push(BookmarkEvent::Remove {
                            id: data.id.clone(),
                        });
                    }

                    let (fill, _) = colors::marker_colors(bookmark.category);
                    let (rect, _) =
                        ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                    ui.painter().circle_filled(rect.center(), 4.0, fill);

                    ui.vertical(|ui| {
                        let is_selected = selected.as_deref() == Some(data.id.as_str());
                        if ui.selectable_label(is_selected, &data.name).clicked() {
                            events.push(BookmarkEvent::Show {
                                id: data.id.clone(),
                            });
                        }
                        ui.small(&data.description);
                    });
                });
            }
        }

        for event in events {
            let fly_to = self.bookmarks.handle(event);
            self.apply_fly_to(fly_to);
        }

        ui.add_space(12.0);

        // Overlays section
        ui.strong("Overlays");
        ui.separator();

        Self::overlay_toggle_circle(
            ui,
            &mut self.overlays.all_markers,
            "All markers",
            colors::POI_FILL,
        );
        Self::overlay_toggle_circle(ui, &mut self.overlays.labels, "Labels", egui::Color32::WHITE);

        ui.add_space(12.0);

        ui.strong("Legend");
        ui.separator();
        for category in Category::ALL {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                let (fill, stroke) = colors::marker_colors(category);
                ui.painter()
                    .circle(rect.center(), 5.0, fill, egui::Stroke::new(1.0, stroke));
                ui.label(category.label());
            });
        }
    }

    /// Renders a circle-style overlay toggle.
    fn overlay_toggle_circle(
        ui: &mut egui::Ui,
        value: &mut bool,
        label: &str,
        color: egui::Color32,
    ) {
        ui.horizontal(|ui| {
            ui.checkbox(value, "");
            let (rect, icon_response) =
                ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::click());
            let center = rect.center();
            ui.painter().circle_filled(center, 5.0, color);
            ui.painter()
                .circle_stroke(center, 5.0, egui::Stroke::new(1.0, egui::Color32::GRAY));
            let label_response = ui
                .label(label)
                .interact(egui::Sense::click())
                .on_hover_cursor(egui::CursorIcon::PointingHand);
            if icon_response.clicked() || label_response.clicked() {
                *value = !*value;
            }
        });
    }

    /// Renders the central panel containing the map view.
    pub fn show_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let panel_rect = ui.max_rect();
                self.show_map(ui);
                self.show_zoom_controls(ctx, panel_rect);
            });
    }

    /// Renders the floating zoom controls panel.
    fn show_zoom_controls(&mut self, ctx: &egui::Context, panel_rect: egui::Rect) {
        let margin = 12.0;
        let panel_width = 120.0;
        let panel_height = 36.0;

        let anchor_pos = egui::pos2(
            panel_rect.right() - panel_width - margin,
            panel_rect.bottom() - panel_height - margin,
        );

        egui::Area::new(egui::Id::new("zoom_controls"))
            .fixed_pos(anchor_pos)
            .interactable(true)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(ui.style().visuals.window_fill.gamma_multiply(0.95))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            if ui.button("−").on_hover_text("Zoom out (-)").clicked() {
                                self.view.zoom_out();
                            }
                            if ui.button("+").on_hover_text("Zoom in (+)").clicked() {
                                self.view.zoom_in();
                            }
                            if ui.button("Reset").on_hover_text("Reset view (0)").clicked() {
                                self.view.reset_view();
                            }
                        });
                    });
            });
    }

    /// Renders the map image and markers, and handles map interaction.
    fn show_map(&mut self, ui: &mut egui::Ui) {
        match &self.image {
            AssetLoadState::Loading(_) => {
                ui.centered_and_justified(|ui| ui.spinner());
                return;
            }
            AssetLoadState::Error(msg) => {
                ui.centered_and_justified(|ui| {
                    ui.label(format!("Failed to load map: {msg}"));
                });
                return;
            }
            AssetLoadState::Ready => {}
        }

        let Some(texture_id) = self.texture.as_ref().map(|texture| texture.id()) else {
            ui.label("Failed to create texture");
            return;
        };

        let (viewport_rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        self.view.set_size(to_point(viewport_rect.size()));
        self.viewport_rect = Some(viewport_rect);

        self.handle_scroll_zoom(ui, viewport_rect);

        // Handle drag panning
        if response.dragged() {
            self.view.pan_by(to_point(-response.drag_delta()));
        }
        if response.drag_stopped() && !self.view.is_inside_max_bounds() {
            self.view.pan_inside_max_bounds();
        }

        self.cursor_latlng = response
            .hover_pos()
            .map(|pos| screen_to_latlng(&self.view, viewport_rect, pos));

        if response.secondary_clicked()
            && let Some(pos) = response.interact_pointer_pos()
        {
            let event = self
                .view
                .context_menu(screen_to_container(viewport_rect, pos));
            let fly_to = self.bookmarks.on_map_event(event);
            self.apply_fly_to(fly_to);
        }

        ui.set_clip_rect(viewport_rect);

        // Draw map image across the overlay bounds
        if let Some(overlay) = self.view.overlay() {
            let image_rect = bounds_to_screen(&self.view, viewport_rect, &overlay.bounds);
            ui.painter().image(
                texture_id,
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        // Draw markers
        let selected = self.bookmarks.popup_bookmark().map(|b| b.id.clone());
        let markers = place_markers(
            &self.view,
            viewport_rect,
            self.bookmarks.store().iter(),
            selected.as_deref(),
            &self.overlays,
        );
        draw_markers(ui, &markers, selected.as_deref(), &self.overlays);

        let event = response.clicked().then(|| {
            let clicked = response
                .interact_pointer_pos()
                .and_then(|pos| marker_at(&markers, pos));
            match clicked {
                Some(bookmark) => BookmarkEvent::Show {
                    id: bookmark.id.clone(),
                },
                None => BookmarkEvent::Close,
            }
        });

        if let Some(form) = self.bookmarks.form()
            && !form.is_editing()
        {
            draw_pending_marker(ui, &self.view, viewport_rect, form.latlng);
        }

        if let Some(event) = event {
            let fly_to = self.bookmarks.handle(event);
            self.apply_fly_to(fly_to);
        }
    }

    /// Handles scroll zoom towards the mouse, one zoom level per wheel notch.
    fn handle_scroll_zoom(&mut self, ui: &mut egui::Ui, viewport_rect: egui::Rect) {
        let hover_pos = ui.input(|i| i.pointer.hover_pos());
        let scroll_delta = ui.input(|i| i.raw_scroll_delta.y);

        let Some(hover) = hover_pos.filter(|p| viewport_rect.contains(*p)) else {
            self.scroll_zoom.reset();
            return;
        };
        if scroll_delta == 0.0 {
            return;
        }

        let steps = self.scroll_zoom.feed(scroll_delta);
        if steps == 0 {
            return;
        }
        let zoom = self.view.zoom() + f64::from(steps);
        self.view
            .set_zoom_around(screen_to_container(viewport_rect, hover), zoom);
    }

    /// Screen position of a map coordinate inside the central panel.
    fn anchor_for(&self, ctx: &egui::Context, latlng: wanderer_map::LatLng) -> egui::Pos2 {
        let viewport_rect = self.viewport_rect.unwrap_or_else(|| ctx.screen_rect());
        latlng_to_screen(&self.view, viewport_rect, latlng)
            + egui::vec2(POPUP_OFFSET, -POPUP_OFFSET)
    }

    /// Renders the popup of the selected bookmark with its edit/remove menu.
    pub fn show_popup(&mut self, ctx: &egui::Context) {
        let Some(bookmark) = self.bookmarks.popup_bookmark() else {
            return;
        };

        let options = self.bookmarks.options();
        let menu = &options.form_popup.template_options;
        let content = options.get_popup_content(bookmark);
        let id = bookmark.id.clone();
        let anchor = self.anchor_for(ctx, bookmark.latlng);

        let mut event = None;
        egui::Window::new("bookmark_popup")
            .id(egui::Id::new(("bookmark_popup", &id)))
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .fixed_pos(anchor)
            .show(ctx, |ui| {
                match &content {
                    Ok(text) => {
                        let mut lines = text.lines();
                        if let Some(title) = lines.next() {
                            ui.heading(title);
                        }
                        for line in lines {
                            ui.label(line);
                        }
                    }
                    Err(err) => {
                        ui.colored_label(egui::Color32::RED, err.to_string());
                    }
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button(&menu.edit_menu_text).clicked() {
                        event = Some(BookmarkEvent::StartEdit { id: id.clone() });
                    }
                    if ui.button(&menu.remove_menu_text).clicked() {
                        event = Some(BookmarkEvent::Remove { id: id.clone() });
                    }
                    if ui.button(&menu.cancel_menu_text).clicked() {
                        event = Some(BookmarkEvent::Close);
                    }
                });
            });

        if let Some(event) = event {
            let fly_to = self.bookmarks.handle(event);
            self.apply_fly_to(fly_to);
        }
    }

    /// Renders the creation/edit form next to its coordinate.
    pub fn show_form(&mut self, ctx: &egui::Context) {
        let Some(latlng) = self.bookmarks.form().map(|form| form.latlng) else {
            return;
        };

        let anchor = self.anchor_for(ctx, latlng);
        let popup_options = self.bookmarks.options().form_popup.clone();
        let Some(form) = self.bookmarks.form_mut() else {
            return;
        };

        let mut action = None;
        egui::Window::new("bookmark_form")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .fixed_pos(anchor)
            .show(ctx, |ui| {
                action = show_form_contents(ui, &popup_options, form);
            });

        match action {
            Some(FormAction::Submit) => {
                let fly_to = self.bookmarks.submit_form();
                self.apply_fly_to(fly_to);
            }
            Some(FormAction::Cancel) => {
                self.bookmarks.handle(BookmarkEvent::Close);
            }
            None => {}
        }
    }
}

/// Draws the name field, submit button and category/level selectors.
fn show_form_contents(
    ui: &mut egui::Ui,
    options: &FormPopupOptions,
    form: &mut BookmarkForm,
) -> Option<FormAction> {
    let labels: &TemplateOptions = &options.template_options;
    let fields = &options.fields;
    let mut action = None;

    ui.horizontal(|ui| {
        let name = ui.add(
            egui::TextEdit::singleline(&mut form.name)
                .hint_text(&labels.input_placeholder)
                .desired_width(160.0),
        );
        let submit_text = if form.is_editing() {
            &labels.submit_text_edit
        } else {
            &labels.submit_text_create
        };
        let entered = name.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button(submit_text).clicked() || entered {
            action = Some(FormAction::Submit);
        }
    });

    ui.horizontal(|ui| {
        let mut category = form.category();
        egui::ComboBox::from_id_salt(&fields.category_input_id)
            .selected_text(category.label())
            .show_ui(ui, |ui| {
                for option in Category::ALL {
                    ui.selectable_value(&mut category, option, option.label());
                }
            });
        if category != form.category() {
            form.set_category(category);
        }

        if form.level_visibility() == LevelVisibility::Shown {
            egui::ComboBox::from_id_salt(&fields.level_input_id)
                .selected_text(form.level.as_str())
                .width(48.0)
                .show_ui(ui, |ui| {
                    for option in Level::ALL {
                        ui.selectable_value(&mut form.level, option, option.as_str());
                    }
                });
        }
    });

    if form.is_editing() {
        ui.separator();
        if ui.button(&labels.cancel_menu_text).clicked() {
            action = Some(FormAction::Cancel);
        }
    }

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_notch_zooms_one_level() {
        let mut scroll = ScrollZoom::default();

        assert_eq!(scroll.feed(SCROLL_ZOOM_STEP), 1);
        assert_eq!(scroll.feed(-SCROLL_ZOOM_STEP), -1);
    }

    #[test]
    fn small_deltas_add_up_before_zooming() {
        let mut scroll = ScrollZoom::default();

        let steps: i32 = (0..30).map(|_| scroll.feed(4.0)).sum();

        // 120 points of trackpad scroll, not 30 levels
        assert_eq!(steps, 3);
    }

    #[test]
    fn reversing_direction_discards_partial_scroll() {
        let mut scroll = ScrollZoom::default();

        assert_eq!(scroll.feed(30.0), 0);
        assert_eq!(scroll.feed(-30.0), 0);
        assert_eq!(scroll.feed(-10.0), -1);
    }
}
