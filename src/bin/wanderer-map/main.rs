#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod assets;
mod colors;
mod constants;
mod coordinates;
mod overlays;
mod ui;

use assets::{AssetLoadState, load_and_decode_image, load_config};
use clap::Parser;
use constants::{BOOKMARKS_FILE, DATA_DIR_NAME};
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use overlays::OverlayVisibility;
use ui::ScrollZoom;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use wanderer_map::{BookmarkStore, BookmarksControl, LatLng, MapView, ViewerConfig};

/// Image map viewer with user bookmarks.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Viewer configuration (RON) to use instead of the bundled one
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Bookmark file; defaults to the user data directory
    #[arg(long, value_name = "PATH")]
    bookmarks: Option<PathBuf>,
}

/// Everything loaded before the window opens.
struct Startup {
    config: ViewerConfig,
    store: BookmarkStore,
    bookmarks_path: Option<PathBuf>,
    errors: Vec<String>,
}

impl Startup {
    fn load(cli: Cli) -> Self {
        let mut errors = Vec::new();

        let config = match load_config(cli.config.as_deref()) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{err}");
                errors.push(err.to_string());
                ViewerConfig::default()
            }
        };

        let mut bookmarks_path = cli.bookmarks.or_else(default_bookmarks_path);
        let loaded = bookmarks_path
            .as_deref()
            .map(BookmarkStore::load_or_back_up);
        let store = match loaded {
            Some(Ok((store, None))) => store,
            Some(Ok((store, Some(backup)))) => {
                errors.push(format!(
                    "Bookmarks file was unreadable and has been moved to {}",
                    backup.display()
                ));
                store
            }
            Some(Err(err)) => {
                // Saving over a file we could not read would lose it
                log::warn!("{err} - bookmarks will not be saved");
                errors.push(format!("{err}\nBookmarks will not be saved."));
                bookmarks_path = None;
                BookmarkStore::new()
            }
            None => {
                log::warn!("No data directory available - bookmarks will not be saved");
                BookmarkStore::new()
            }
        };

        Self {
            config,
            store,
            bookmarks_path,
            errors,
        }
    }
}

fn default_bookmarks_path() -> Option<PathBuf> {
    Some(
        dirs::data_dir()?
            .join(DATA_DIR_NAME)
            .join(BOOKMARKS_FILE),
    )
}

/// Main application state for the map viewer.
pub struct WandererMapApp {
    view: MapView,
    bookmarks: BookmarksControl,
    bookmarks_path: Option<PathBuf>,
    image: AssetLoadState,
    texture: Option<TextureHandle>,
    overlays: OverlayVisibility,
    /// Screen area of the map, as laid out last frame
    viewport_rect: Option<egui::Rect>,
    cursor_latlng: Option<LatLng>,
    scroll_zoom: ScrollZoom,
    toasts: Toasts,
}

impl WandererMapApp {
    fn new(cc: &eframe::CreationContext<'_>, startup: Startup) -> Self {
        let mut toasts = Toasts::new()
            .anchor(egui::Align2::RIGHT_TOP, (-10.0, 10.0))
            .direction(egui::Direction::TopDown);

        for err in startup.errors {
            toasts.add(error_toast(err, 10.0));
        }

        let view = MapView::initialize(&startup.config.map);

        // Decode the map image in a background thread
        let (tx, rx) = mpsc::channel();
        let ctx = cc.egui_ctx.clone();
        let image_path = startup.config.map.image_path.clone();
        thread::spawn(move || {
            let result = load_and_decode_image(&image_path);
            let _ = tx.send(result);
            ctx.request_repaint();
        });

        Self {
            view,
            bookmarks: BookmarksControl::new(startup.config.bookmarks, startup.store),
            bookmarks_path: startup.bookmarks_path,
            image: AssetLoadState::Loading(rx),
            texture: None,
            overlays: OverlayVisibility::default(),
            viewport_rect: None,
            cursor_latlng: None,
            scroll_zoom: ScrollZoom::default(),
            toasts,
        }
    }

    /// Creates the map texture once the background decode finishes.
    fn poll_image(&mut self, ctx: &egui::Context) {
        let AssetLoadState::Loading(rx) = &self.image else {
            return;
        };

        let error = match rx.try_recv() {
            Ok(Ok(decoded)) => {
                let image = ColorImage::from_rgba_unmultiplied(
                    [decoded.width as usize, decoded.height as usize],
                    &decoded.pixels,
                );
                let path = self
                    .view
                    .overlay()
                    .map(|overlay| overlay.image_path.clone())
                    .unwrap_or_default();
                self.texture = Some(ctx.load_texture(path, image, TextureOptions::LINEAR));
                self.image = AssetLoadState::Ready;
                return;
            }
            Ok(Err(err)) => err.to_string(),
            Err(mpsc::TryRecvError::Disconnected) => "image loader disconnected".to_owned(),
            Err(mpsc::TryRecvError::Empty) => return,
        };

        log::warn!("{error}");
        self.toasts.add(error_toast(error.clone(), 8.0));
        self.image = AssetLoadState::Error(error);
    }

    /// Writes the bookmarks to disk if anything changed this frame.
    fn save_bookmarks(&mut self) {
        if !self.bookmarks.take_changed() {
            return;
        }
        let Some(path) = &self.bookmarks_path else {
            return;
        };

        if let Err(err) = self.bookmarks.store().save(path) {
            log::error!("{err}");
            self.toasts.add(error_toast(err.to_string(), 8.0));
        }
    }

    /// Centres the map on a coordinate returned by the bookmarks control.
    fn apply_fly_to(&mut self, latlng: Option<LatLng>) {
        if let Some(latlng) = latlng {
            self.view.fly_to(latlng);
        }
    }
}

impl eframe::App for WandererMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_image(ctx);
        self.handle_keyboard_input(ctx);

        self.show_status_bar(ctx);
        self.show_sidebar(ctx);
        self.show_central_panel(ctx);
        self.show_popup(ctx);
        self.show_form(ctx);

        self.save_bookmarks();

        // Show toasts
        self.toasts.show(ctx);
    }
}

fn error_toast(text: String, seconds: f64) -> Toast {
    Toast {
        kind: ToastKind::Error,
        text: text.into(),
        options: ToastOptions::default()
            .duration_in_seconds(seconds)
            .show_icon(true),
        ..Default::default()
    }
}

fn main() -> eframe::Result {
    env_logger::init();

    let startup = Startup::load(Cli::parse());
    if let Some(path) = &startup.bookmarks_path {
        log::info!("Bookmarks file: {}", path.display());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Wanderer Map",
        options,
        Box::new(|cc| Ok(Box::new(WandererMapApp::new(cc, startup)))),
    )
}
