//! Bookmarks control: configuration, the open popup/form, and the handling of
//! bookmark events coming from the map, the list and the form.

use crate::bookmark::{Bookmark, BookmarkTemplateData};
use crate::crs::LatLng;
use crate::form::{BookmarkForm, FormPopupFields};
use crate::map_view::MapEvent;
use crate::store::BookmarkStore;
use crate::template::{self, TemplateError};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Labels used by the form popup and its menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateOptions {
    pub input_placeholder: String,
    pub edit_menu_text: String,
    pub remove_menu_text: String,
    pub cancel_menu_text: String,
    pub submit_text_create: String,
    pub submit_text_edit: String,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            input_placeholder: "Marker name".to_owned(),
            edit_menu_text: "Edit".to_owned(),
            remove_menu_text: "Remove".to_owned(),
            cancel_menu_text: "Cancel".to_owned(),
            submit_text_create: "+".to_owned(),
            submit_text_edit: "✔".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormPopupOptions {
    pub template_options: TemplateOptions,
    pub fields: FormPopupFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookmarksOptions {
    /// Shown in the list when there are no bookmarks
    pub empty_message: String,
    /// Adds an "Add new" entry to the list that bookmarks the map centre
    pub add_new_option: bool,
    /// Popup text; `{name}` and `{description}` are substituted
    pub popup_template: String,
    pub form_popup: FormPopupOptions,
}

impl Default for BookmarksOptions {
    fn default() -> Self {
        Self {
            empty_message: "Add something, ye lone wanderer.".to_owned(),
            add_new_option: false,
            popup_template: "{name}\n{description}".to_owned(),
            form_popup: FormPopupOptions::default(),
        }
    }
}

impl BookmarksOptions {
    pub fn get_popup_content(&self, bookmark: &Bookmark) -> Result<String, TemplateError> {
        let values = HashMap::from([
            ("name", bookmark.name.clone()),
            ("description", bookmark.description()),
        ]);
        template::render(&self.popup_template, &values)
    }

    pub fn get_bookmark_data_for_template(&self, bookmark: &Bookmark) -> BookmarkTemplateData {
        BookmarkTemplateData::from(bookmark)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookmarkEvent {
    /// Open the creation form at a coordinate
    New { latlng: LatLng },
    /// Store a newly created bookmark
    Add(Bookmark),
    /// Replace a stored bookmark with edited data
    Edit(Bookmark),
    /// Open the edit form for a stored bookmark
    StartEdit { id: String },
    Remove { id: String },
    /// Open the popup of a stored bookmark
    Show { id: String },
    /// Close whatever popup or form is open
    Close,
}

impl From<MapEvent> for BookmarkEvent {
    fn from(event: MapEvent) -> Self {
        match event {
            MapEvent::NewBookmark { latlng } => BookmarkEvent::New { latlng },
        }
    }
}

pub struct BookmarksControl {
    options: BookmarksOptions,
    store: BookmarkStore,
    form: Option<BookmarkForm>,
    popup: Option<String>,
    changed: bool,
    rng: StdRng,
}

impl BookmarksControl {
    pub fn new(options: BookmarksOptions, store: BookmarkStore) -> Self {
        Self::with_rng(options, store, StdRng::from_entropy())
    }

    pub fn with_rng(options: BookmarksOptions, store: BookmarkStore, rng: StdRng) -> Self {
        Self {
            options,
            store,
            form: None,
            popup: None,
            changed: false,
            rng,
        }
    }

    pub fn options(&self) -> &BookmarksOptions {
        &self.options
    }

    pub fn store(&self) -> &BookmarkStore {
        &self.store
    }

    pub fn form(&self) -> Option<&BookmarkForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut BookmarkForm> {
        self.form.as_mut()
    }

    /// Bookmark whose popup is open.
    pub fn popup_bookmark(&self) -> Option<&Bookmark> {
        self.popup.as_deref().and_then(|id| self.store.get(id))
    }

    /// Whether the store changed since the last call.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    pub fn on_map_event(&mut self, event: MapEvent) -> Option<LatLng> {
        self.handle(event.into())
    }

    /// Turns the open form into an add or edit event.
    pub fn submit_form(&mut self) -> Option<LatLng> {
        let form = self.form.take()?;
        let bookmark = form.get_bookmark_data(&mut self.rng);

        if form.is_editing() {
            self.handle(BookmarkEvent::Edit(bookmark))
        } else {
            self.handle(BookmarkEvent::Add(bookmark))
        }
    }

    /// Applies an event. Returns a coordinate the map should bring into view.
    pub fn handle(&mut self, event: BookmarkEvent) -> Option<LatLng> {
        log::debug!("Bookmark event: {event:?}");

        match event {
            BookmarkEvent::New { latlng } => {
                self.popup = None;
                self.form = Some(BookmarkForm::create(latlng));
                None
            }
            BookmarkEvent::Add(mut bookmark) => {
                if self.store.contains(&bookmark.id) {
                    bookmark.id = self.store.unique_id(&bookmark.name, &mut self.rng);
                }
                log::info!("Added bookmark {} ({})", bookmark.name, bookmark.id);
                let id = bookmark.id.clone();
                self.store.add(bookmark);
                self.changed = true;
                self.show(id)
            }
            BookmarkEvent::Edit(bookmark) => {
                let id = bookmark.id.clone();
                if !self.store.update(bookmark.clone()) {
                    log::warn!("Edited bookmark {id} no longer exists, adding it again");
                    self.store.add(bookmark);
                }
                self.changed = true;
                self.show(id)
            }
            BookmarkEvent::StartEdit { id } => {
                match self.store.get(&id) {
                    Some(bookmark) => {
                        self.form = Some(BookmarkForm::edit(bookmark));
                        self.popup = None;
                    }
                    None => log::warn!("Cannot edit unknown bookmark {id}"),
                }
                None
            }
            BookmarkEvent::Remove { id } => {
                if let Some(removed) = self.store.remove(&id) {
                    log::info!("Removed bookmark {} ({})", removed.name, removed.id);
                    self.changed = true;
                }
                if self.popup.as_deref() == Some(id.as_str()) {
                    self.popup = None;
                }
                if self.form.as_ref().is_some_and(|form| form.edits(&id)) {
                    self.form = None;
                }
                None
            }
            BookmarkEvent::Show { id } => self.show(id),
            BookmarkEvent::Close => {
                self.form = None;
                self.popup = None;
                None
            }
        }
    }

    fn show(&mut self, id: String) -> Option<LatLng> {
        let latlng = self.store.get(&id)?.latlng;
        self.form = None;
        self.popup = Some(id);
        Some(latlng)
    }
}
