//! Drag-and-drop intake
//!
//! In the browser a DOM element accepts dropped files and reads them with a
//! `FileReader` as data URLs. Natively, files dropped onto the window are read
//! from disk. Both hand their results to the ECS through [`PendingDrops`],
//! which the loader drains once per frame.

use bevy::prelude::*;
use hellocube_core::{ResourceDescriptor, ResourceError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::app::DemoSettings;

/// Contents of a dropped file as delivered by the platform
#[derive(Debug, Clone)]
pub enum DropPayload {
    /// `FileReader.readAsDataURL` result
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    DataUri(String),
    /// Raw file bytes
    Bytes(Vec<u8>),
    /// Reading the file failed
    ReadFailed(String),
}

#[derive(Debug, Clone)]
pub struct DroppedFile {
    /// File name without path
    pub name: String,
    pub payload: DropPayload,
}

impl DroppedFile {
    /// Decode the payload into a resource descriptor
    pub fn into_descriptor(self) -> Result<ResourceDescriptor, ResourceError> {
        match self.payload {
            DropPayload::DataUri(uri) => ResourceDescriptor::from_data_uri(self.name, &uri),
            DropPayload::Bytes(data) => ResourceDescriptor::new(self.name, data),
            DropPayload::ReadFailed(reason) => Err(ResourceError::Read(reason)),
        }
    }
}

/// Files handed over by platform callbacks
#[derive(Resource, Default, Clone)]
pub struct PendingDrops(pub Arc<Mutex<VecDeque<DroppedFile>>>);

impl PendingDrops {
    pub fn push(&self, file: DroppedFile) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push_back(file);
        }
    }

    /// Take every queued file, oldest first
    pub fn drain(&self) -> Vec<DroppedFile> {
        self.0
            .lock()
            .map(|mut queue| queue.drain(..).collect())
            .unwrap_or_default()
    }
}

/// Whether a drag is currently hovering over the drop target
#[derive(Resource, Default, Clone)]
pub struct DropHover(pub Arc<AtomicBool>);

impl DropHover {
    pub fn set(&self, hovering: bool) {
        self.0.store(hovering, Ordering::Relaxed);
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Systems that feed [`PendingDrops`]
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DropIntake;

pub struct DropTargetPlugin;

impl Plugin for DropTargetPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingDrops>()
            .init_resource::<DropHover>()
            .add_systems(Startup, attach_drop_target);

        #[cfg(not(target_arch = "wasm32"))]
        app.add_systems(Update, read_window_drops.in_set(DropIntake));
    }
}

fn attach_drop_target(
    settings: Res<DemoSettings>,
    pending: Res<PendingDrops>,
    hover: Res<DropHover>,
) {
    dom::attach(
        &settings.page.drop_target_id,
        &settings.page.hover_class,
        pending.clone(),
        hover.clone(),
    );
}

/// Native: files dropped onto the window
#[cfg(not(target_arch = "wasm32"))]
fn read_window_drops(
    mut events: MessageReader<bevy::window::FileDragAndDrop>,
    pending: Res<PendingDrops>,
    hover: Res<DropHover>,
) {
    use bevy::window::FileDragAndDrop;

    for event in events.read() {
        match event {
            FileDragAndDrop::HoveredFile { .. } => hover.set(true),
            FileDragAndDrop::HoveredFileCanceled { .. } => hover.set(false),
            FileDragAndDrop::DroppedFile { path_buf, .. } => {
                hover.set(false);
                let name = path_buf
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path_buf.display().to_string());
                let payload = match std::fs::read(path_buf) {
                    Ok(bytes) => DropPayload::Bytes(bytes),
                    Err(e) => DropPayload::ReadFailed(format!("{}: {}", path_buf.display(), e)),
                };
                pending.push(DroppedFile { name, payload });
            }
        }
    }
}

// ============================================================================
// DOM drop target (WASM only)
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod dom {
    use super::*;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{DragEvent, File, FileReader, HtmlElement};

    /// Wire drag handlers onto the element with `element_id`
    pub fn attach(element_id: &str, hover_class: &str, pending: PendingDrops, hover: DropHover) {
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            tracing::error!("drop target: no document object");
            return;
        };
        let Some(holder) = document
            .get_element_by_id(element_id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        else {
            tracing::warn!("drop target #{} not found, drag-and-drop disabled", element_id);
            return;
        };

        // dragover must cancel the default action or the browser never fires drop
        let target = holder.clone();
        let class = hover_class.to_string();
        let hovering = hover.clone();
        let ondragover = Closure::wrap(Box::new(move |event: DragEvent| {
            event.prevent_default();
            target.set_class_name(&class);
            hovering.set(true);
        }) as Box<dyn FnMut(DragEvent)>);
        holder.set_ondragover(Some(ondragover.as_ref().unchecked_ref()));
        ondragover.forget();

        let target = holder.clone();
        let hovering = hover.clone();
        let ondragend = Closure::wrap(Box::new(move |_event: DragEvent| {
            target.set_class_name("");
            hovering.set(false);
        }) as Box<dyn FnMut(DragEvent)>);
        holder.set_ondragend(Some(ondragend.as_ref().unchecked_ref()));
        ondragend.forget();

        let target = holder.clone();
        let hovering = hover.clone();
        let ondragleave = Closure::wrap(Box::new(move |_event: DragEvent| {
            target.set_class_name("");
            hovering.set(false);
        }) as Box<dyn FnMut(DragEvent)>);
        holder.set_ondragleave(Some(ondragleave.as_ref().unchecked_ref()));
        ondragleave.forget();

        let target = holder.clone();
        let ondrop = Closure::wrap(Box::new(move |event: DragEvent| {
            event.prevent_default();
            target.set_class_name("");
            hover.set(false);

            // Only the first file of a multi-file drop is used
            let file = event
                .data_transfer()
                .and_then(|transfer| transfer.files())
                .and_then(|files| files.get(0));
            match file {
                Some(file) => read_as_data_url(file, pending.clone()),
                None => tracing::warn!("drop event carried no file"),
            }
        }) as Box<dyn FnMut(DragEvent)>);
        holder.set_ondrop(Some(ondrop.as_ref().unchecked_ref()));
        ondrop.forget();

        tracing::info!("drop target #{} ready", element_id);
    }

    fn read_as_data_url(file: File, pending: PendingDrops) {
        let name = file.name();
        let reader = match FileReader::new() {
            Ok(reader) => reader,
            Err(e) => {
                pending.push(DroppedFile {
                    name,
                    payload: DropPayload::ReadFailed(format!("FileReader unavailable: {:?}", e)),
                });
                return;
            }
        };

        let reader_clone = reader.clone();
        let load_name = name.clone();
        let load_pending = pending.clone();
        let onload = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let payload = match reader_clone.result().ok().and_then(|result| result.as_string()) {
                Some(uri) => DropPayload::DataUri(uri),
                None => DropPayload::ReadFailed("reader produced no data URL".to_string()),
            };
            load_pending.push(DroppedFile {
                name: load_name.clone(),
                payload,
            });
        }) as Box<dyn FnMut(_)>);
        reader.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        let error_name = name.clone();
        let error_pending = pending.clone();
        let onerror = Closure::wrap(Box::new(move |_: web_sys::Event| {
            error_pending.push(DroppedFile {
                name: error_name.clone(),
                payload: DropPayload::ReadFailed("FileReader error".to_string()),
            });
        }) as Box<dyn FnMut(_)>);
        reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();

        if let Err(e) = reader.read_as_data_url(&file) {
            pending.push(DroppedFile {
                name,
                payload: DropPayload::ReadFailed(format!("{:?}", e)),
            });
        }
    }
}

// Native builds take drops from the window instead
#[cfg(not(target_arch = "wasm32"))]
mod dom {
    use super::*;

    pub fn attach(element_id: &str, _hover_class: &str, _pending: PendingDrops, _hover: DropHover) {
        tracing::debug!(
            element_id,
            "No DOM drop target on native, using window file drops"
        );
    }
}
