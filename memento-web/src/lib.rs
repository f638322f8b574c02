//! Browser entry point.
//!
//! Loads the page runtime against the live DOM, with the options the build
//! embedded, and wires the browser's events into it: delegated clicks on the
//! document, the asynchronous clipboard, a re-armed timeout for copy feedback
//! and the system colour scheme.

mod document;
mod restore;
mod storage;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use memento_core::copy::ClipboardError;
use memento_core::{Click, ContentModel, CopyRequest, Page, PageOptions, Theme};
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Element, Event, MediaQueryListEvent, Window};

pub use document::WebDocument;
pub use restore::RestoreSchedule;
pub use storage::LocalStorage;

const COMMANDS: &str = include_str!("../../data/commands.json");
const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

type WebPage = Page<WebDocument, LocalStorage>;

struct Runtime {
    page: WebPage,
    restore: RestoreSchedule,
}

type Shared = Rc<RefCell<Runtime>>;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsError> {
    let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsError::new("no document"))?;

    let content = ContentModel::from_json(COMMANDS)?;
    let doc = WebDocument::new(document.clone())
        .ok_or_else(|| JsError::new("document has no root element"))?;
    let options = PageOptions::from_document(&doc);
    let page = Page::load(
        doc,
        content.categories(),
        LocalStorage::new(&window),
        system_theme(&window),
        options,
    )?;
    let runtime = Rc::new(RefCell::new(Runtime {
        page,
        restore: RestoreSchedule::new(),
    }));

    listen_for_clicks(&document, Rc::clone(&runtime))?;
    listen_for_system_theme(&window, runtime)?;

    info!(sections = content.len(), "page ready");
    Ok(())
}

fn now() -> Duration {
    Duration::from_secs_f64(js_sys::Date::now() / 1000.0)
}

fn js_error(value: JsValue) -> JsError {
    JsError::new(&format!("{value:?}"))
}

fn system_theme(window: &Window) -> Theme {
    let dark = window
        .match_media(DARK_SCHEME_QUERY)
        .ok()
        .flatten()
        .is_some_and(|query| query.matches());
    if dark { Theme::Dark } else { Theme::Light }
}

fn listen_for_clicks(document: &web_sys::Document, runtime: Shared) -> Result<(), JsError> {
    let handler = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };

        let click = runtime.borrow_mut().page.click(&target);
        match click {
            Click::Copy(request) => write_to_clipboard(Rc::clone(&runtime), request),
            Click::Section { expanded } => debug!(expanded, "section toggled"),
            Click::Theme(theme) => debug!(%theme, "theme toggled"),
            Click::Ignored => {}
        }
    });

    document
        .add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())
        .map_err(js_error)?;
    handler.forget();
    Ok(())
}

fn write_to_clipboard(runtime: Shared, request: CopyRequest<Element>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let promise = window.navigator().clipboard().write_text(&request.payload);

    spawn_local(async move {
        let result = JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|e| ClipboardError(format!("{e:?}")));

        let delay = {
            let mut guard = runtime.borrow_mut();
            let Runtime { page, restore } = &mut *guard;
            let now = now();
            page.complete_copy(&request, result, now);
            restore.after_copy(page, now)
        };
        if let Some(delay) = delay {
            arm_restore(&window, runtime, delay);
        }
    });
}

/// Arm the one-shot timeout that reverts due feedback, then re-arms while any is pending.
fn arm_restore(window: &Window, runtime: Shared, delay: Duration) {
    let callback = Closure::once_into_js(move || {
        let next = {
            let mut guard = runtime.borrow_mut();
            let Runtime { page, restore } = &mut *guard;
            restore.fired(page, now())
        };
        if let (Some(delay), Some(window)) = (next, web_sys::window()) {
            arm_restore(&window, runtime, delay);
        }
    });

    let delay = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    if let Err(e) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
    {
        warn!("could not schedule feedback restore: {e:?}");
    }
}

fn listen_for_system_theme(window: &Window, runtime: Shared) -> Result<(), JsError> {
    let Some(query) = window.match_media(DARK_SCHEME_QUERY).map_err(js_error)? else {
        return Ok(());
    };

    let handler = Closure::<dyn FnMut(MediaQueryListEvent)>::new(move |event: MediaQueryListEvent| {
        let system = if event.matches() { Theme::Dark } else { Theme::Light };
        if let Some(theme) = runtime.borrow_mut().page.system_theme_changed(system) {
            debug!(%theme, "system colour scheme changed");
        }
    });

    query
        .add_event_listener_with_callback("change", handler.as_ref().unchecked_ref())
        .map_err(js_error)?;
    handler.forget();
    Ok(())
}
