use futures::channel::mpsc::UnboundedSender;
use js_sys::{Function, Promise, Reflect};
use vault_core::capture::ShareOutcome;
use vault_core::ingest::{IngestEvent, PendingFile};
use vault_core::model::Attachment;
use vault_core::store::{IncidentStore, KeyValue, Stamp};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FileReader, HtmlInputElement};

fn storage() -> Result<web_sys::Storage, String> {
    let window = web_sys::window().ok_or_else(|| "window not available".to_string())?;
    window
        .local_storage()
        .map_err(|e| format!("localStorage unavailable: {e:?}"))?
        .ok_or_else(|| "localStorage disabled".to_string())
}

/// localStorage-backed store seam.
pub struct LocalStorage;

impl KeyValue for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        storage()?
            .get_item(key)
            .map_err(|e| format!("get '{key}' failed: {e:?}"))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        storage()?
            .set_item(key, value)
            .map_err(|e| format!("set '{key}' failed: {e:?}"))
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        storage()?
            .remove_item(key)
            .map_err(|e| format!("remove '{key}' failed: {e:?}"))
    }
}

/// Browser clock and id source.
pub struct BrowserStamp;

impl Stamp for BrowserStamp {
    fn new_id(&self) -> String {
        random_uuid().unwrap_or_else(fallback_id)
    }

    fn now_iso(&self) -> String {
        js_sys::Date::new_0().to_iso_string().into()
    }
}

pub fn store() -> IncidentStore<LocalStorage, BrowserStamp> {
    IncidentStore::new(LocalStorage, BrowserStamp)
}

fn random_uuid() -> Option<String> {
    let window = web_sys::window()?;
    let crypto = Reflect::get(&window, &JsValue::from_str("crypto")).ok()?;
    let random_uuid = Reflect::get(&crypto, &JsValue::from_str("randomUUID")).ok()?;
    if !random_uuid.is_function() {
        return None;
    }

    random_uuid
        .unchecked_into::<Function>()
        .call0(&crypto)
        .ok()?
        .as_string()
}

// Non-secure contexts have no crypto.randomUUID.
fn fallback_id() -> String {
    format!(
        "{:x}-{:x}",
        (js_sys::Math::random() * 1e15) as u64,
        (js_sys::Math::random() * 1e15) as u64
    )
}

pub fn display_date(iso: &str) -> String {
    js_sys::Date::new(&JsValue::from_str(iso))
        .to_locale_date_string("default", &JsValue::UNDEFINED)
        .into()
}

pub fn now_display() -> String {
    js_sys::Date::new_0()
        .to_locale_string("default", &JsValue::UNDEFINED)
        .into()
}

pub fn share_supported() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    Reflect::get(&window.navigator(), &JsValue::from_str("share"))
        .map(|v| v.is_function())
        .unwrap_or(false)
}

/// Hand the composed report to the native share sheet. A dismissed sheet
/// (`AbortError`) is a cancellation, everything else a failure.
pub async fn share(title: &str, text: &str) -> ShareOutcome {
    match try_share(title, text).await {
        Ok(()) => ShareOutcome::Shared,
        Err(err) if is_abort(&err) => ShareOutcome::Cancelled,
        Err(err) => {
            log_error(&format!("share failed: {err:?}"));
            ShareOutcome::Failed
        }
    }
}

async fn try_share(title: &str, text: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window not available"))?;
    let navigator = window.navigator();

    let share_fn = Reflect::get(&navigator, &JsValue::from_str("share"))?;
    if !share_fn.is_function() {
        return Err(JsValue::from_str("navigator.share unavailable"));
    }

    let data = js_sys::Object::new();
    Reflect::set(&data, &JsValue::from_str("title"), &JsValue::from_str(title))?;
    Reflect::set(&data, &JsValue::from_str("text"), &JsValue::from_str(text))?;

    let promise = share_fn
        .unchecked_into::<Function>()
        .call1(&navigator, &data)?;
    JsFuture::from(Promise::from(promise)).await?;
    Ok(())
}

fn is_abort(err: &JsValue) -> bool {
    Reflect::get(err, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string())
        .is_some_and(|name| name == "AbortError")
}

pub fn print() {
    if let Some(window) = web_sys::window() {
        if let Err(err) = window.print() {
            log_error(&format!("print failed: {err:?}"));
        }
    }
}

pub fn log_error(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(message));
}

/// Drain the picker's file list and reset it so re-picking the same file
/// fires another change event.
pub fn take_selected_files(input: &HtmlInputElement) -> Vec<File> {
    let mut files = Vec::new();
    if let Some(list) = input.files() {
        for index in 0..list.length() {
            if let Some(file) = list.get(index) {
                files.push(file);
            }
        }
    }
    input.set_value("");
    files
}

pub fn file_meta(file: &File) -> PendingFile {
    PendingFile {
        name: file.name(),
        kind: file.type_(),
        size: file.size() as u64,
    }
}

/// Read one admitted file into a data URI. The outcome lands on the ingest
/// channel; concurrent reads report in whatever order the host finishes.
pub fn read_file(file: File, tx: UnboundedSender<IngestEvent>) {
    let name = file.name();
    let kind = file.type_();

    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(_) => {
            let _ = tx.unbounded_send(IngestEvent::Failed { name });
            return;
        }
    };

    let onload = {
        let reader = reader.clone();
        let tx = tx.clone();
        let name = name.clone();
        let kind = kind.clone();
        Closure::<dyn FnMut()>::new(move || {
            let event = match reader.result().ok().and_then(|value| value.as_string()) {
                Some(data_url) => IngestEvent::Loaded {
                    attachment: Attachment {
                        name: name.clone(),
                        kind: kind.clone(),
                        data_url,
                    },
                },
                None => IngestEvent::Failed { name: name.clone() },
            };
            let _ = tx.unbounded_send(event);
        })
    };

    let onerror = {
        let tx = tx.clone();
        let name = name.clone();
        Closure::<dyn FnMut()>::new(move || {
            let _ = tx.unbounded_send(IngestEvent::Failed { name: name.clone() });
        })
    };

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));

    // The reader fires these at most once; they must outlive this call.
    onload.forget();
    onerror.forget();

    if reader.read_as_data_url(&file).is_err() {
        let _ = tx.unbounded_send(IngestEvent::Failed { name });
    }
}
