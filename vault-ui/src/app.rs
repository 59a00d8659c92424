use crate::bridge;
use crate::capture::CaptureScreen;
use crate::dashboard::Dashboard;
use crate::toast::{ToastTray, Toasts};
use leptos::*;
use vault_core::model::{Incident, NewIncident};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Capture,
}

#[component]
pub fn App() -> impl IntoView {
    let toasts = Toasts::new();
    let screen = create_rw_signal(Screen::Dashboard);
    let incidents = create_rw_signal(Vec::<Incident>::new());

    {
        let store = bridge::store();
        let loaded = store.load();
        if let Some(warning) = loaded.warning {
            toasts.error(warning.to_string());
        }
        incidents.set(loaded.incidents);

        if let Err(err) = store.ensure_user_id() {
            bridge::log_error(&format!("failed to persist reporter id: {err}"));
        }
    }

    let on_log_new = Callback::new(move |_: ()| screen.set(Screen::Capture));
    let on_back = Callback::new(move |_: ()| screen.set(Screen::Dashboard));
    let on_saved = Callback::new(move |new: NewIncident| {
        let mut warning = None;
        incidents.update(|list| {
            let (_, save_warning) = bridge::store().append(list, new);
            warning = save_warning;
        });
        if let Some(warning) = warning {
            toasts.error(warning.to_string());
        }
        toasts.success("New incident logged successfully!");
        screen.set(Screen::Dashboard);
    });

    view! {
      <div class="shell">
        <ToastTray toasts/>
        {move || match screen.get() {
            Screen::Dashboard => view! { <Dashboard incidents on_log_new/> }.into_view(),
            Screen::Capture => view! { <CaptureScreen toasts on_saved on_back/> }.into_view(),
        }}
      </div>
    }
}
