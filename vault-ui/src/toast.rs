use leptos::*;
use std::time::Duration;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Toast {
    id: u32,
    kind: ToastKind,
    message: String,
}

/// App-wide toast handle. Copyable into any closure.
#[derive(Clone, Copy)]
pub struct Toasts {
    items: RwSignal<Vec<Toast>>,
    next_id: RwSignal<u32>,
}

impl Toasts {
    pub fn new() -> Self {
        Self {
            items: create_rw_signal(Vec::new()),
            next_id: create_rw_signal(0),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    fn push(&self, kind: ToastKind, message: String) {
        let id = self.next_id.get_untracked() + 1;
        self.next_id.set(id);
        self.items
            .update(|items| items.push(Toast { id, kind, message }));

        let items = self.items;
        set_timeout(
            move || {
                let _ = items.try_update(|items| items.retain(|toast| toast.id != id));
            },
            Duration::from_millis(4000),
        );
    }
}

#[component]
pub fn ToastTray(toasts: Toasts) -> impl IntoView {
    view! {
      <div class="toast-tray">
        <For
          each=move || toasts.items.get()
          key=|toast| toast.id
          children=|toast| {
            let class = match toast.kind {
                ToastKind::Success => "toast success",
                ToastKind::Error => "toast error",
            };
            view! { <div class=class>{toast.message}</div> }
          }
        />
      </div>
    }
}
