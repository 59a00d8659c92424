use crate::bridge;
use crate::toast::Toasts;
use futures::StreamExt;
use leptos::html;
use leptos::*;
use vault_core::capture as flow;
use vault_core::capture::{CaptureEvent, Command, Phase, ShareOutcome};
use vault_core::ingest::{self, MAX_ATTACHMENTS};
use vault_core::model::{Attachment, NewIncident};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

/// Everything one capture session mutates, copyable into event closures.
#[derive(Clone, Copy)]
struct Session {
    phase: RwSignal<Phase>,
    title: RwSignal<String>,
    preview: RwSignal<String>,
    attachments: RwSignal<Vec<Attachment>>,
    toasts: Toasts,
    on_saved: Callback<NewIncident>,
}

/// Run one flow transition and its command. The flow itself decides every
/// phase change; this only wires commands to the host.
fn dispatch(session: Session, event: CaptureEvent) {
    // The share sheet can resolve after this screen is gone.
    let Some(phase) = session.phase.try_get_untracked() else {
        return;
    };

    let ready = flow::draft_ready(
        &session.title.get_untracked(),
        &session.preview.get_untracked(),
    );
    let step = flow::step(phase, ready, event);

    if let Some(warning) = &step.warning {
        session.toasts.error(warning.to_string());
    }
    session.phase.set(step.phase);

    match step.command {
        Some(Command::OpenShare) => {
            let text = flow::report_text(
                &bridge::now_display(),
                &session.title.get_untracked(),
                &session.preview.get_untracked(),
            );
            spawn_local(async move {
                let outcome = bridge::share("Incident Report", &text).await;
                if outcome == ShareOutcome::Shared {
                    session.toasts.success("Incident ready for sharing!");
                }
                dispatch(session, CaptureEvent::ShareFinished(outcome));
            });
        }
        Some(Command::Finalize) => {
            session.on_saved.call(NewIncident {
                title: session.title.get_untracked(),
                preview: session.preview.get_untracked(),
                attachments: session.attachments.get_untracked(),
            });
        }
        None => {}
    }
}

#[component]
pub fn CaptureScreen(
    toasts: Toasts,
    #[prop(into)] on_saved: Callback<NewIncident>,
    #[prop(into)] on_back: Callback<()>,
) -> impl IntoView {
    let phase = create_rw_signal(Phase::Editing);
    let title = create_rw_signal(String::new());
    let preview = create_rw_signal(String::new());
    let attachments = create_rw_signal(Vec::<Attachment>::new());
    let pending_reads = create_rw_signal(0usize);
    let file_input = create_node_ref::<html::Input>();
    let can_share = bridge::share_supported();

    let session = Session {
        phase,
        title,
        preview,
        attachments,
        toasts,
        on_saved,
    };

    // Every file read reports here; the reducer appends completions in
    // arrival order. The loop ends once this screen is gone.
    let (ingest_tx, mut ingest_rx) = ingest::ingest_channel();
    spawn_local(async move {
        while let Some(event) = ingest_rx.next().await {
            let _ = pending_reads.try_update(|n| *n = n.saturating_sub(1));
            let mut rejection = None;
            if attachments
                .try_update(|list| rejection = ingest::apply(list, event))
                .is_none()
            {
                break;
            }
            if let Some(rejection) = rejection {
                toasts.error(rejection.to_string());
            }
        }
    });

    let on_files_picked = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|target| target.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };

        let picked = bridge::take_selected_files(&input);
        if picked.is_empty() {
            return;
        }

        let metas: Vec<_> = picked.iter().map(bridge::file_meta).collect();
        let current = attachments.with_untracked(Vec::len) + pending_reads.get_untracked();
        let plan = ingest::plan_batch(current, &metas);

        for rejection in &plan.rejections {
            toasts.error(rejection.to_string());
        }
        for index in plan.accepted {
            pending_reads.update(|n| *n += 1);
            bridge::read_file(picked[index].clone(), ingest_tx.clone());
        }
    };

    let remove_attachment = move |index: usize| {
        attachments.update(|list| {
            if index < list.len() {
                list.remove(index);
            }
        });
    };

    // The host fires afterprint once the dialog closes, printed or not.
    let print_listener = window_event_listener_untyped("afterprint", move |_| {
        dispatch(session, CaptureEvent::PrintDismissed);
    });
    on_cleanup(move || print_listener.remove());

    let attachment_count = move || attachments.get().len() + pending_reads.get();
    let ready = move || flow::draft_ready(&title.get(), &preview.get());

    view! {
      <div class="screen capture">
        <Show when=move || phase.get() == Phase::Previewing fallback=|| ()>
          <ReportPreview
            title
            preview
            attachments
            on_cancel=move |_: ()| dispatch(session, CaptureEvent::PreviewCancelled)
            on_print=move |_: ()| bridge::print()
          />
        </Show>

        <header class="screen-header no-print">
          <button class="icon" on:click=move |_| on_back.call(())>"Back"</button>
          <h1>"Log New Incident"</h1>
          <span class="spacer"></span>
        </header>

        <main class="capture-form no-print">
          <p class="hint">
            "Provide incident details and optionally attach up to 5 files (images, audio, video). Max 10MB per file."
          </p>

          <label>"Incident Title"</label>
          <input
            id="title"
            type="text"
            placeholder="e.g., Verbal harassment on bus"
            prop:value=move || title.get()
            on:input=move |ev| title.set(event_target_value(&ev))
          />

          <label>"Incident Details"</label>
          <textarea
            id="preview"
            rows="4"
            placeholder="Describe what happened in detail."
            prop:value=move || preview.get()
            on:input=move |ev| preview.set(event_target_value(&ev))
          />

          <label>
            {move || format!("Attachments ({}/{})", attachment_count(), MAX_ATTACHMENTS)}
          </label>
          <div class="attachment-grid">
            <For
              each=move || attachments.get().into_iter().enumerate().collect::<Vec<_>>()
              key=|(index, _)| *index
              children=move |(index, attachment)| view! {
                <div class="tile-wrap">
                  <AttachmentTile attachment/>
                  <button class="remove" on:click=move |_| remove_attachment(index)>
                    "remove"
                  </button>
                </div>
              }
            />
          </div>

          <input
            type="file"
            multiple
            accept="image/*,audio/*,video/*"
            class="hidden"
            node_ref=file_input
            on:change=on_files_picked
          />
          <button
            class="dashed wide"
            disabled=move || attachment_count() >= MAX_ATTACHMENTS
            on:click=move |_| {
              if let Some(input) = file_input.get() {
                input.click();
              }
            }
          >
            "Add Attachments"
          </button>
        </main>

        <footer class="screen-footer no-print">
          <button
            class="primary wide"
            disabled=move || !ready()
            on:click=move |_| dispatch(session, CaptureEvent::SaveRequested {
                share_available: can_share,
            })
          >
            {if can_share { "Share & Save" } else { "Preview & Save" }}
          </button>
        </footer>
      </div>
    }
}

#[component]
fn ReportPreview(
    title: RwSignal<String>,
    preview: RwSignal<String>,
    attachments: RwSignal<Vec<Attachment>>,
    #[prop(into)] on_cancel: Callback<()>,
    #[prop(into)] on_print: Callback<()>,
) -> impl IntoView {
    view! {
      <div class="preview-overlay">
        <div class="preview-body">
          <h2>"Incident Report"</h2>
          <section>
            <h3>"Date"</h3>
            <p>{bridge::now_display()}</p>
          </section>
          <section>
            <h3>"Title"</h3>
            <p class="strong">{move || title.get()}</p>
          </section>
          <section>
            <h3>"Details"</h3>
            <p class="prewrap">{move || preview.get()}</p>
          </section>
          <Show when=move || !attachments.get().is_empty() fallback=|| ()>
            <section>
              <h3>"Attachments"</h3>
              <div class="attachment-grid">
                <For
                  each=move || attachments.get().into_iter().enumerate().collect::<Vec<_>>()
                  key=|(index, _)| *index
                  children=|(_, attachment)| view! { <AttachmentTile attachment/> }
                />
              </div>
            </section>
          </Show>
        </div>
        <footer class="preview-actions no-print">
          <button on:click=move |_| on_cancel.call(())>"Cancel"</button>
          <button class="primary" on:click=move |_| on_print.call(())>
            "Print or Save as PDF"
          </button>
        </footer>
      </div>
    }
}

#[component]
fn AttachmentTile(attachment: Attachment) -> impl IntoView {
    if attachment.kind.starts_with("image/") {
        view! { <img class="tile" src=attachment.data_url alt=attachment.name/> }.into_view()
    } else {
        view! {
          <div class="tile placeholder">
            <span class="media-kind">{media_label(&attachment.kind)}</span>
            <p class="meta">{attachment.name}</p>
          </div>
        }
        .into_view()
    }
}

fn media_label(kind: &str) -> &'static str {
    if kind.starts_with("audio/") {
        "audio"
    } else if kind.starts_with("video/") {
        "video"
    } else {
        "file"
    }
}
