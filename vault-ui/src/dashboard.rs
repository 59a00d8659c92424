use crate::bridge;
use leptos::*;
use vault_core::model::Incident;

#[component]
pub fn Dashboard(
    incidents: RwSignal<Vec<Incident>>,
    #[prop(into)] on_log_new: Callback<()>,
) -> impl IntoView {
    view! {
      <div class="screen dashboard">
        <header class="dashboard-header">
          <h1>"Amani Vault"</h1>
          <p>"Your safety and privacy are our priority. You are anonymous here."</p>
        </header>

        <main>
          <button class="primary wide" on:click=move |_| on_log_new.call(())>
            "Log New Incident"
          </button>

          <h2>"Previous Incidents"</h2>
          <Show
            when=move || !incidents.get().is_empty()
            fallback=|| view! {
              <div class="empty-state">
                <p>"You have no logged incidents."</p>
                <p class="meta">"Click the button above to get started."</p>
              </div>
            }
          >
            <ul class="incident-list">
              <For
                each=move || incidents.get()
                key=|incident| incident.id.clone()
                children=|incident| {
                  let when = bridge::display_date(&incident.date);
                  let attached = incident.attachments.len();
                  view! {
                    <li class="incident-card">
                      <div class="incident-text">
                        <p class="incident-title">{incident.title.clone()}</p>
                        <p class="incident-preview">{incident.preview.clone()}</p>
                      </div>
                      <div class="incident-side">
                        {(attached > 0).then(|| view! {
                          <span class="badge">{format!("{attached} attached")}</span>
                        })}
                        <span class="meta">{when}</span>
                      </div>
                    </li>
                  }
                }
              />
            </ul>
          </Show>
        </main>
      </div>
    }
}
