mod app;
mod bridge;
mod capture;
mod dashboard;
mod toast;

fn main() {
    leptos::mount_to_body(app::App);
}
