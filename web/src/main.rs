use dioxus::prelude::*;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");

    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        dioxus::launch(App);
    }
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("this entry point targets the browser; build it for wasm32-unknown-unknown");
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
#[component]
fn App() -> Element {
    ui::App()
}
