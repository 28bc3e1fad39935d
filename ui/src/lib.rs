// The client-side Dioxus application logic.

use dioxus::prelude::*;

pub mod compat;
pub mod components;
pub mod eth;
pub mod hooks;
pub mod screens;

use api::prefs::theme::Theme;
use api::prefs::THEME_KEY;
use components::pico::Container;
use components::theme_toggle::ThemeToggle;
use components::toast::use_toast_provider;
use components::toast::Toaster;
use hooks::use_persisted_state::use_persisted_state;
use screens::connector::ConnectorScreen;

/// Stylesheet the pico components build on.
const PICO_CSS_URL: &str = "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";

const APP_CSS: &str = r#"
    .connector-shell {
        min-height: 100vh;
        display: flex;
        align-items: center;
        justify-content: center;
        transition: background 0.5s;
    }
    .connector-shell[data-theme="light"] {
        background: linear-gradient(135deg, #fefce8, #ffffff, #fef9c3);
    }
    .connector-shell[data-theme="dark"] {
        background: linear-gradient(135deg, #111827, #000000, #1f2937);
    }
    .connector-shell > main.container {
        max-width: 28rem;
    }
    .connector-shell article {
        text-align: center;
        border: 1px solid rgba(250, 204, 21, 0.3);
        border-radius: 1.5rem;
    }
    .connector-shell hgroup h2 {
        color: #facc15;
        margin-bottom: 0.25rem;
    }

    .theme-toggle {
        position: absolute;
        top: 1.5rem;
        right: 1.5rem;
        width: 3.5rem;
        height: 1.75rem;
        padding: 0;
        border: none;
        border-radius: 9999px;
        background-color: #d1d5db;
    }
    [data-theme="dark"] .theme-toggle {
        background-color: #374151;
    }
    .theme-knob {
        position: absolute;
        left: 0.15rem;
        top: 0.15rem;
        width: 1.45rem;
        height: 1.45rem;
        border-radius: 50%;
        background-color: #ffffff;
        font-size: 0.9rem;
        line-height: 1.45rem;
        transition: transform 0.3s;
    }
    .theme-knob-dark {
        transform: translateX(1.75rem);
        background-color: #facc15;
    }

    .account-address {
        cursor: pointer;
        user-select: all;
        margin-top: 0.75rem;
    }
    .connected-flag {
        font-weight: 600;
        color: #facc15;
        margin-bottom: 0;
    }
    .session-details {
        margin: 1rem 0;
        padding: 0.75rem;
        border: 1px solid rgba(250, 204, 21, 0.2);
        border-radius: 1rem;
        font-size: 0.9rem;
    }
    .session-details p {
        margin: 0.25rem 0;
    }
    .install-title {
        font-size: 1.1rem;
        font-weight: 500;
        color: #facc15;
    }

    .toast-stack {
        position: fixed;
        top: 4rem;
        right: 1.5rem;
        display: flex;
        flex-direction: column;
        gap: 0.5rem;
        z-index: 1000;
    }
    .toast {
        margin: 0;
        padding: 0.5rem 1rem;
        border-radius: 0.75rem;
        cursor: pointer;
        font-size: 0.9rem;
    }
    .toast-success { border-left: 4px solid #22c55e; }
    .toast-error { border-left: 4px solid #ef4444; }
    .toast-info { border-left: 4px solid #9ca3af; }
"#;

/// Root component of the wallet-connector widget.
#[allow(non_snake_case)]
pub fn App() -> Element {
    use_toast_provider();

    // Follow the OS color scheme until the user picks a side; the choice is
    // durable across reloads.
    let theme = use_persisted_state(THEME_KEY, || {
        if compat::prefers_dark() {
            Theme::Dark
        } else {
            Theme::Light
        }
    });

    rsx! {
        document::Meta {
            name: "viewport",
            content: "width=device-width, initial-scale=1.0",
        }
        document::Stylesheet { href: "{PICO_CSS_URL}" }
        style { "{APP_CSS}" }
        div {
            class: "connector-shell",
            "data-theme": theme().attr(),
            ThemeToggle { theme }
            Container {
                ConnectorScreen {}
            }
            Toaster {}
        }
    }
}
