use api::prefs::theme::Theme;
use dioxus::prelude::*;

/// Switch-style theme toggle pinned to the shell corner.
#[component]
pub fn ThemeToggle(theme: Signal<Theme>) -> Element {
    rsx! {
        button {
            class: "theme-toggle",
            role: "switch",
            "aria-checked": theme().is_dark(),
            title: "Toggle theme",
            onclick: move |_| {
                let next = theme.peek().toggled();
                theme.set(next);
            },
            span {
                class: if theme().is_dark() { "theme-knob theme-knob-dark" } else { "theme-knob" },
                if theme().is_dark() { "🌙" } else { "☀️" }
            }
        }
    }
}
