//=============================================================================
// File: ui/src/components/address.rs
//=============================================================================
use api::chain::Address;
use api::notify::NoticeLevel;
use dioxus::prelude::*;

use crate::components::toast::use_toasts;

/// The connected account, abbreviated for display. Clicking copies the full
/// address text to the clipboard.
#[component]
pub fn CopyableAddress(address: Address) -> Element {
    let toasts = use_toasts();
    let abbreviated = address.abbreviated();
    let full = address.as_str().to_string();

    rsx! {
        div {
            class: "account-address",
            title: "Click to copy the full address",
            onclick: move |_| {
                let text = full.clone();
                let mut toasts = toasts;
                spawn(async move {
                    if crate::compat::clipboard_set(text).await {
                        toasts.push(NoticeLevel::Success, "Address copied!");
                    }
                });
            },
            p { class: "connected-flag", "Connected" }
            p { "Address: {abbreviated}" }
        }
    }
}
