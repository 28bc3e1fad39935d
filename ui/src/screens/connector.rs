//=============================================================================
// File: ui/src/screens/connector.rs
//=============================================================================
use api::session::SessionPhase;
use api::session::WalletSession;
use dioxus::prelude::*;

use crate::components::address::CopyableAddress;
use crate::components::pico::Button;
use crate::components::pico::ButtonType;
use crate::components::pico::Card;
use crate::hooks::use_wallet_session::use_wallet_session;
use crate::hooks::use_wallet_session::WalletSessionHandle;

/// The wallet-connector widget: install prompt, connect flow, and the
/// connected account card.
#[component]
pub fn ConnectorScreen() -> Element {
    let wallet = use_wallet_session();
    let session = (wallet.session())();

    let body = match (session.phase, session.address.is_some()) {
        (SessionPhase::NoProvider, _) => install_prompt(),
        (SessionPhase::Connected, true) => connected_panel(wallet, &session),
        (phase, _) => connect_button(wallet, phase.is_connecting()),
    };

    rsx! {
        Card {
            hgroup {
                h2 { "GoldenCity Wallet Connector" }
                p { "Your gateway to smart property investment" }
            }
            {body}
        }
    }
}

fn connected_panel(wallet: WalletSessionHandle, session: &WalletSession) -> Element {
    let Some(address) = session.address.clone() else {
        return connect_button(wallet, false);
    };
    let network = session
        .chain
        .as_ref()
        .map(|chain| chain.label())
        .unwrap_or_else(|| "…".to_string());
    let balance = session
        .balance_display
        .clone()
        .unwrap_or_else(|| "…".to_string());

    rsx! {
        div {
            class: "connected-panel",
            CopyableAddress { address }
            div {
                class: "session-details",
                p {
                    strong { "Network: " }
                    "{network}"
                }
                p {
                    strong { "Balance: " }
                    "{balance} ETH"
                }
            }
            Button {
                button_type: ButtonType::Secondary,
                outline: true,
                on_click: move |_| wallet.disconnect(),
                "Disconnect"
            }
        }
    }
}

fn connect_button(wallet: WalletSessionHandle, connecting: bool) -> Element {
    rsx! {
        div {
            class: "connect-area",
            Button {
                disabled: connecting,
                busy: connecting,
                on_click: move |_| wallet.connect(),
                if connecting { "Connecting..." } else { "Connect Wallet" }
            }
        }
    }
}

fn install_prompt() -> Element {
    rsx! {
        div {
            class: "install-prompt",
            p { class: "install-title", "MetaMask not detected" }
            p { "Please install the MetaMask extension to continue." }
            a {
                href: "https://metamask.io/download.html",
                target: "_blank",
                rel: "noreferrer",
                role: "button",
                "Install MetaMask"
            }
        }
    }
}
