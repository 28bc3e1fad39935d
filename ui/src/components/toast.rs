//! Transient notification stack: the widget's notification sink.

use api::notify::NoticeLevel;
use api::notify::NotificationSink;
use dioxus::prelude::*;

/// How many one-second sweeps a toast stays visible.
const TOAST_TICKS: u8 = 4;

#[derive(Clone, PartialEq)]
struct Toast {
    id: u64,
    level: NoticeLevel,
    message: String,
    ticks_left: u8,
}

/// Reactive toast stack, provided as a context at the app root.
#[derive(Clone, Copy)]
pub struct Toasts {
    items: Signal<Vec<Toast>>,
    next_id: Signal<u64>,
}

impl Toasts {
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let id = {
            let mut next = self.next_id.write();
            *next += 1;
            *next
        };
        self.items.write().push(Toast {
            id,
            level,
            message: message.into(),
            ticks_left: TOAST_TICKS,
        });
    }

    fn dismiss(&mut self, id: u64) {
        self.items.write().retain(|toast| toast.id != id);
    }

    fn sweep(&mut self) {
        if self.items.peek().is_empty() {
            return;
        }
        let mut items = self.items.write();
        for toast in items.iter_mut() {
            toast.ticks_left = toast.ticks_left.saturating_sub(1);
        }
        items.retain(|toast| toast.ticks_left > 0);
    }
}

/// Installs the toast context at the calling component and returns the handle.
pub fn use_toast_provider() -> Toasts {
    let items = use_signal(Vec::new);
    let next_id = use_signal(|| 0u64);
    use_context_provider(|| Toasts { items, next_id })
}

/// The toast context installed by [`use_toast_provider`].
pub fn use_toasts() -> Toasts {
    use_context::<Toasts>()
}

/// Notification sink that lands messages on the toast stack.
pub struct ToastSink(Toasts);

impl ToastSink {
    pub fn new(toasts: Toasts) -> Self {
        Self(toasts)
    }
}

impl NotificationSink for ToastSink {
    fn notify(&self, level: NoticeLevel, message: &str) {
        let mut toasts = self.0;
        toasts.push(level, message);
    }
}

/// Renders the stack overlay and ages visible toasts out. Place once at the
/// app root, inside the provider installed by [`use_toast_provider`].
#[component]
pub fn Toaster() -> Element {
    let mut toasts = use_toasts();
    let items = toasts.items;

    use_coroutine(move |_rx: UnboundedReceiver<()>| {
        let mut toasts = toasts;
        async move {
            loop {
                crate::compat::sleep(std::time::Duration::from_secs(1)).await;
                toasts.sweep();
            }
        }
    });

    rsx! {
        div {
            class: "toast-stack",
            for toast in items() {
                article {
                    key: "{toast.id}",
                    class: {
                        match toast.level {
                            NoticeLevel::Info => "toast toast-info",
                            NoticeLevel::Success => "toast toast-success",
                            NoticeLevel::Error => "toast toast-error",
                        }
                    },
                    onclick: move |_| toasts.dismiss(toast.id),
                    "{toast.message}"
                }
            }
        }
    }
}
