//! UI Components

use leptos::prelude::*;
use leptos_router::hooks::use_location;

/// Dismissable inline error
#[component]
pub fn ErrorAlert(message: String, on_dismiss: Callback<()>) -> impl IntoView {
    view! {
        <div class="alert alert-error" role="alert">
            <span class="alert-message">{message}</span>
            <button class="alert-dismiss" aria-label="Dismiss" on:click=move |_| on_dismiss.run(())>
                "×"
            </button>
        </div>
    }
}

/// One label/value row on the result pages
#[component]
pub fn DetailRow(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="detail-row">
            <span class="detail-label">{label}</span>
            <span class="detail-value">{value}</span>
        </div>
    }
}

/// Top navigation, collapsible on small screens
#[component]
pub fn Navbar() -> impl IntoView {
    let (collapsed, set_collapsed) = signal(true);
    let location = use_location();
    let link_class = move |path: &'static str| {
        move || {
            if location.pathname.get() == path {
                "nav-link active"
            } else {
                "nav-link"
            }
        }
    };
    let collapse = move |_: leptos::ev::MouseEvent| set_collapsed.set(true);

    view! {
        <nav class="navbar">
            <a class="navbar-brand" href="/">"Tokenization Demo"</a>
            <button
                class="navbar-toggler"
                aria-label="Toggle navigation"
                aria-expanded=move || (!collapsed.get()).to_string()
                on:click=move |_| set_collapsed.update(|c| *c = !*c)
            >
                "☰"
            </button>
            <ul class=move || if collapsed.get() { "navbar-nav collapsed" } else { "navbar-nav" }>
                <li><a href="/" class=link_class("/") on:click=collapse>"Home"</a></li>
                <li><a href="/payment-test" class=link_class("/payment-test") on:click=collapse>"Payment Test"</a></li>
                <li><a href="/order-details" class=link_class("/order-details") on:click=collapse>"Order Details"</a></li>
                <li><a href="/payment-failed" class=link_class("/payment-failed") on:click=collapse>"Payment Retry"</a></li>
            </ul>
        </nav>
    }
}
