//! Payment Failed Page

use leptos::prelude::*;
use leptos_router::hooks::use_location;
use tokenize_core::routes::{failure_message, retry_path};
use tokenize_core::AppRoute;

use crate::api;
use crate::components::DetailRow;

#[component]
pub fn PaymentFailedPage() -> impl IntoView {
    let location = use_location();
    let route = api::current_route(&location.pathname.get_untracked(), &location.search.get_untracked());

    let (error_code, order_id) = match route {
        AppRoute::PaymentFailed { error_code, order_id } => (error_code, order_id),
        _ => (None, None),
    };
    let message = failure_message(error_code.as_deref());
    let retry = retry_path(order_id.as_deref());

    view! {
        <div class="result result-failed">
            <h1>"✕ Payment Failed"</h1>
            <p class="subtitle">{message}</p>

            <section class="details">
                {order_id.map(|id| view! { <DetailRow label="Order" value=id /> })}
                {error_code.map(|code| view! { <DetailRow label="Error code" value=code /> })}
            </section>

            <div class="cta">
                <a href=retry class="btn btn-primary">"Try Again"</a>
                <a href="/" class="btn">"Home"</a>
            </div>
        </div>
    }
}
