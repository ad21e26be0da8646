//! Order Details Page

use chrono::Utc;
use leptos::prelude::*;
use leptos_router::hooks::use_location;
use tokenize_core::{routes::generate_order_id, AppRoute};

use crate::api;
use crate::components::DetailRow;

#[component]
pub fn OrderDetailsPage() -> impl IntoView {
    let location = use_location();
    let route = api::current_route(&location.pathname.get_untracked(), &location.search.get_untracked());

    let (order_id, card_last4) = match route {
        AppRoute::OrderDetails { order_id, card_last4 } => (order_id, card_last4),
        _ => (None, None),
    };
    let order_id = order_id.unwrap_or_else(|| generate_order_id(Utc::now()));
    let card = card_last4.map(|last4| format!("•••• •••• •••• {last4}"));

    view! {
        <div class="result result-success">
            <h1>"✓ Card Tokenized"</h1>
            <p class="subtitle">"The gateway accepted the card and returned a token."</p>

            <section class="details">
                <DetailRow label="Order" value=order_id />
                {card.map(|card| view! { <DetailRow label="Card" value=card /> })}
                <DetailRow label="Status" value="Tokenized".to_string() />
            </section>

            <div class="cta">
                <a href="/payment-test" class="btn btn-primary">"New Payment"</a>
                <a href="/" class="btn">"Home"</a>
            </div>
        </div>
    }
}
