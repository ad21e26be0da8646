//! Home Page

use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home">
            <header class="hero">
                <h1>"Hosted Tokenization"</h1>
                <p class="tagline">"Card tokenization through the gateway's hosted page, styled to match"</p>
                <div class="cta">
                    <a href="/payment-test" class="btn btn-primary">"Start Test Payment"</a>
                </div>
            </header>

            <section class="features">
                <div class="feature">
                    <h3>"🔒 Card data stays with the gateway"</h3>
                    <p>"Card fields live in the gateway's frame. This page never sees them."</p>
                </div>
                <div class="feature">
                    <h3>"🎨 Themed frame"</h3>
                    <p>"Light and dark stylesheets are pushed into the frame once it reports ready."</p>
                </div>
                <div class="feature">
                    <h3>"↩️ Verified callbacks"</h3>
                    <p>"Redirects are only followed from trusted origins for the current order."</p>
                </div>
            </section>
        </div>
    }
}
