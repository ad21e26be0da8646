//! Main App Component

use leptos::prelude::*;
use leptos_router::{components::*, path};

use crate::components::Navbar;
use crate::pages::{HomePage, OrderDetailsPage, PaymentFailedPage, PaymentTestPage};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <Navbar />
            <main class="app">
                <Routes fallback=|| view! { <p>"Page not found"</p> }>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/payment-test") view=PaymentTestPage />
                    <Route path=path!("/order-details") view=OrderDetailsPage />
                    <Route path=path!("/order-details/:order_id") view=OrderDetailsPage />
                    <Route path=path!("/payment-failed") view=PaymentFailedPage />
                    <Route path=path!("/payment-failed/:error_code") view=PaymentFailedPage />
                    <Route path=path!("/payment-failed/:error_code/:order_id") view=PaymentFailedPage />
                </Routes>
            </main>
        </Router>
    }
}
