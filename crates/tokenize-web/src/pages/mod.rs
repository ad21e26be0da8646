//! Page Components

mod home;
mod order_details;
mod payment_failed;

pub use home::HomePage;
pub use order_details::OrderDetailsPage;
pub use payment_failed::PaymentFailedPage;
pub use payment_test::PaymentTestPage;
