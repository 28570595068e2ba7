pub mod services {
    pub mod pay;
}

pub mod dtos {
    pub mod pay;
}

pub mod models {
    pub mod session;
}

pub use dtos::pay::{Notification, PaymentUser};
pub use models::session::{PaymentSession, RecurrentSession};
pub use services::pay::{PaymentInitiator, PaymentsService};
