//! The client side of the expense tracker.
//!
//! [ExpenseController] holds the state of the expense list and form and
//! decides which API calls to make. [ExpenseSession] runs a controller
//! against an [ExpenseApi] and an [ExpenseUi].

mod api;
mod controller;
mod service_client;
mod session;

pub use api::{ApiCall, ApiFailure, ApiReply, ExpenseApi, send};
pub use controller::{
    Effect, ExpenseController, FormMode, Notification, NotificationKind, Request, RequestId,
};
pub use service_client::{RouterClient, ServiceClient};
pub use session::{DELETE_CONFIRMATION, ExpenseSession, ExpenseUi};
