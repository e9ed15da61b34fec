// Application layer - the ledger service and its boundary records.

pub mod error;
pub mod mapper;
pub mod service;

pub use error::*;
pub use mapper::{AccountView, CreateAccountRequest, TransactionView};
pub use service::*;
