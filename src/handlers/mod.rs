pub mod receipts;
pub mod setup;
