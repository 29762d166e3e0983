// Student academic profiles and the placement ledger.

pub mod handlers;
pub mod store;
