// Account administration: generation, listing, export.

pub mod export;
pub mod handlers;
pub mod store;
