// Resume intake: text extraction, keyword scoring, and the analysis history.

pub mod analysis;
pub mod extract;
pub mod handlers;
pub mod scoring;
pub mod store;
