pub mod proxy_store;
pub mod suppression_list;

pub use proxy_store::{InsertOutcome, MarkUsed, ProxyStore};
pub use suppression_list::SuppressionList;
