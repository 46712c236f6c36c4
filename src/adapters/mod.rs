pub mod http;
pub mod sheet;
