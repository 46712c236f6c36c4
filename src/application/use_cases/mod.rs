pub mod gateway;
pub mod tokens;
pub mod unsubscribe;
