pub mod action_state;
pub mod proxy_record;
pub mod token_scheme;
