pub mod client_message;
pub mod payload;
