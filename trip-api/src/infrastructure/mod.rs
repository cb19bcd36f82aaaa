pub mod chat_hub;
pub mod database;
pub mod push;
pub mod repositories;
pub mod token_store;
