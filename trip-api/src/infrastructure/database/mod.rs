pub mod mysql;
pub mod redis;
