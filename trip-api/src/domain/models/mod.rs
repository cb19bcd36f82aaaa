pub mod account;
pub mod activity;
pub mod auth;
pub mod booking;
pub mod category;
pub mod chat;
pub mod destination;
pub mod enums;
pub mod flight;
pub mod notification;
pub mod subscription;
pub mod wallet;
