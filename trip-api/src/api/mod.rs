pub mod accounts;
pub mod activities;
pub mod admin;
pub mod auth;
pub mod bookings;
pub mod categories;
pub mod chat;
pub mod destinations;
pub mod flights;
pub mod notifications;
pub mod subscriptions;
pub mod wallet;

#[cfg(test)]
mod tests;
