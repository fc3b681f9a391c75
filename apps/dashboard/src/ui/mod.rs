pub mod accounts;
pub mod analysis;
pub mod chart;
pub mod connection;
pub mod notifications;
pub mod question;
pub mod render;
