pub mod aggregate;
pub mod browser;
pub mod controller;
pub mod fetcher;
