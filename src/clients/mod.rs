pub mod backend;
pub mod health;
pub mod poller;
