pub mod health;
pub mod message;
pub mod monitoring;
pub mod parameter;
pub mod request;
pub mod response;
pub mod template;
pub mod validation;
