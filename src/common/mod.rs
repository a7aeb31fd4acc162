pub mod error;
pub mod pubsub;
pub mod response;
