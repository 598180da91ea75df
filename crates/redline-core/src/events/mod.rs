//! Pipeline event system: progress and error notifications for hosts.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::RedlineEventHandler;
pub use types::*;
