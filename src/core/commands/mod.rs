pub mod command_dispatcher;
pub mod command_parser;

pub use command_dispatcher::{CommandDispatcher, IncomingMessage};
