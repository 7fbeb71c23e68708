pub mod message_events;
pub mod reaction_events;
