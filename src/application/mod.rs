pub mod aggregate;
pub mod events;
pub mod handler;
pub mod multi_call;
pub mod pipeline;
pub mod projection;
