mod command;
mod error;
mod frame;
mod frame_reader;
mod message_number;
mod reply;
mod session;
mod timeout_guard;
mod timeouts;
mod uid;

#[cfg(test)]
pub mod fake_server;

pub use error::CommandError;
pub use error::Error;
pub use error::FrameError;
pub use error::MalformedListing;
pub use message_number::MessageNumber;
pub use reply::ListEntry;
pub use reply::MailboxStat;
pub use session::Session;
pub use session::SessionState;
pub use timeouts::Timeouts;
pub use uid::Uid;
