mod define;
mod errors;
mod parser;

pub use self::define::{MessageTypeID, RtmpMessageData};
pub use self::errors::MessageError;
pub use self::parser::MessageParser;
