mod errors;
mod writer;

pub use self::errors::NetConnectionError;
pub use self::writer::NetConnection;
