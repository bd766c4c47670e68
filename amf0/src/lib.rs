mod define;
mod errors;
mod reader;
mod writer;

pub use crate::define::{Amf0Marker, Amf0Value};
pub use crate::errors::{Amf0ReadError, Amf0WriteError};
pub use crate::reader::Amf0Reader;
pub use crate::writer::Amf0Writer;
