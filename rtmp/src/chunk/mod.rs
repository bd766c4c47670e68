mod decoder;
mod define;
mod encoder;
mod errors;

pub use self::decoder::ChunkDecoder;
pub use self::define::{Chunk, ChunkBasicHeader, ChunkMessageHeader, ChunkType, DefinedChunkStreamID, CHUNK_SIZE, INIT_CHUNK_SIZE, MAX_CHUNK_SIZE};
pub use self::encoder::ChunkEncoder;
pub use self::errors::{ChunkDecodeError, ChunkEncodeError};

#[cfg(test)]
mod tests;
