pub mod audio_codec;
pub mod cli;
pub mod dct;
pub mod error;
pub mod image_codec;
pub mod metrics;
pub mod store;

pub use error::{CodecError, Result};
