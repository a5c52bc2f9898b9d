//! VP9 video decoding library.
//!
//! Feed container chunks to [`Vp9Decoder::decode_chunk`]; each call returns
//! the frames to present. [`ivf::IvfReader`] reads chunks from IVF files.

pub mod bitreader;
pub mod block_grid;
pub mod bool_decoder;
pub mod counter;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod header;
pub mod ivf;
pub mod mvref;
pub mod predict;
pub mod probability;
pub mod refs;
pub mod residual;
pub mod superframe;
pub mod tables;
pub mod tile;
pub mod transform;
pub mod types;

pub use decoder::{DecodedFrame, DecoderConfig, Vp9Decoder};
pub use error::{DecoderError, Result};
pub use frame::Plane;
pub use ivf::{IvfFrame, IvfHeader, IvfReader};
pub use superframe::parse_superframe_sizes;
pub use types::{ColorConfig, ColorRange, ColorSpace};
