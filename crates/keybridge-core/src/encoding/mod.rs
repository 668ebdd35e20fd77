//! Text transcoding between the host (UTF-8) and the engine (UTF-16).
//!
//! See [`utf16`] for the conversion rules and the fail-fast contract.

pub mod utf16;

pub use utf16::{
    decode_code_points, decode_utf16, decode_utf16z, encode_code_points, encode_str_utf16z,
    encode_utf16z,
};
