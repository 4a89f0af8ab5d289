//! Output rendering.

pub mod json;

pub use json::{read_json, to_json, write_json, JsonFormat};
