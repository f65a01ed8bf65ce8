//! Text utilities: decoding, date normalization and author canonicalization.

pub mod author;
pub mod date;
pub mod decode;

pub use author::munge_author;
pub use date::{parse_date, to_parsed_date};
pub use decode::{clean_text, declared_encoding, decode_document};
