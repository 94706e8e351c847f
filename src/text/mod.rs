//! Text preparation for recording sessions
//!
//! Pasted text is split into sentences; the client then records one clip per
//! sentence.

mod splitter;

pub use splitter::split_sentences;
