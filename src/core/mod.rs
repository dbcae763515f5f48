//! Core XML lexing primitives
//!
//! This module contains the fundamental building blocks for XML reading:
//! - Scanner: byte source over a `BufRead` buffer, memchr runs
//! - Tokenizer: State machine turning bytes into events
//! - Entities: fixed entity table and output escaping
//! - QName / Attributes: name and attribute value types

pub mod attributes;
pub mod entities;
pub mod qname;
pub mod scanner;
pub mod tokenizer;
