//! Shared utility modules used across docmatch components.

pub mod varint;
