#![no_std]

mod traits;

pub use traits::{ByteSource, Clock, SourceError};
