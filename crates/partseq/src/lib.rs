#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod allocator;
mod error;
mod event;
mod id;
mod log;
mod store;

pub use crate::allocator::*;
pub use crate::error::*;
pub use crate::event::*;
pub use crate::id::*;
pub use crate::log::*;
pub use crate::store::*;
