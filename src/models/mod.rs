pub mod chat;
pub mod common;
pub mod table;

pub use chat::*;
pub use common::*;
pub use table::*;
