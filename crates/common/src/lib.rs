//! quill-common - 通用类型和工具库

pub mod role;
pub mod types;

pub use role::*;
pub use types::*;
