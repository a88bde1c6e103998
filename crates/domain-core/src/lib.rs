//! quill-domain-core - 领域建模基础库

mod entity;

pub use entity::*;
