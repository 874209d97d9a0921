//! Data types shared by the cache, layers and controller.

mod column;
mod row;
mod selection;

pub use column::*;
pub use row::*;
pub use selection::*;
