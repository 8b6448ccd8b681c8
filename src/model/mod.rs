//! Documentation model.
//!
//! Input data of the renderer: the documentation AST built by the comment
//! parser, and the compound/member entities it documents. The renderer only
//! reads this model.

mod compound;
mod doc;

pub use compound::*;
pub use doc::*;
