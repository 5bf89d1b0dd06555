pub mod codec;
pub mod error;
pub mod lexical;
pub mod namespace;
pub mod term;
pub mod value;
pub mod vocab;

// Re-export commonly used types
pub use codec::{decode, encode, NodeContext};
pub use error::CoreError;
pub use namespace::{Key, Namespace};
pub use term::{AnchorId, Iri, Literal, Node, StoreId, Triple};
pub use value::Value;
