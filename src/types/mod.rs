pub mod account;
pub mod document;
pub mod record;
pub mod summary;

pub use account::*;
pub use document::*;
pub use record::*;
pub use summary::*;
