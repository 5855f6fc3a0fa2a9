pub mod constants;
pub mod error;
pub mod types;
pub mod params;
pub mod account;
pub mod comment;
pub mod fund;
pub mod event;
pub mod operation;

pub use constants::*;
pub use error::QuillError;
pub use types::*;
pub use params::*;
pub use account::*;
pub use comment::*;
pub use fund::*;
pub use event::*;
pub use operation::*;
