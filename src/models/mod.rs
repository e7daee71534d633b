// Re-export all model types
pub use self::booking::*;
pub use self::cart::*;
pub use self::enums::*;
pub use self::errors::*;
pub use self::recommendation::*;
pub use self::service::*;
pub use self::session::*;
pub use self::validation::*;

mod booking;
mod cart;
mod enums;
mod errors;
mod recommendation;
mod service;
mod session;
mod validation;
