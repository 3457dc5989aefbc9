pub mod health;
pub mod quote;

pub use health::*;
pub use quote::*;
