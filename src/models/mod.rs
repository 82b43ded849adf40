pub mod card;
pub mod portfolio;

pub use card::*;
pub use portfolio::*;
