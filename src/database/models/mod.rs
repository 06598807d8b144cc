pub mod affiliate;
pub mod billing;
pub mod marketing;
pub mod portal;
pub mod product;
pub mod support;
pub mod user;
pub mod webhook;

pub use affiliate::*;
pub use billing::*;
pub use marketing::*;
pub use portal::*;
pub use product::*;
pub use support::*;
pub use user::*;
pub use webhook::*;
