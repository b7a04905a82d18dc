mod choices;
mod login;
mod questions;

pub use self::choices::*;
pub use self::login::*;
pub use self::questions::*;
