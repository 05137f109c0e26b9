//! Subcommands of `civic-forms`

pub mod check;
pub mod info;
pub mod validate;

pub use check::CheckArgs;
pub use info::InfoArgs;
pub use validate::ValidateArgs;
