//! CLI command handlers, one per file.

mod canonicalize;
mod decode;
mod drain;
mod encode;
mod identifier;
mod invoke;

pub use canonicalize::run_canonicalize;
pub use decode::run_decode;
pub use drain::run_drain;
pub use encode::run_encode;
pub use identifier::run_identifier;
pub use invoke::run_invoke;

#[cfg(test)]
pub(crate) use invoke::provider_for;
