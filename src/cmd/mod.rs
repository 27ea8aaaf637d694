/// Stream construction command.
pub mod build;
/// Stream inspection command.
pub mod inspect;
/// Hook runner command.
pub mod run;
/// Shared parsing and rendering helpers.
pub(crate) mod util;

#[cfg(test)]
pub(crate) mod test_support;
