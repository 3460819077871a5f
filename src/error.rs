use thiserror::Error;

/// Fatal configuration errors raised while resolving [`crate::FeedSettings`].
///
/// This is the only error the engine ever raises: everything that goes
/// wrong with an individual product record degrades to a
/// [`crate::Diagnostic`] instead of failing the build.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid site URL: {0}")]
    InvalidSiteUrl(String),
}
