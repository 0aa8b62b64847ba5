//! HTTP Handlers

mod ping;
mod requests;
mod responses;
mod synthesize;

pub use ping::*;
pub use requests::*;
pub use responses::*;
pub use synthesize::*;
