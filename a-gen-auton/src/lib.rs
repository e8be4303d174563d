pub mod plan;
#[cfg(feature = "preview")]
pub mod preview;
