// Gateway module for providers - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod canned;
mod traits;

// Public re-exports - the ONLY way to access provider functionality
pub use canned::CannedProvider;
pub use traits::ResponseProvider;

#[cfg(test)]
pub use traits::MockResponseProvider;
