pub mod product;
pub mod snapshot;

pub use product::*;
pub use snapshot::*;

// Emoji used in notification headlines
pub const EMOJI_AVAILABLE: &str = "✅";
pub const EMOJI_UNAVAILABLE: &str = "❌";
pub const EMOJI_PRICE: &str = "💰";
pub const EMOJI_STATUS: &str = "📦";
