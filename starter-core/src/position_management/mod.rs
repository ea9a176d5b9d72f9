/// Position management: watermark tracking + volatility trailing stop
///
/// **Key Design Principles:**
/// 1. The watermark ratchets in the position's favor and resets while flat
/// 2. The stop is a pure function of watermark and current volatility
/// 3. Nothing here emits orders; the state machine turns stop prices into intents
///
/// **Module Structure:**
/// - `watermark`: best close since entry
/// - `stops`: stop trigger price per side
pub mod stops;
pub mod watermark;

pub use stops::{stop_price_for_long, stop_price_for_short, StopCalculator};
pub use watermark::HighWatermarkTracker;
