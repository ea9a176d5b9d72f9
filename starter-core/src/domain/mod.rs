//! Domain types for the starter system.

pub mod bar;
pub mod ids;
pub mod order;
pub mod position;
pub mod signal;

pub use bar::{Bar, SplitKind, SplitNotice};
pub use ids::{IdGen, OrderId};
pub use order::{OrderEvent, OrderIntent, OrderStatus, RestingStop};
pub use position::{PositionSide, PreviousPosition};
pub use signal::{TrendRelation, TrendSignal};
