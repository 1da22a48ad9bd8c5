//! Domain value types: identifiers, snapshots, subscriptions, and events.

mod change;
mod event;
mod id;
mod snapshot;
mod subscription;

pub use change::{ConvictionChange, Direction};
pub use event::ConvictionEvent;
pub use id::MarketId;
pub use snapshot::MarketSnapshot;
pub use subscription::Subscription;
