//! Session registry: one serial executor per live match.
//!
//! ## Key Types
//!
//! - `SessionRegistry`: match id -> live match; host, restore, route, list
//! - `SessionHandle`: cloneable channel to a match's worker
//! - `SessionStore` / `MemoryStore`: durable store boundary
//! - `BroadcastSink` / `ChannelSink`: outbound update boundary

mod worker;
pub mod handle;
pub mod sessions;
pub mod sink;
pub mod store;

pub use handle::SessionHandle;
pub use sessions::{RoomSummary, SessionRegistry};
pub use sink::{BroadcastSink, ChannelSink, MatchUpdate, NullSink, ViewerSnapshot};
pub use store::{MemoryStore, SessionStore, StoreError, StoreResult};
