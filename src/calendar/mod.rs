pub mod defaults;
pub mod event;
pub mod grid;
pub mod layout;
pub mod persist;
pub mod recurrence;
pub mod slot;
pub mod store;
pub mod team;

pub use event::{Event, EventId, EventPatch, Frequency, NewEvent};
pub use grid::Week;
pub use layout::Placement;
pub use persist::{JsonFileStore, Persistence};
pub use slot::TeamFilter;
pub use store::{EventStore, StoreError, TeamStore};
pub use team::{Team, TeamDirectory, TeamPatch};
