mod aggregate;
mod type_lists;

pub use aggregate::{AggregateOutcome, AggregateRoom};
pub use type_lists::StampTypeRoomLists;
