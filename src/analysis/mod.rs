pub mod battle;
pub mod events;
pub mod sequence;

pub use battle::analyze;
pub use events::diff;
pub use sequence::{find_by_label, sequence};
