//! Business services for the design studio.

pub mod designer;
pub mod sweeper;

pub use designer::{DesignBrief, DesignerError, DesignerService, SendTurn, TurnReply};
pub use sweeper::sweep_expired;
