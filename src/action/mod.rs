//! Action State Module
//!
//! Every demo action (connect, sign, send, swap, batch submit, ...) owns one
//! [`ActionSlot`]. A slot moves idle → in-flight on a trigger and in-flight →
//! terminal when the action resolves. A new trigger starts the cycle again.

mod slot;


pub use slot::{ActionSlot, ActionState};
