//! Contracts implemented by dashboard panels
//!
//! App routes keyboard input to the focused panel through [`Interactive`];
//! panels that own a [`ScrollState`](crate::tui::scroll::ScrollState) get
//! uniform scroll and selection behavior from [`Scrollable`] and [`Selectable`].

mod interactive;
mod scrollable;

pub use interactive::{Handled, Interactive};
pub use scrollable::{Scrollable, Selectable};
