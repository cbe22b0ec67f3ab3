//! Menu tree navigation for small pixel displays.
//!
//! Build a tree of `Screen`s out of items, hand the root to a `Controller`
//! together with a `Surface` and feed it up/down/select events. The
//! controller keeps the cursor, scrolls the visible rows and draws the
//! active screen, or lets a custom item draw the whole display while it
//! is being edited.
//!
//! ```ignore
//! let root = Screen::new("Settings");
//! root.borrow_mut()
//!     .add(ToggleItem::new("Backlight", flag, |f| f.get(), |f| f.set(!f.get())))
//!     .add(ValueItem::new("Contrast", 4u8, 0, 10, 1)?)
//!     .add(SubMenuItem::new("Network").add(InfoItem::new("Ip", "10.0.0.7")));
//!
//! let mut menu = Controller::new(display, Geometry::default());
//! menu.register(&root);
//! menu.render();
//! ```

#![deny(unsafe_code)]
#![deny(warnings)]
#![no_std]

extern crate alloc;

#[cfg(feature = "buttons")]
pub mod buttons;
pub mod controller;
pub mod custom;
pub mod error;
pub mod input;
pub mod item;
pub mod screen;
pub mod surface;

pub use crate::controller::{scroll_window, Controller, Geometry, Mode, Node};
pub use crate::custom::{Context, CustomItem, ValueItem};
pub use crate::error::Error;
#[cfg(feature = "buttons")]
pub use crate::buttons::Buttons;
pub use crate::input::{Event, EventQueue};
pub use crate::item::{
    Callback, Choice, EnumItem, InfoItem, ItemKind, ItemRef, MenuItem, Notify, SubMenuItem,
    ToggleItem,
};
pub use crate::screen::{Screen, ScreenRef};
pub use crate::surface::{Color, Surface, SurfaceHandle};
