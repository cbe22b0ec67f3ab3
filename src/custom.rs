//! Entries which take over the whole display while they are edited.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::rc::Weak;
use alloc::string::{String, ToString};
use core::cell::RefCell;
use core::fmt::Display;

use num_traits::{CheckedAdd, CheckedSub, Num};

use crate::controller::{Geometry, Node};
use crate::error::Error;
use crate::item::{Callback, ItemRef, Kind, MenuItem, Notify};
use crate::screen::{Screen, ScreenRef};
use crate::surface::{Color, Surface, SurfaceHandle};

/// What a custom item sees of the menu while it runs one of its hooks.
pub struct Context<'a> {
    name: &'a str,
    parent: &'a Weak<RefCell<Screen>>,
    surface: Option<&'a SurfaceHandle>,
    geometry: &'a Geometry,
}

impl<'a> Context<'a> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn parent(&self) -> Option<ScreenRef> {
        self.parent.upgrade()
    }

    /// The node to return to when editing is done.
    pub fn back(&self) -> Option<Node> {
        self.parent().map(Node::Screen)
    }

    pub fn geometry(&self) -> &Geometry {
        self.geometry
    }

    /// Runs `f` on the display, if one was handed over already.
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut dyn Surface) -> R) -> Option<R> {
        self.surface.map(|surface| f(&mut *surface.borrow_mut()))
    }

    ///x of `chars` characters centered on a surface `width` pixels wide
    pub fn centered(&self, width: i32, chars: usize, scale: u8) -> i32 {
        let text_width = chars as i32 * self.geometry.font_width * i32::from(scale.max(1));
        (width - text_width) / 2
    }

    /// x of `text` centered on `surface` when drawn at `scale`. Uses the
    /// width the surface reports, the geometry otherwise.
    pub fn centered_text(&self, surface: &dyn Surface, text: &str, scale: u8) -> i32 {
        let width = surface.width();
        match surface.text_width(text, scale) {
            Some(text_width) => (width - text_width) / 2,
            None => self.centered(width, text.chars().count(), scale),
        }
    }
}

/// Full screen editor.
///
/// `select` and `draw` have to be provided, the directional hooks default
/// to doing nothing.
pub trait CustomItem {
    fn decorator(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn up(&mut self, cx: &Context<'_>) {
        let _ = cx;
    }

    fn down(&mut self, cx: &Context<'_>) {
        let _ = cx;
    }

    ///node to switch to, usually `cx.back()`
    fn select(&mut self, cx: &Context<'_>) -> Option<Node>;

    fn draw(&mut self, cx: &Context<'_>);
}

pub(crate) struct CustomSlot {
    pub(crate) item: Box<dyn CustomItem>,
    pub(crate) surface: Option<SurfaceHandle>,
}

impl CustomSlot {
    pub(crate) fn new(item: Box<dyn CustomItem>) -> Self {
        CustomSlot {
            item,
            surface: None,
        }
    }
}

/// Runs a hook of the custom item behind `item`. `None` if it is not a custom item.
pub(crate) fn dispatch<R>(
    item: &ItemRef,
    geometry: &Geometry,
    f: impl FnOnce(&mut dyn CustomItem, &Context<'_>) -> R,
) -> Option<R> {
    let mut guard = item.borrow_mut();
    let MenuItem {
        name, parent, kind, ..
    } = &mut *guard;

    match kind {
        Kind::Custom(CustomSlot { item, surface }) => {
            let cx = Context {
                name: name.as_str(),
                parent,
                surface: surface.as_ref(),
                geometry,
            };
            Some(f(item.as_mut(), &cx))
        }
        _ => None,
    }
}

/// Hands the display to a custom item. An already attached display is only
/// replaced when `overwrite` is set.
pub(crate) fn attach(item: &mut MenuItem, surface: &SurfaceHandle, overwrite: bool) {
    if let Kind::Custom(slot) = &mut item.kind {
        if overwrite || slot.surface.is_none() {
            slot.surface = Some(surface.clone());
        }
    }
}

/// Bounded number, stepped by up and down.
///
/// Up lowers the value, down raises it, both stop at the bounds.
pub struct ValueItem<T> {
    name: String,
    value: T,
    min: T,
    max: T,
    step: T,
    callback: Option<Box<dyn Notify<T>>>,
}

impl<T> ValueItem<T>
where
    T: Num + CheckedAdd + CheckedSub + PartialOrd + Copy + Display + 'static,
{
    pub fn new(name: &str, value: T, min: T, max: T, step: T) -> Result<Self, Error> {
        if min > max || step <= T::zero() || value < min || value > max {
            return Err(Error::InvalidRange);
        }
        Ok(ValueItem {
            name: name.to_string(),
            value,
            min,
            max,
            step,
            callback: None,
        })
    }

    /// `callback` gets the new value after every step.
    pub fn with_callback<A: 'static>(mut self, callback: Callback<A, T>) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn value(&self) -> T {
        self.value
    }

    fn changed(&mut self, cx: &Context<'_>) {
        log::trace!("{} = {}", cx.name(), self.value);
        if let Some(callback) = self.callback.as_mut() {
            callback.notify(&self.value);
        }
        self.draw(cx);
    }
}

impl<T> CustomItem for ValueItem<T>
where
    T: Num + CheckedAdd + CheckedSub + PartialOrd + Copy + Display + 'static,
{
    fn decorator(&self) -> Cow<'_, str> {
        Cow::Owned(self.value.to_string())
    }

    fn up(&mut self, cx: &Context<'_>) {
        //a step leaving the range of T lands on the bound too
        self.value = match self.value.checked_sub(&self.step) {
            Some(value) if value > self.min => value,
            _ => self.min,
        };
        self.changed(cx);
    }

    fn down(&mut self, cx: &Context<'_>) {
        self.value = match self.value.checked_add(&self.step) {
            Some(value) if value < self.max => value,
            _ => self.max,
        };
        self.changed(cx);
    }

    fn select(&mut self, cx: &Context<'_>) -> Option<Node> {
        cx.back()
    }

    fn draw(&mut self, cx: &Context<'_>) {
        let title = cx.name().to_uppercase();
        let value = self.value.to_string();
        let font_height = cx.geometry().font_height;

        cx.with_surface(|surface| {
            let width = surface.width();
            let value_x = cx.centered_text(&*surface, &value, 5);
            surface.clear();
            surface.draw_text(&title, cx.centered(width, title.chars().count(), 1), 0, Color::On);
            surface.draw_horizontal_line(0, font_height + 2, width, Color::On);
            surface.draw_text_scaled(&value, value_x, 20, 5, Color::On);
            surface.present();
        });
    }
}

impl<T> From<ValueItem<T>> for MenuItem
where
    T: Num + CheckedAdd + CheckedSub + PartialOrd + Copy + Display + 'static,
{
    fn from(item: ValueItem<T>) -> Self {
        let name = item.name.clone();
        MenuItem::custom(&name, item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::mock::Recorder;
    use alloc::rc::Rc;
    use core::cell::Cell;

    fn context_for<R>(
        item: &ItemRef,
        f: impl FnOnce(&mut dyn CustomItem, &Context<'_>) -> R,
    ) -> R {
        dispatch(item, &Geometry::default(), f).unwrap()
    }

    fn value_item(value: u8) -> (ScreenRef, ItemRef) {
        let root = Screen::new("Root");
        root.borrow_mut()
            .add(ValueItem::new("Level", value, 0u8, 10, 2).unwrap());
        let item = root.borrow().items()[0].clone();
        (root, item)
    }

    #[test]
    fn rejects_bad_range() {
        assert!(ValueItem::new("X", 5, 6, 4, 1).is_err());
        assert!(ValueItem::new("X", 5, 0, 10, 0).is_err());
        assert!(ValueItem::new("X", 11, 0, 10, 1).is_err());
        assert!(ValueItem::new("X", 5, 0, 10, 1).is_ok());
    }

    #[test]
    fn steps_stop_at_bounds() {
        let (_root, item) = value_item(4);
        let mut seen = alloc::vec::Vec::new();
        for _ in 0..3 {
            context_for(&item, |custom, cx| custom.up(cx));
            seen.push(item.borrow().decorator().into_owned());
        }
        assert_eq!(seen, ["2", "0", "0"]);

        for _ in 0..6 {
            context_for(&item, |custom, cx| custom.down(cx));
        }
        assert_eq!(item.borrow().decorator(), "10");
    }

    #[test]
    fn does_not_overshoot_max() {
        let root = Screen::new("Root");
        root.borrow_mut()
            .add(ValueItem::new("Odd", 7i32, 0, 8, 3).unwrap());
        let item = root.borrow().items()[0].clone();
        context_for(&item, |custom, cx| custom.down(cx));
        assert_eq!(item.borrow().decorator(), "8");
    }

    #[test]
    fn full_width_signed_range() {
        let root = Screen::new("Root");
        root.borrow_mut()
            .add(ValueItem::new("Offset", 100i8, -100, 100, 1).unwrap())
            .add(ValueItem::new("Trim", 120i8, i8::MIN, i8::MAX, 100).unwrap());
        let offset = root.borrow().items()[0].clone();
        let trim = root.borrow().items()[1].clone();

        context_for(&offset, |custom, cx| custom.up(cx));
        assert_eq!(offset.borrow().decorator(), "99");

        let mut seen = alloc::vec::Vec::new();
        for _ in 0..3 {
            context_for(&trim, |custom, cx| custom.up(cx));
            seen.push(trim.borrow().decorator().into_owned());
        }
        assert_eq!(seen, ["20", "-80", "-128"]);

        context_for(&trim, |custom, cx| custom.down(cx));
        context_for(&trim, |custom, cx| custom.down(cx));
        context_for(&trim, |custom, cx| custom.down(cx));
        context_for(&trim, |custom, cx| custom.down(cx));
        assert_eq!(trim.borrow().decorator(), "127");
    }

    #[test]
    fn notifies_every_step() {
        fn store(target: &mut Rc<Cell<i32>>, value: &i32) {
            target.set(*value);
        }

        let last = Rc::new(Cell::new(-1));
        let root = Screen::new("Root");
        root.borrow_mut().add(
            ValueItem::new("Offset", 0, -3, 3, 1)
                .unwrap()
                .with_callback(Callback::new(last.clone(), store)),
        );
        let item = root.borrow().items()[0].clone();
        context_for(&item, |custom, cx| custom.up(cx));
        assert_eq!(last.get(), -1);
        context_for(&item, |custom, cx| custom.up(cx));
        assert_eq!(last.get(), -2);
    }

    #[test]
    fn select_returns_parent() {
        let root = Screen::new("Root");
        root.borrow_mut()
            .add(ValueItem::new("Level", 1u8, 0, 10, 1).unwrap());
        let item = root.borrow().items()[0].clone();
        let next = context_for(&item, |custom, cx| custom.select(cx));
        assert_eq!(next, Some(Node::Screen(root.clone())));
    }

    #[test]
    fn draws_on_attached_surface() {
        let recorder = Rc::new(RefCell::new(Recorder::new(128)));
        let handle: SurfaceHandle = recorder.clone();
        let (_root, item) = value_item(4);

        //without a surface the hooks still work
        context_for(&item, |custom, cx| custom.down(cx));
        assert_eq!(recorder.borrow().frames, 0);

        attach(&mut item.borrow_mut(), &handle, false);
        context_for(&item, |custom, cx| custom.down(cx));
        let recorder = recorder.borrow();
        assert_eq!(recorder.frames, 1);
        assert_eq!(recorder.texts(), ["LEVEL", "8"]);
    }

    #[test]
    fn dispatch_skips_plain_items() {
        let root = Screen::new("Root");
        root.borrow_mut()
            .add(crate::item::InfoItem::new("Info", ""));
        let item = root.borrow().items()[0].clone();
        assert!(dispatch(&item, &Geometry::default(), |_, _| ()).is_none());
    }
}
