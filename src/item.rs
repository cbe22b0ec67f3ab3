//! Menu entries.
//!
//! Every entry is a `MenuItem`: a name, the transient highlight flag, a weak
//! back-reference to the screen it belongs to and one of the variant
//! behaviours. Callbacks are plain function pointers bound to their
//! arguments, the same way a static menu binds `update`/`view` functions
//! to its model.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::controller::Node;
use crate::custom::{CustomItem, CustomSlot};
use crate::error::Error;
use crate::screen::{Screen, ScreenRef};

pub type ItemRef = Rc<RefCell<MenuItem>>;

pub const CHECKED: &str = "[x]";
pub const UNCHECKED: &str = "[ ]";
pub const SELECTED_MARKER: &str = "<<";
pub const SUBMENU_MARKER: &str = ">";
pub const BACK_NAME: &str = "< Back";

/// Variant tag, for code which only needs to know what an entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Info,
    Toggle,
    Select,
    Enum,
    SubMenu,
    Custom,
    Back,
}

pub(crate) enum Kind {
    Info(String),
    Toggle(Box<dyn Switch>),
    Select(SelectItem),
    Enum(EnumItem),
    SubMenu(SubMenuItem),
    Custom(CustomSlot),
    Back,
}

pub struct MenuItem {
    pub(crate) name: String,
    pub(crate) is_active: bool,
    pub(crate) parent: Weak<RefCell<Screen>>,
    pub(crate) kind: Kind,
}

impl MenuItem {
    pub(crate) fn new(name: &str, kind: Kind) -> Self {
        MenuItem {
            name: name.to_string(),
            is_active: false,
            parent: Weak::new(),
            kind,
        }
    }

    pub(crate) fn back(parent: Weak<RefCell<Screen>>) -> Self {
        MenuItem {
            name: BACK_NAME.to_string(),
            is_active: false,
            parent,
            kind: Kind::Back,
        }
    }

    /// Wraps a full screen editor into an entry.
    pub fn custom<C: CustomItem + 'static>(name: &str, item: C) -> Self {
        MenuItem::new(name, Kind::Custom(CustomSlot::new(Box::new(item))))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this entry is the highlighted one, as of the last `Screen::get`.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    /// The screen this entry returns to.
    pub fn parent(&self) -> Option<ScreenRef> {
        self.parent.upgrade()
    }

    pub fn kind(&self) -> ItemKind {
        match self.kind {
            Kind::Info(_) => ItemKind::Info,
            Kind::Toggle(_) => ItemKind::Toggle,
            Kind::Select(_) => ItemKind::Select,
            Kind::Enum(_) => ItemKind::Enum,
            Kind::SubMenu(_) => ItemKind::SubMenu,
            Kind::Custom(_) => ItemKind::Custom,
            Kind::Back => ItemKind::Back,
        }
    }

    /// Short status text shown right aligned next to the name.
    pub fn decorator(&self) -> Cow<'_, str> {
        match &self.kind {
            Kind::Info(decorator) => Cow::Borrowed(decorator.as_str()),
            Kind::Toggle(switch) => Cow::Borrowed(if switch.state() {
                CHECKED
            } else {
                UNCHECKED
            }),
            Kind::Select(select) => Cow::Borrowed(if select.status {
                SELECTED_MARKER
            } else {
                ""
            }),
            Kind::Enum(enumeration) => Cow::Owned(enumeration.selected_name()),
            Kind::SubMenu(_) => Cow::Borrowed(SUBMENU_MARKER),
            Kind::Custom(slot) => slot.item.decorator(),
            Kind::Back => Cow::Borrowed(""),
        }
    }

    /// Executes the entry and tells where to go next.
    ///
    /// `None` means stay where we are. A custom item returns itself to take
    /// over the display.
    pub fn click(this: &ItemRef) -> Option<Node> {
        let mut item = this.borrow_mut();
        let parent = item.parent.clone();

        match &mut item.kind {
            Kind::Info(_) | Kind::Back => {}
            Kind::Toggle(switch) => switch.change(),
            Kind::Select(select) => {
                if let Some(choices) = select.choices.upgrade() {
                    choices.borrow_mut().choose(select.index);
                }
            }
            Kind::Enum(enumeration) => return Some(Node::Screen(enumeration.rebuild(&parent))),
            //the owning screen navigates into sub menus
            Kind::SubMenu(_) => return None,
            Kind::Custom(_) => return Some(Node::Custom(this.clone())),
        }

        parent.upgrade().map(Node::Screen)
    }
}

/// Static entry with a fixed decorator, clicking it keeps the current screen.
pub struct InfoItem {
    name: String,
    decorator: String,
}

impl InfoItem {
    pub fn new(name: &str, decorator: &str) -> Self {
        InfoItem {
            name: name.to_string(),
            decorator: decorator.to_string(),
        }
    }
}

impl From<InfoItem> for MenuItem {
    fn from(item: InfoItem) -> Self {
        MenuItem::new(&item.name, Kind::Info(item.decorator))
    }
}

pub(crate) trait Switch {
    fn state(&self) -> bool;
    fn change(&mut self);
}

struct Binding<A> {
    args: A,
    state: fn(&A) -> bool,
    change: fn(&mut A),
}

impl<A> Switch for Binding<A> {
    fn state(&self) -> bool {
        (self.state)(&self.args)
    }

    fn change(&mut self) {
        (self.change)(&mut self.args)
    }
}

/// Checkbox entry. `state` reads the flag, `change` flips it, both get the bound `args`.
pub struct ToggleItem<A> {
    name: String,
    binding: Binding<A>,
}

impl<A> ToggleItem<A> {
    pub fn new(name: &str, args: A, state: fn(&A) -> bool, change: fn(&mut A)) -> Self {
        ToggleItem {
            name: name.to_string(),
            binding: Binding {
                args,
                state,
                change,
            },
        }
    }
}

impl<A: 'static> From<ToggleItem<A>> for MenuItem {
    fn from(item: ToggleItem<A>) -> Self {
        MenuItem::new(&item.name, Kind::Toggle(Box::new(item.binding)))
    }
}

/// Receives a value, e.g. the newly chosen candidate of an enumeration.
pub trait Notify<T> {
    fn notify(&mut self, value: &T);
}

/// A function pointer together with the arguments it is called with.
pub struct Callback<A, T> {
    args: A,
    f: fn(&mut A, &T),
}

impl<A, T> Callback<A, T> {
    pub fn new(args: A, f: fn(&mut A, &T)) -> Self {
        Callback { args, f }
    }
}

impl<A, T> Notify<T> for Callback<A, T> {
    fn notify(&mut self, value: &T) {
        (self.f)(&mut self.args, value)
    }
}

/// One candidate of an enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice<V> {
    pub name: String,
    pub value: V,
}

impl<V> Choice<V> {
    pub fn new(name: &str, value: V) -> Self {
        Choice {
            name: name.to_string(),
            value,
        }
    }
}

impl Choice<String> {
    ///the value is the name itself
    pub fn named(name: &str) -> Self {
        Choice::new(name, name.to_string())
    }
}

impl<'a> From<&'a str> for Choice<String> {
    fn from(name: &'a str) -> Self {
        Choice::named(name)
    }
}

impl<'a, V> From<(&'a str, V)> for Choice<V> {
    fn from((name, value): (&'a str, V)) -> Self {
        Choice::new(name, value)
    }
}

pub(crate) trait Choices {
    fn len(&self) -> usize;
    fn name(&self, index: usize) -> &str;
    fn selected(&self) -> usize;
    fn choose(&mut self, index: usize);
}

struct Options<V> {
    options: Vec<Choice<V>>,
    selected: usize,
    callback: Option<Box<dyn Notify<V>>>,
}

impl<V> Choices for Options<V> {
    fn len(&self) -> usize {
        self.options.len()
    }

    fn name(&self, index: usize) -> &str {
        &self.options[index].name
    }

    fn selected(&self) -> usize {
        self.selected
    }

    fn choose(&mut self, index: usize) {
        if index >= self.options.len() {
            return;
        }
        self.selected = index;
        log::debug!("chosen {}", self.options[index].name);
        if let Some(callback) = self.callback.as_mut() {
            callback.notify(&self.options[index].value);
        }
    }
}

/// One candidate row of an enumeration screen.
pub struct SelectItem {
    status: bool,
    index: usize,
    choices: Weak<RefCell<dyn Choices>>,
}

/// Single choice from a list of candidates.
///
/// The candidates are listed on an own screen which is rebuilt on every
/// click, so the marker always follows the current selection. That screen
/// has no parent: picking a candidate returns to the screen holding the
/// enumeration, there is no back row.
pub struct EnumItem {
    name: String,
    choices: Rc<RefCell<dyn Choices>>,
    menu: ScreenRef,
}

impl EnumItem {
    pub fn new<V: 'static>(
        name: &str,
        options: Vec<Choice<V>>,
        selected: usize,
    ) -> Result<Self, Error> {
        EnumItem::build(name, options, selected, None)
    }

    pub fn with_callback<V: 'static, A: 'static>(
        name: &str,
        options: Vec<Choice<V>>,
        selected: usize,
        callback: Callback<A, V>,
    ) -> Result<Self, Error> {
        EnumItem::build(name, options, selected, Some(Box::new(callback)))
    }

    fn build<V: 'static>(
        name: &str,
        options: Vec<Choice<V>>,
        selected: usize,
        callback: Option<Box<dyn Notify<V>>>,
    ) -> Result<Self, Error> {
        if options.is_empty() {
            return Err(Error::NoChoices);
        }
        if selected >= options.len() {
            return Err(Error::SelectionOutOfRange {
                index: selected,
                len: options.len(),
            });
        }

        let choices: Rc<RefCell<dyn Choices>> = Rc::new(RefCell::new(Options {
            options,
            selected,
            callback,
        }));

        Ok(EnumItem {
            name: name.to_string(),
            choices,
            menu: Screen::new(name),
        })
    }

    pub fn selected(&self) -> usize {
        self.choices.borrow().selected()
    }

    pub fn selected_name(&self) -> String {
        let choices = self.choices.borrow();
        choices.name(choices.selected()).to_string()
    }

    pub fn choose(&self, index: usize) {
        self.choices.borrow_mut().choose(index);
    }

    pub fn screen(&self) -> &ScreenRef {
        &self.menu
    }

    fn rebuild(&self, parent: &Weak<RefCell<Screen>>) -> ScreenRef {
        let choices = self.choices.borrow();
        let mut menu = self.menu.borrow_mut();
        menu.reset();
        for index in 0..choices.len() {
            let select = SelectItem {
                status: index == choices.selected(),
                index,
                choices: Rc::downgrade(&self.choices),
            };
            menu.push(
                MenuItem::new(choices.name(index), Kind::Select(select)),
                parent.clone(),
            );
        }
        self.menu.clone()
    }
}

impl From<EnumItem> for MenuItem {
    fn from(item: EnumItem) -> Self {
        let name = item.name.clone();
        MenuItem::new(&name, Kind::Enum(item))
    }
}

/// Entry with an own screen of nested entries.
pub struct SubMenuItem {
    name: String,
    pub(crate) menu: ScreenRef,
}

impl SubMenuItem {
    pub fn new(name: &str) -> Self {
        SubMenuItem {
            name: name.to_string(),
            menu: Screen::new(name),
        }
    }

    pub fn add<I: Into<MenuItem>>(self, item: I) -> Self {
        self.menu.borrow_mut().add(item);
        self
    }

    pub fn add_with_parent<I: Into<MenuItem>>(self, item: I, parent: &ScreenRef) -> Self {
        self.menu.borrow_mut().add_with_parent(item, parent);
        self
    }

    pub fn screen(&self) -> &ScreenRef {
        &self.menu
    }
}

impl From<SubMenuItem> for MenuItem {
    fn from(item: SubMenuItem) -> Self {
        let name = item.name.clone();
        MenuItem::new(&name, Kind::SubMenu(item))
    }
}
