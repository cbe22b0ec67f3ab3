use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::controller::Node;
use crate::item::{ItemKind, ItemRef, Kind, MenuItem};

pub type ScreenRef = Rc<RefCell<Screen>>;

/// Ordered list of entries with a cursor.
///
/// A screen with a parent gets an extra, synthetic back row after its
/// entries. It is not stored, `get` makes a fresh one whenever asked.
pub struct Screen {
    me: Weak<RefCell<Screen>>,
    title: String,
    items: Vec<ItemRef>,
    selected: usize,
    parent: Option<Weak<RefCell<Screen>>>,
}

impl Screen {
    pub fn new(title: &str) -> ScreenRef {
        Rc::new_cyclic(|me| {
            RefCell::new(Screen {
                me: me.clone(),
                title: title.to_string(),
                items: Vec::new(),
                selected: 0,
                parent: None,
            })
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    ///clamped to the last row
    pub fn set_selected(&mut self, position: usize) {
        self.selected = position.min(self.count().saturating_sub(1));
    }

    pub fn parent(&self) -> Option<ScreenRef> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Stored entries, without the back row.
    pub fn items(&self) -> &[ItemRef] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends an entry which returns to this screen.
    pub fn add<I: Into<MenuItem>>(&mut self, item: I) -> &mut Self {
        let me = self.me.clone();
        self.push(item.into(), me)
    }

    /// Appends an entry which returns to `parent` instead of this screen.
    ///
    /// A sub menu added this way gets `parent` as the target of its back
    /// row too. That lets one sub menu hang from several screens, but its
    /// back row then leads to `parent`, not necessarily to the screen the
    /// user came from.
    pub fn add_with_parent<I: Into<MenuItem>>(&mut self, item: I, parent: &ScreenRef) -> &mut Self {
        self.push(item.into(), Rc::downgrade(parent))
    }

    pub(crate) fn push(&mut self, mut item: MenuItem, parent: Weak<RefCell<Screen>>) -> &mut Self {
        if let Kind::SubMenu(submenu) = &item.kind {
            submenu.menu.borrow_mut().parent = Some(parent.clone());
        }
        item.parent = parent;
        self.items.push(Rc::new(RefCell::new(item)));
        self
    }

    /// Drops every entry, the cursor stays.
    pub fn reset(&mut self) {
        self.items.clear();
    }

    /// Number of rows, including the back row.
    pub fn count(&self) -> usize {
        self.items.len() + if self.parent.is_some() { 1 } else { 0 }
    }

    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn down(&mut self) {
        if self.selected + 1 < self.count() {
            self.selected += 1;
        }
    }

    /// Entry at `position`, or `None` past the last row.
    ///
    /// Marks the returned entry active if it is under the cursor and
    /// inactive otherwise, every single call. Rendering relies on this.
    pub fn get(&self, position: usize) -> Option<ItemRef> {
        if position >= self.count() {
            return None;
        }

        let item = match &self.parent {
            Some(parent) if position == self.items.len() => {
                Rc::new(RefCell::new(MenuItem::back(parent.clone())))
            }
            _ => self.items.get(position)?.clone(),
        };

        item.borrow_mut().set_active(position == self.selected);
        Some(item)
    }

    /// Executes the entry under the cursor.
    pub fn select(&mut self) -> Option<Node> {
        let item = self.get(self.selected)?;

        let submenu = match &item.borrow().kind {
            Kind::SubMenu(submenu) => Some(submenu.menu.clone()),
            _ => None,
        };
        if let Some(menu) = submenu {
            return Some(Node::Screen(menu));
        }

        let back = item.borrow().kind() == ItemKind::Back;
        let next = MenuItem::click(&item);
        if back && next.is_some() {
            //start from the top on the next visit
            self.selected = 0;
        }
        next
    }
}
