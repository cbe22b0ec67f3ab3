//! Keeps track of where the user is in the menu tree and draws it.

use alloc::rc::Rc;
use core::cell::{Ref, RefCell, RefMut};
use core::fmt;
use core::ops::Range;

use heapless::spsc::Consumer;

use crate::custom;
use crate::input::Event;
use crate::item::{ItemRef, Kind};
use crate::screen::{Screen, ScreenRef};
use crate::surface::{Color, Surface, SurfaceHandle};

/// Display layout, fixed for the lifetime of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub per_page: usize,
    pub line_height: i32,
    pub font_width: i32,
    pub font_height: i32,
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry {
            per_page: 4,
            line_height: 14,
            font_width: 8,
            font_height: 8,
        }
    }
}

impl Geometry {
    ///rows start below the title and its rule
    pub fn header_height(&self) -> i32 {
        self.font_height + 4
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ///a screen list is shown
    Browsing,
    ///a custom item owns the display
    Editing,
}

/// Where the user is: a screen, or a custom item in full screen mode.
#[derive(Clone)]
pub enum Node {
    Screen(ScreenRef),
    Custom(ItemRef),
}

impl Node {
    pub fn mode(&self) -> Mode {
        match self {
            Node::Screen(_) => Mode::Browsing,
            Node::Custom(_) => Mode::Editing,
        }
    }

    pub fn screen(&self) -> Option<&ScreenRef> {
        match self {
            Node::Screen(screen) => Some(screen),
            Node::Custom(_) => None,
        }
    }
}

/// Nodes are equal when they are the very same screen or item.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Screen(a), Node::Screen(b)) => Rc::ptr_eq(a, b),
            (Node::Custom(a), Node::Custom(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Screen(screen) => match screen.try_borrow() {
                Ok(screen) => write!(f, "Screen({:?})", screen.title()),
                Err(_) => f.write_str("Screen(<borrowed>)"),
            },
            Node::Custom(item) => match item.try_borrow() {
                Ok(item) => write!(f, "Custom({:?})", item.name()),
                Err(_) => f.write_str("Custom(<borrowed>)"),
            },
        }
    }
}

/// First and one past the last visible row: the window follows the cursor
/// once it runs below the first page.
pub fn scroll_window(selected: usize, count: usize, per_page: usize) -> Range<usize> {
    let start = if selected + 1 > per_page {
        selected + 1 - per_page
    } else {
        0
    };
    let end = (start + per_page).min(count);
    start..end.max(start)
}

pub struct Controller<D> {
    surface: Rc<RefCell<D>>,
    geometry: Geometry,
    active: Option<Node>,
    root: Option<ScreenRef>,
}

impl<D> Controller<D>
where
    D: Surface + 'static,
{
    pub fn new(surface: D, geometry: Geometry) -> Self {
        Controller {
            surface: Rc::new(RefCell::new(surface)),
            geometry,
            active: None,
            root: None,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn surface(&self) -> Ref<'_, D> {
        self.surface.borrow()
    }

    pub fn surface_mut(&self) -> RefMut<'_, D> {
        self.surface.borrow_mut()
    }

    pub fn active(&self) -> Option<&Node> {
        self.active.as_ref()
    }

    pub fn root(&self) -> Option<&ScreenRef> {
        self.root.as_ref()
    }

    pub fn mode(&self) -> Option<Mode> {
        self.active.as_ref().map(Node::mode)
    }

    /// Makes `screen` the active node. The first registered screen becomes
    /// the target of `reset`.
    ///
    /// Every custom item reachable through sub menus and enumerations gets
    /// the display, so it can draw itself.
    pub fn register(&mut self, screen: &ScreenRef) {
        log::debug!("register {}", screen.borrow().title());
        self.active = Some(Node::Screen(screen.clone()));
        if self.root.is_none() {
            self.root = Some(screen.clone());
        }

        let handle: SurfaceHandle = self.surface.clone();
        attach_tree(&screen.borrow(), &handle);
    }

    /// The rows of the active screen that fit on the display.
    pub fn window(&self) -> Option<Range<usize>> {
        let screen = self.active.as_ref()?.screen()?.borrow();
        Some(scroll_window(
            screen.selected(),
            screen.count(),
            self.geometry.per_page,
        ))
    }

    pub fn move_up(&mut self) {
        self.move_by(-1);
    }

    pub fn move_down(&mut self) {
        self.move_by(1);
    }

    /// Negative `direction` moves up, anything else down.
    pub fn move_by(&mut self, direction: i32) {
        match &self.active {
            Some(Node::Screen(screen)) => {
                let mut screen = screen.borrow_mut();
                if direction < 0 {
                    screen.up();
                } else {
                    screen.down();
                }
                log::trace!("{} cursor at {}", screen.title(), screen.selected());
            }
            Some(Node::Custom(item)) => {
                custom::dispatch(item, &self.geometry, |custom, cx| {
                    if direction < 0 {
                        custom.up(cx);
                    } else {
                        custom.down(cx);
                    }
                });
            }
            None => {
                log::warn!("move without a registered screen");
                return;
            }
        }
        self.render();
    }

    /// The click/select button.
    pub fn activate(&mut self) {
        let next = match &self.active {
            Some(Node::Screen(screen)) => screen.borrow_mut().select(),
            Some(Node::Custom(item)) => {
                custom::dispatch(item, &self.geometry, |custom, cx| custom.select(cx)).flatten()
            }
            None => {
                log::warn!("activate without a registered screen");
                return;
            }
        };

        match next {
            Some(node) => self.enter(node),
            None => log::warn!("activation led nowhere, staying"),
        }
        self.render();
    }

    /// Back to the first page of the root screen.
    pub fn reset(&mut self) {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => {
                log::warn!("reset without a registered screen");
                return;
            }
        };
        root.borrow_mut().set_selected(0);
        log::debug!("reset to {}", root.borrow().title());
        self.active = Some(Node::Screen(root));
        self.render();
    }

    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Up => self.move_up(),
            Event::Down => self.move_down(),
            Event::Select => self.activate(),
            Event::Reset => self.reset(),
        }
    }

    /// Handles the queued events one by one, returns how many there were.
    pub fn process<const N: usize>(&mut self, events: &mut Consumer<'_, Event, N>) -> usize {
        let mut handled = 0;
        while let Some(event) = events.dequeue() {
            self.handle(event);
            handled += 1;
        }
        handled
    }

    fn enter(&mut self, node: Node) {
        if let Node::Custom(item) = &node {
            //items created after registration have no display yet
            let handle: SurfaceHandle = self.surface.clone();
            custom::attach(&mut item.borrow_mut(), &handle, false);
        }
        if self.active.as_ref() != Some(&node) {
            log::debug!("{:?} -> {:?}", self.active, node);
        }
        self.active = Some(node);
    }

    pub fn render(&mut self) {
        match self.active.clone() {
            Some(Node::Screen(screen)) => self.draw_screen(&screen.borrow()),
            Some(Node::Custom(item)) => {
                custom::dispatch(&item, &self.geometry, |custom, cx| custom.draw(cx));
            }
            None => log::warn!("nothing to render"),
        }
    }

    fn draw_screen(&self, screen: &Screen) {
        let geometry = &self.geometry;
        let window = scroll_window(screen.selected(), screen.count(), geometry.per_page);
        log::trace!("{} rows {:?}", screen.title(), window);

        let mut surface = self.surface.borrow_mut();
        let width = surface.width();
        surface.clear();

        let title = screen.title().to_uppercase();
        let x = width / 2 - title.chars().count() as i32 * geometry.font_width / 2;
        surface.draw_text(&title, x, 0, Color::On);
        surface.draw_horizontal_line(0, geometry.font_height + 2, width, Color::On);

        let padding = (geometry.line_height - geometry.font_height) / 2;
        for (row, position) in window.enumerate() {
            let item = match screen.get(position) {
                Some(item) => item,
                None => break,
            };
            let item = item.borrow();
            let y = geometry.header_height() + row as i32 * geometry.line_height;
            let background = Color::from(item.is_active());
            let decorator = item.decorator();
            //monospace font
            let decorator_x = width - decorator.chars().count() as i32 * geometry.font_width - 1;

            surface.draw_filled_rect(0, y, width, geometry.line_height, background);
            surface.draw_text(item.name(), 0, y + padding, background.invert());
            surface.draw_text(&decorator, decorator_x, y + padding, background.invert());
        }

        surface.present();
    }
}

fn attach_tree(screen: &Screen, handle: &SurfaceHandle) {
    for item in screen.items() {
        let mut item = item.borrow_mut();
        let nested = match &item.kind {
            Kind::SubMenu(submenu) => Some(submenu.screen().clone()),
            Kind::Enum(enumeration) => Some(enumeration.screen().clone()),
            _ => None,
        };
        match nested {
            Some(screen) => attach_tree(&screen.borrow(), handle),
            None => custom::attach(&mut item, handle, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom::{Context, CustomItem, ValueItem};
    use crate::item::{InfoItem, MenuItem, SubMenuItem};
    use crate::surface::mock::{Op, Recorder};
    use core::cell::Cell;

    /// Refuses to be left.
    struct Locked {
        presses: Rc<Cell<u32>>,
    }

    impl CustomItem for Locked {
        fn select(&mut self, _cx: &Context<'_>) -> Option<Node> {
            self.presses.set(self.presses.get() + 1);
            None
        }

        fn draw(&mut self, cx: &Context<'_>) {
            cx.with_surface(|surface| {
                surface.clear();
                surface.draw_text(cx.name(), 0, 0, Color::On);
                surface.present();
            });
        }
    }

    fn controller() -> Controller<Recorder> {
        Controller::new(Recorder::new(128), Geometry::default())
    }

    #[test]
    fn window_follows_cursor() {
        assert_eq!(scroll_window(0, 5, 4), 0..4);
        assert_eq!(scroll_window(3, 5, 4), 0..4);
        assert_eq!(scroll_window(4, 5, 4), 1..5);
        assert_eq!(scroll_window(0, 2, 4), 0..2);
        assert_eq!(scroll_window(0, 0, 4), 0..0);
    }

    #[test]
    fn renders_header_and_rows() {
        let root = Screen::new("Net");
        root.borrow_mut()
            .add(InfoItem::new("Ip", "10.0.0.1"))
            .add(InfoItem::new("Mask", "/24"));
        let mut menu = controller();
        menu.register(&root);
        menu.render();

        let surface = menu.surface();
        assert_eq!(
            surface.ops,
            [
                Op::Clear,
                Op::Text("NET".into(), 64 - 12, 0, Color::On),
                Op::HLine(0, 10, 128, Color::On),
                Op::Rect(0, 12, 128, 14, Color::On),
                Op::Text("Ip".into(), 0, 15, Color::Off),
                Op::Text("10.0.0.1".into(), 128 - 64 - 1, 15, Color::Off),
                Op::Rect(0, 26, 128, 14, Color::Off),
                Op::Text("Mask".into(), 0, 29, Color::On),
                Op::Text("/24".into(), 128 - 24 - 1, 29, Color::On),
                Op::Present,
            ]
        );
    }

    #[test]
    fn calls_before_register_do_nothing() {
        let mut menu = controller();
        menu.move_down();
        menu.activate();
        menu.reset();
        assert!(menu.active().is_none());
        assert_eq!(menu.surface().frames, 0);
    }

    #[test]
    fn register_keeps_first_root() {
        let first = Screen::new("First");
        first.borrow_mut().add(InfoItem::new("A", ""));
        let second = Screen::new("Second");
        second.borrow_mut().add(InfoItem::new("B", ""));

        let mut menu = controller();
        menu.register(&first);
        menu.register(&second);
        assert_eq!(menu.active(), Some(&Node::Screen(second.clone())));

        menu.reset();
        assert_eq!(menu.active(), Some(&Node::Screen(first.clone())));
    }

    #[test]
    fn nested_custom_items_get_the_display() {
        let root = Screen::new("Root");
        root.borrow_mut().add(
            SubMenuItem::new("Deep")
                .add(SubMenuItem::new("Deeper").add(ValueItem::new("Level", 3u8, 0, 9, 1).unwrap())),
        );
        let mut menu = controller();
        menu.register(&root);

        //root -> Deep -> Deeper -> Level
        menu.activate();
        menu.activate();
        menu.activate();
        assert_eq!(menu.mode(), Some(Mode::Editing));
        assert!(menu.window().is_none());
        assert_eq!(menu.surface().texts(), ["LEVEL", "3"]);
    }

    #[test]
    fn editing_does_not_draw_list() {
        let root = Screen::new("Root");
        root.borrow_mut()
            .add(ValueItem::new("Level", 3u8, 0, 9, 1).unwrap());
        let mut menu = controller();
        menu.register(&root);
        menu.activate();
        menu.move_down();

        let surface = menu.surface();
        assert_eq!(surface.texts(), ["LEVEL", "4"]);
        assert!(!surface.ops.iter().any(|op| matches!(op, Op::Rect(..))));
    }

    #[test]
    fn custom_item_without_exit_stays_active() {
        let presses = Rc::new(Cell::new(0));
        let root = Screen::new("Root");
        root.borrow_mut().add(MenuItem::custom(
            "Locked",
            Locked {
                presses: presses.clone(),
            },
        ));
        let item = root.borrow().items()[0].clone();
        let mut menu = controller();
        menu.register(&root);

        menu.activate();
        assert_eq!(menu.active(), Some(&Node::Custom(item.clone())));
        menu.activate();
        menu.activate();
        assert_eq!(menu.mode(), Some(Mode::Editing));
        assert_eq!(menu.active(), Some(&Node::Custom(item)));
        assert_eq!(presses.get(), 2);
        assert_eq!(menu.surface().texts(), ["Locked"]);
    }

    #[test]
    fn back_row_to_dropped_parent_stays_on_screen() {
        let sub = SubMenuItem::new("Orphan").add(InfoItem::new("A", ""));
        let orphan = sub.screen().clone();
        {
            let gone = Screen::new("Gone");
            gone.borrow_mut().add(sub);
        }
        let mut menu = controller();
        menu.register(&orphan);

        menu.move_down();
        menu.activate();
        assert_eq!(menu.active(), Some(&Node::Screen(orphan.clone())));
        assert_eq!(orphan.borrow().selected(), 1);
        assert!(menu.surface().texts().contains(&"< Back"));
    }
}
