//! Drives a small settings menu from the terminal.
//!
//! w = up, s = down, e = select, r = reset, q = quit (each followed by enter)
//!
//! The frame is printed as text: one line per drawn row, the highlighted
//! row marked with `>`.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::io::{self, BufRead};
use std::rc::Rc;

use room_menu::{
    Callback, Choice, Color, Controller, EnumItem, Event, Geometry, InfoItem, Screen,
    SubMenuItem, Surface, ToggleItem, ValueItem,
};

const COLS: usize = 16;

struct Console {
    rows: BTreeMap<i32, (bool, Vec<char>)>,
    inverted: Option<i32>,
}

impl Console {
    fn new() -> Self {
        Console {
            rows: BTreeMap::new(),
            inverted: None,
        }
    }
}

impl Surface for Console {
    fn width(&self) -> i32 {
        COLS as i32 * 8
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.inverted = None;
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, _color: Color) {
        let highlighted = self.inverted.map_or(false, |top| y > top && y < top + 14);
        let row = self
            .rows
            .entry(y)
            .or_insert_with(|| (highlighted, vec![' '; COLS]));
        let start = (x.max(0) / 8) as usize;
        for (offset, c) in text.chars().enumerate() {
            if let Some(cell) = row.1.get_mut(start + offset) {
                *cell = c;
            }
        }
    }

    fn draw_filled_rect(&mut self, _x: i32, y: i32, _w: i32, _h: i32, color: Color) {
        if color == Color::On {
            self.inverted = Some(y);
        }
    }

    fn draw_horizontal_line(&mut self, _x: i32, y: i32, _length: i32, _color: Color) {
        self.rows.insert(y, (false, vec!['-'; COLS]));
    }

    fn present(&mut self) {
        println!();
        for (highlighted, row) in self.rows.values() {
            let line: String = row.iter().collect();
            println!("{}{}", if *highlighted { '>' } else { ' ' }, line);
        }
    }
}

fn flag_state(flag: &Rc<Cell<bool>>) -> bool {
    flag.get()
}

fn flag_flip(flag: &mut Rc<Cell<bool>>) {
    flag.set(!flag.get())
}

fn print_mode(_: &mut (), mode: &&'static str) {
    println!("mode: {}", mode);
}

fn main() {
    let backlight = Rc::new(Cell::new(true));

    let root = Screen::new("Settings");
    root.borrow_mut()
        .add(ToggleItem::new(
            "Backlight",
            backlight.clone(),
            flag_state,
            flag_flip,
        ))
        .add(ValueItem::new("Contrast", 4u8, 0, 10, 1).expect("valid range"))
        .add(
            EnumItem::with_callback(
                "Mode",
                vec![
                    Choice::new("Auto", "auto"),
                    Choice::new("Manual", "manual"),
                    Choice::new("Off", "off"),
                ],
                0,
                Callback::new((), print_mode),
            )
            .expect("valid choices"),
        )
        .add(
            SubMenuItem::new("Network")
                .add(InfoItem::new("Ip", "10.0.0.7"))
                .add(InfoItem::new("Mask", "/24")),
        )
        .add(InfoItem::new("Version", "0.1"));

    let mut menu = Controller::new(Console::new(), Geometry::default());
    menu.register(&root);
    menu.render();

    for line in io::stdin().lock().lines() {
        let event = match line.expect("stdin").trim() {
            "w" => Event::Up,
            "s" => Event::Down,
            "e" => Event::Select,
            "r" => Event::Reset,
            "q" => break,
            _ => continue,
        };
        menu.handle(event);
    }
}
