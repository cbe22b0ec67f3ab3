//! Drawing primitives the menu renders through.
//!
//! The engine never talks to the display driver, it only calls these
//! primitives. `present` hands the finished frame over to the hardware.

use alloc::rc::Rc;
use core::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Off,
    On,
}

impl Color {
    pub fn invert(self) -> Self {
        match self {
            Color::Off => Color::On,
            Color::On => Color::Off,
        }
    }
}

impl From<bool> for Color {
    fn from(on: bool) -> Self {
        if on {
            Color::On
        } else {
            Color::Off
        }
    }
}

pub trait Surface {
    ///pixel width of the frame
    fn width(&self) -> i32;

    fn clear(&mut self);

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color);

    fn draw_filled_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color);

    fn draw_horizontal_line(&mut self, x: i32, y: i32, length: i32, color: Color);

    fn present(&mut self);

    /// Enlarged text, for surfaces which can do it. Falls back to the normal font.
    fn draw_text_scaled(&mut self, text: &str, x: i32, y: i32, scale: u8, color: Color) {
        let _ = scale;
        self.draw_text(text, x, y, color);
    }

    /// Pixel width of `text` as `draw_text_scaled` draws it. `None` leaves
    /// the estimate to the menu geometry.
    fn text_width(&self, text: &str, scale: u8) -> Option<i32> {
        let _ = (text, scale);
        None
    }
}

/// Shared handle of the surface, given to the custom items so they can
/// draw their full screen view themselves.
pub type SurfaceHandle = Rc<RefCell<dyn Surface>>;

#[cfg(feature = "graphics")]
pub use self::graphics::GraphicsSurface;

#[cfg(feature = "graphics")]
mod graphics {
    use super::{Color, Surface};
    use embedded_graphics::{
        mono_font::{
            ascii::{FONT_10X20, FONT_6X10},
            MonoFont, MonoTextStyle,
        },
        pixelcolor::BinaryColor,
        prelude::*,
        primitives::{Line, PrimitiveStyle, Rectangle},
        text::{Baseline, Text},
    };

    impl From<Color> for BinaryColor {
        fn from(color: Color) -> Self {
            match color {
                Color::Off => BinaryColor::Off,
                Color::On => BinaryColor::On,
            }
        }
    }

    fn font(scale: u8) -> &'static MonoFont<'static> {
        if scale > 1 {
            &FONT_10X20
        } else {
            &FONT_6X10
        }
    }

    /// Any monochrome `embedded-graphics` draw target as a menu surface.
    /// Pair it with `Geometry { font_width: 6, font_height: 10, .. }`.
    pub struct GraphicsSurface<T> {
        target: T,
        flush: Option<fn(&mut T)>,
    }

    impl<T> GraphicsSurface<T>
    where
        T: DrawTarget<Color = BinaryColor>,
    {
        pub fn new(target: T) -> Self {
            GraphicsSurface {
                target,
                flush: None,
            }
        }

        ///`flush` is called on present, e.g. to push a buffered frame over SPI
        pub fn with_flush(target: T, flush: fn(&mut T)) -> Self {
            GraphicsSurface {
                target,
                flush: Some(flush),
            }
        }

        pub fn target(&self) -> &T {
            &self.target
        }

        pub fn target_mut(&mut self) -> &mut T {
            &mut self.target
        }

        pub fn into_inner(self) -> T {
            self.target
        }
    }

    // draw errors of a frame buffer target are not recoverable by the menu, they are dropped
    impl<T> Surface for GraphicsSurface<T>
    where
        T: DrawTarget<Color = BinaryColor>,
    {
        fn width(&self) -> i32 {
            self.target.bounding_box().size.width as i32
        }

        fn clear(&mut self) {
            self.target.clear(BinaryColor::Off).ok();
        }

        fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) {
            let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::from(color));
            Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
                .draw(&mut self.target)
                .ok();
        }

        fn draw_text_scaled(&mut self, text: &str, x: i32, y: i32, scale: u8, color: Color) {
            let style = MonoTextStyle::new(font(scale), BinaryColor::from(color));
            Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
                .draw(&mut self.target)
                .ok();
        }

        fn text_width(&self, text: &str, scale: u8) -> Option<i32> {
            let font = font(scale);
            let advance = font.character_size.width + font.character_spacing;
            Some(text.chars().count() as i32 * advance as i32)
        }

        fn draw_filled_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
            if w <= 0 || h <= 0 {
                return;
            }
            Rectangle::new(Point::new(x, y), Size::new(w as u32, h as u32))
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::from(color)))
                .draw(&mut self.target)
                .ok();
        }

        fn draw_horizontal_line(&mut self, x: i32, y: i32, length: i32, color: Color) {
            if length <= 0 {
                return;
            }
            Line::new(Point::new(x, y), Point::new(x + length - 1, y))
                .into_styled(PrimitiveStyle::with_stroke(BinaryColor::from(color), 1))
                .draw(&mut self.target)
                .ok();
        }

        fn present(&mut self) {
            if let Some(flush) = self.flush {
                flush(&mut self.target);
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::controller::{Controller, Geometry};
        use crate::custom::ValueItem;
        use crate::screen::Screen;
        use alloc::vec::Vec;
        use core::convert::Infallible;

        /// Remembers the lit pixels.
        struct Spy {
            lit: Vec<Point>,
        }

        impl OriginDimensions for Spy {
            fn size(&self) -> Size {
                Size::new(128, 64)
            }
        }

        impl DrawTarget for Spy {
            type Color = BinaryColor;
            type Error = Infallible;

            fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
            where
                I: IntoIterator<Item = Pixel<Self::Color>>,
            {
                for Pixel(point, color) in pixels {
                    if color == BinaryColor::On {
                        self.lit.push(point);
                    } else {
                        self.lit.retain(|lit| *lit != point);
                    }
                }
                Ok(())
            }
        }

        #[test]
        fn text_width_follows_the_font() {
            let surface = GraphicsSurface::new(Spy { lit: Vec::new() });
            assert_eq!(surface.width(), 128);
            assert_eq!(surface.text_width("42", 1), Some(12));
            assert_eq!(surface.text_width("42", 5), Some(20));
        }

        #[test]
        fn edited_value_is_centered() {
            let root = Screen::new("Root");
            root.borrow_mut()
                .add(ValueItem::new("Level", 42u8, 0, 99, 1).unwrap());
            let geometry = Geometry {
                font_width: 6,
                font_height: 10,
                ..Geometry::default()
            };
            let mut menu = Controller::new(GraphicsSurface::new(Spy { lit: Vec::new() }), geometry);
            menu.register(&root);
            menu.activate();

            let surface = menu.surface();
            //the value is drawn from y = 20, below the title and its rule
            let xs: Vec<i32> = surface
                .target()
                .lit
                .iter()
                .filter(|point| point.y >= 20)
                .map(|point| point.x)
                .collect();
            let left = *xs.iter().min().unwrap();
            let right = *xs.iter().max().unwrap();
            assert!(((left + right) / 2 - 64).abs() <= 3, "value spans {}..{}", left, right);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;

    #[test]
    fn invert() {
        assert_eq!(Color::On.invert(), Color::Off);
        assert_eq!(Color::from(false).invert(), Color::On);
    }

    #[test]
    fn scaled_text_falls_back() {
        let mut surface = Recorder::new(128);
        surface.draw_text_scaled("42", 3, 20, 5, Color::On);
        assert_eq!(surface.ops, [Op::Text("42".into(), 3, 20, Color::On)]);
    }
}
