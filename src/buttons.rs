//! Optional adapter from three push buttons to menu events.
//!
//! The menu never polls anything itself. Boards with plain buttons can use
//! `Buttons` and feed the events to `Controller::handle` or `post` them from
//! an interrupt; anything else (encoders, IR remotes) produces `Event`s its
//! own way.

use embedded_hal::digital::v2::InputPin;

use crate::input::Event;

const EVENTS: [Event; 3] = [Event::Up, Event::Down, Event::Select];

/// Up, down and select buttons on pull-up inputs, pressed = low.
///
/// Reports a press once, when a button goes from released to pressed.
/// Debouncing is up to the caller (poll slow enough, or filter in hardware).
pub struct Buttons<UP, DOWN, SELECT> {
    up: UP,
    down: DOWN,
    select: SELECT,
    pressed: [bool; 3],
}

impl<UP, DOWN, SELECT, ERROR> Buttons<UP, DOWN, SELECT>
where
    UP: InputPin<Error = ERROR>,
    DOWN: InputPin<Error = ERROR>,
    SELECT: InputPin<Error = ERROR>,
{
    pub fn new(up: UP, down: DOWN, select: SELECT) -> Self {
        Buttons {
            up,
            down,
            select,
            pressed: [false; 3],
        }
    }

    pub fn release(self) -> (UP, DOWN, SELECT) {
        (self.up, self.down, self.select)
    }

    pub fn poll(&mut self) -> nb::Result<Event, ERROR> {
        let now = [
            self.up.is_low().map_err(nb::Error::Other)?,
            self.down.is_low().map_err(nb::Error::Other)?,
            self.select.is_low().map_err(nb::Error::Other)?,
        ];

        for (index, &pressed) in now.iter().enumerate() {
            let was = self.pressed[index];
            self.pressed[index] = pressed;
            //the rest is looked at by the next poll
            if pressed && !was {
                return Ok(EVENTS[index]);
            }
        }

        Err(nb::Error::WouldBlock)
    }
}
