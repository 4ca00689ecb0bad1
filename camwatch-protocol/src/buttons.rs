//! Physical buttons on the watch

use crate::messages::CommandCode;

/// Button identifiers, numbered as the watch reports them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    /// Left button
    Back,
    /// Top right button
    Up,
    /// Middle right button
    Select,
    /// Bottom right button
    Down,
}

// Wire format values
const BUTTON_BACK: u8 = 0;
const BUTTON_UP: u8 = 1;
const BUTTON_SELECT: u8 = 2;
const BUTTON_DOWN: u8 = 3;

impl ButtonId {
    /// Parse a button from its id byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            BUTTON_BACK => Some(ButtonId::Back),
            BUTTON_UP => Some(ButtonId::Up),
            BUTTON_SELECT => Some(ButtonId::Select),
            BUTTON_DOWN => Some(ButtonId::Down),
            _ => None,
        }
    }

    /// Convert to id byte
    pub fn to_byte(self) -> u8 {
        match self {
            ButtonId::Back => BUTTON_BACK,
            ButtonId::Up => BUTTON_UP,
            ButtonId::Select => BUTTON_SELECT,
            ButtonId::Down => BUTTON_DOWN,
        }
    }

    /// Camera command bound to a single click of this button
    ///
    /// Up starts recording, Down stops it. The other buttons are unbound.
    pub fn command(&self) -> Option<CommandCode> {
        match self {
            ButtonId::Up => Some(CommandCode::Start),
            ButtonId::Down => Some(CommandCode::Stop),
            ButtonId::Back | ButtonId::Select => None,
        }
    }
}
