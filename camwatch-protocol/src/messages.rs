//! Message types exchanged with the companion
//!
//! The watch sends camera start/stop commands and the companion answers
//! each with a result.
//!
//! There is no correlation identifier between a command and its result.
//! At most one outstanding command is meaningful at a time, and a result
//! that arrives without a prior command is still reported to the user.

use crate::dict::{DictError, DictWriter, Dictionary};

/// First key of the message key table
pub const MESSAGE_KEY_BASE: u32 = 10000;

// Message keys, assigned in declaration order from the base
pub const KEY_CAM_ACTION: u32 = MESSAGE_KEY_BASE;
pub const KEY_CAM_ACTION_RESULT: u32 = MESSAGE_KEY_BASE + 1;

// Wire format values
const ACTION_STOP: i32 = 0;
const ACTION_START: i32 = 1;
const RESULT_SUCCESS: u8 = 1;

/// Camera command sent to the companion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandCode {
    /// Stop recording
    Stop,
    /// Start recording
    Start,
}

impl CommandCode {
    /// Convert to wire value
    pub fn value(self) -> i32 {
        match self {
            CommandCode::Stop => ACTION_STOP,
            CommandCode::Start => ACTION_START,
        }
    }

    /// Write this command as the single `CamAction` tuple
    pub fn write_to(self, writer: &mut DictWriter<'_>) -> Result<(), DictError> {
        writer.write_int32(KEY_CAM_ACTION, self.value())
    }
}

/// Outcome of a camera command as reported by the companion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandResult {
    /// The camera accepted the command
    Success,
    /// The command failed somewhere between companion and camera
    Failure,
}

impl CommandResult {
    /// Parse a result byte: exactly 1 is success, anything else is failure
    ///
    /// The protocol carries no richer error information, so unknown values
    /// are not given any meaning beyond "not success".
    pub fn from_byte(byte: u8) -> Self {
        if byte == RESULT_SUCCESS {
            CommandResult::Success
        } else {
            CommandResult::Failure
        }
    }

    /// Extract the result from an inbox dictionary
    ///
    /// Returns `None` when the dictionary has no `CamActionResult` tuple;
    /// such messages belong to someone else. A tuple with an empty value
    /// counts as failure.
    pub fn from_dictionary(dict: &Dictionary) -> Option<Self> {
        let tuple = dict.find(KEY_CAM_ACTION_RESULT)?;
        Some(match tuple.uint8() {
            Some(byte) => Self::from_byte(byte),
            None => CommandResult::Failure,
        })
    }
}

/// Messages from the watch to the companion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchMessage {
    /// Start or stop the camera
    CamAction(CommandCode),
}

impl WatchMessage {
    /// Encode this message into a dictionary
    pub fn to_dictionary(&self) -> Result<Dictionary, DictError> {
        match self {
            WatchMessage::CamAction(code) => Dictionary::build(|w| code.write_to(w)),
        }
    }

    /// Parse a message the way the companion reads it
    ///
    /// The companion treats `CamAction == 1` as start and every other value
    /// as stop.
    pub fn from_dictionary(dict: &Dictionary) -> Result<Self, DictError> {
        let tuple = dict.find(KEY_CAM_ACTION).ok_or(DictError::KeyNotFound)?;
        let code = if tuple.as_integer()? == ACTION_START as i64 {
            CommandCode::Start
        } else {
            CommandCode::Stop
        };
        Ok(WatchMessage::CamAction(code))
    }
}
