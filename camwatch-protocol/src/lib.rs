//! Watch ⇄ companion message protocol
//!
//! This crate defines what travels between the watch and the companion
//! running on the paired host. There are two layers:
//!
//! # AppMessage dictionaries
//!
//! Every message is a small dictionary of keyed tuples:
//! ```text
//! ┌───────┬────────────────────────────────────────────────┐
//! │ COUNT │ TUPLE × COUNT                                  │
//! │ 1B    │ KEY u32 LE │ TYPE 1B │ LEN u16 LE │ VALUE      │
//! └───────┴────────────────────────────────────────────────┘
//! ```
//!
//! The watch sends `{CamAction: 0|1}` and the companion answers, at some
//! later point, with `{CamActionResult: u8}`. The two are not correlated.
//!
//! # Link packets
//!
//! On the wire between the watch and the companion bridge, dictionaries are
//! carried in checksummed packets that are acknowledged per transaction:
//! ```text
//! ┌───────┬────────┬──────┬─────┬─────────────┬──────────┐
//! │ START │ LENGTH │ KIND │ TXN │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 1B  │ 0–250B      │ 1B       │
//! └───────┴────────┴──────┴─────┴─────────────┴──────────┘
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod buttons;
pub mod dict;
pub mod messages;
pub mod packet;

pub use buttons::ButtonId;
pub use dict::{DictError, DictWriter, Dictionary, Tuple, TupleType, MAX_DICT_SIZE};
pub use messages::{
    CommandCode, CommandResult, WatchMessage, KEY_CAM_ACTION, KEY_CAM_ACTION_RESULT,
};
pub use packet::{Packet, PacketError, PacketKind, PacketParser, MAX_PACKET_SIZE, PACKET_START};
