//! Link packets between the watch and the companion bridge
//!
//! Packet format:
//! - START (1 byte): 0x55 synchronization byte
//! - LENGTH (1 byte): payload length (0-250)
//! - KIND (1 byte): push, ack or nack
//! - TXN (1 byte): transaction id chosen by the sender of the push
//! - PAYLOAD (0-250 bytes): dictionary bytes for a push, empty otherwise
//! - CHECKSUM (1 byte): XOR of LENGTH, KIND, TXN and all PAYLOAD bytes
//!
//! A push is answered with an ack (or nack) carrying the same TXN. Acks
//! only confirm delivery of the packet; they say nothing about whether the
//! camera action succeeded.

use heapless::Vec;

use crate::dict::{Dictionary, MAX_DICT_SIZE};

/// Packet synchronization byte
pub const PACKET_START: u8 = 0x55;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = MAX_DICT_SIZE;

/// Size of everything that is not payload (START + LENGTH + KIND + TXN + CHECKSUM)
pub const PACKET_OVERHEAD: usize = 5;

/// Maximum complete packet size
pub const MAX_PACKET_SIZE: usize = PACKET_OVERHEAD + MAX_PAYLOAD_SIZE;

/// Errors that can occur during packet parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// Invalid packet structure
    InvalidPacket,
    /// Buffer too small for encoding
    BufferTooSmall,
    /// KIND byte is not a known packet kind
    UnknownKind,
}

/// What a packet carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketKind {
    /// A dictionary for the other side
    Push,
    /// Push was received and parsed
    Ack,
    /// Push was received but rejected
    Nack,
}

// Wire format values
const KIND_PUSH: u8 = 0x01;
const KIND_ACK: u8 = 0xFF;
const KIND_NACK: u8 = 0x7F;

impl PacketKind {
    /// Parse a kind from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            KIND_PUSH => Some(PacketKind::Push),
            KIND_ACK => Some(PacketKind::Ack),
            KIND_NACK => Some(PacketKind::Nack),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            PacketKind::Push => KIND_PUSH,
            PacketKind::Ack => KIND_ACK,
            PacketKind::Nack => KIND_NACK,
        }
    }
}

/// A parsed or constructed packet
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Packet {
    /// Packet kind
    pub kind: PacketKind,
    /// Transaction id
    pub txn: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Packet {
    /// Create a push packet from raw dictionary bytes
    pub fn push(txn: u8, payload: &[u8]) -> Result<Self, PacketError> {
        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| PacketError::PayloadTooLarge)?;

        Ok(Self {
            kind: PacketKind::Push,
            txn,
            payload: payload_vec,
        })
    }

    /// Create a push packet carrying a dictionary
    pub fn push_dictionary(txn: u8, dict: &Dictionary) -> Result<Self, PacketError> {
        Self::push(txn, dict.as_bytes())
    }

    /// Acknowledge a push
    pub fn ack(txn: u8) -> Self {
        Self {
            kind: PacketKind::Ack,
            txn,
            payload: Vec::new(),
        }
    }

    /// Reject a push
    pub fn nack(txn: u8) -> Self {
        Self {
            kind: PacketKind::Nack,
            txn,
            payload: Vec::new(),
        }
    }

    /// Decode the payload of a push as a dictionary
    pub fn dictionary(&self) -> Option<Dictionary> {
        match self.kind {
            PacketKind::Push => Dictionary::from_bytes(&self.payload).ok(),
            PacketKind::Ack | PacketKind::Nack => None,
        }
    }

    /// Total encoded size of this packet
    pub fn encoded_len(&self) -> usize {
        PACKET_OVERHEAD + self.payload.len()
    }

    /// Calculate checksum for packet data
    fn calculate_checksum(length: u8, kind: u8, txn: u8, payload: &[u8]) -> u8 {
        payload
            .iter()
            .fold(length ^ kind ^ txn, |checksum, &byte| checksum ^ byte)
    }

    /// Encode this packet into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, PacketError> {
        let packet_len = self.encoded_len();
        if buffer.len() < packet_len {
            return Err(PacketError::BufferTooSmall);
        }

        let length = self.payload.len() as u8;
        let kind = self.kind.to_byte();
        let end = 4 + self.payload.len();

        buffer[0] = PACKET_START;
        buffer[1] = length;
        buffer[2] = kind;
        buffer[3] = self.txn;
        buffer[4..end].copy_from_slice(&self.payload);
        buffer[end] = Self::calculate_checksum(length, kind, self.txn, &self.payload);

        Ok(packet_len)
    }

    /// Encode this packet into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_PACKET_SIZE>, PacketError> {
        let mut buffer = [0u8; MAX_PACKET_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| PacketError::BufferTooSmall)
    }
}

/// Byte-fed parser for incoming packets
#[derive(Debug, Clone)]
pub struct PacketParser {
    state: ParseState,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
    expected_length: u8,
    kind: u8,
    txn: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    WaitingForStart,
    WaitingForLength,
    WaitingForKind,
    WaitingForTxn,
    ReadingPayload,
    WaitingForChecksum,
}

impl Default for PacketParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketParser {
    /// Create a new packet parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForStart,
            buffer: Vec::new(),
            expected_length: 0,
            kind: 0,
            txn: 0,
        }
    }

    /// Drop any partial packet and wait for the next START byte
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForStart;
        self.buffer.clear();
        self.expected_length = 0;
        self.kind = 0;
        self.txn = 0;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(packet))` when a complete valid packet is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on parse error.
    /// After an error the parser is already waiting for the next START.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Packet>, PacketError> {
        match self.state {
            ParseState::WaitingForStart => {
                if byte == PACKET_START {
                    self.state = ParseState::WaitingForLength;
                }
                Ok(None)
            }
            ParseState::WaitingForLength => {
                if byte as usize > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(PacketError::InvalidPacket);
                }
                self.expected_length = byte;
                self.state = ParseState::WaitingForKind;
                Ok(None)
            }
            ParseState::WaitingForKind => {
                self.kind = byte;
                self.state = ParseState::WaitingForTxn;
                Ok(None)
            }
            ParseState::WaitingForTxn => {
                self.txn = byte;
                self.buffer.clear();
                self.state = if self.expected_length == 0 {
                    ParseState::WaitingForChecksum
                } else {
                    ParseState::ReadingPayload
                };
                Ok(None)
            }
            ParseState::ReadingPayload => {
                // Cannot overflow: expected_length <= MAX_PAYLOAD_SIZE
                let _ = self.buffer.push(byte);
                if self.buffer.len() == self.expected_length as usize {
                    self.state = ParseState::WaitingForChecksum;
                }
                Ok(None)
            }
            ParseState::WaitingForChecksum => {
                let expected = Packet::calculate_checksum(
                    self.expected_length,
                    self.kind,
                    self.txn,
                    &self.buffer,
                );
                if byte != expected {
                    self.reset();
                    return Err(PacketError::InvalidChecksum);
                }

                let Some(kind) = PacketKind::from_byte(self.kind) else {
                    self.reset();
                    return Err(PacketError::UnknownKind);
                };

                let packet = Packet {
                    kind,
                    txn: self.txn,
                    payload: self.buffer.clone(),
                };
                self.reset();
                Ok(Some(packet))
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete packet found, if any.
    /// Remaining bytes after a complete packet are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Packet>, PacketError> {
        for &byte in bytes {
            if let Some(packet) = self.feed(byte)? {
                return Ok(Some(packet));
            }
        }
        Ok(None)
    }
}
