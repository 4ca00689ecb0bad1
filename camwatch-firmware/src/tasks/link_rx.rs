//! Companion link receive task
//!
//! Receives packets from the companion, acknowledges pushes and forwards
//! their dictionaries to the app task.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use camwatch_core::state::AppEvent;
use camwatch_protocol::{Packet, PacketKind, PacketParser};

use crate::channels::{EVENT_CHANNEL, LINK_TX_CHANNEL};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Link RX task - receives and parses packets from the companion
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx, inbox_size: usize) {
    info!("Link RX task started (inbox {}B)", inbox_size);

    let mut parser = PacketParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(packet)) => handle_packet(packet, inbox_size),
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(e) => {
                            warn!("Packet parse error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Handle one packet from the companion
fn handle_packet(packet: Packet, inbox_size: usize) {
    match packet.kind {
        PacketKind::Push => {
            let accepted = accept_push(&packet, inbox_size);
            let reply = if accepted {
                Packet::ack(packet.txn)
            } else {
                Packet::nack(packet.txn)
            };
            if LINK_TX_CHANNEL.try_send(reply).is_err() {
                warn!("Link TX queue full, reply for txn {} dropped", packet.txn);
            }
        }
        PacketKind::Ack => {
            trace!("ACK for txn {}", packet.txn);
        }
        PacketKind::Nack => {
            warn!("Companion rejected txn {}", packet.txn);
        }
    }
}

/// Forward a push to the app task; false if it has to be rejected
fn accept_push(packet: &Packet, inbox_size: usize) -> bool {
    if packet.payload.len() > inbox_size {
        warn!(
            "Inbox overflow: {} bytes > {} bytes",
            packet.payload.len(),
            inbox_size
        );
        return false;
    }

    let Some(dict) = packet.dictionary() else {
        warn!("Malformed dictionary in txn {}", packet.txn);
        return false;
    };

    debug!("Inbox: {} tuples", dict.len());
    if EVENT_CHANNEL.try_send(AppEvent::InboxReceived(dict)).is_err() {
        warn!("Event channel full, dropping inbox message");
        return false;
    }
    true
}
