//! Companion link transmit task
//!
//! Writes queued packets (command pushes and inbox replies) to the UART.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::LINK_TX_CHANNEL;

/// Link TX task - sends packets to the companion
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    loop {
        let packet = LINK_TX_CHANNEL.receive().await;

        let bytes = match packet.encode_to_vec() {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to encode packet: {:?}", e);
                continue;
            }
        };

        if let Err(e) = tx.write_all(&bytes).await {
            warn!("Failed to send packet txn {}: {:?}", packet.txn, e);
        } else {
            trace!("TX: {:?} txn {} ({} bytes)", packet.kind, packet.txn, bytes.len());
        }
    }
}
