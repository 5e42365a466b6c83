//! ---
//! sl_section: "04-device"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Camera control contract, media listing and the HTTP backend."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::net::SocketAddr;

use tokio::net::UdpSocket;
use tracing::debug;

use crate::error::CameraError;

const WOL_PORT: u16 = 9;

/// Parse `aa:bb:cc:dd:ee:ff` (or `-` separated) into raw bytes.
pub fn parse_mac(text: &str) -> Result<[u8; 6], CameraError> {
    let invalid = || CameraError::InvalidMac(text.to_owned());
    let mut mac = [0u8; 6];
    let mut parts = text.split(|c| c == ':' || c == '-');
    for byte in mac.iter_mut() {
        let part = parts.next().ok_or_else(invalid)?;
        if part.len() != 2 {
            return Err(invalid());
        }
        *byte = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
    }
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok(mac)
}

/// Six `0xFF` bytes followed by sixteen repetitions of the MAC.
pub fn magic_packet(mac: &[u8; 6]) -> [u8; 102] {
    let mut packet = [0xFFu8; 102];
    for chunk in packet[6..].chunks_exact_mut(6) {
        chunk.copy_from_slice(mac);
    }
    packet
}

pub(crate) async fn send_magic_packet(address: &str, mac: &[u8; 6]) -> Result<(), CameraError> {
    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .map_err(CameraError::Wake)?;
    socket.set_broadcast(true).map_err(CameraError::Wake)?;
    let target: SocketAddr = format!("{}:{}", address, WOL_PORT)
        .parse()
        .map_err(|_| CameraError::device("wake", format!("invalid address '{}'", address)))?;
    socket
        .send_to(&magic_packet(mac), target)
        .await
        .map_err(CameraError::Wake)?;
    debug!(%target, "wake-on-lan packet sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_colon_and_dash_separated() {
        let expected = [0xd4, 0xd9, 0x19, 0xaa, 0xbb, 0x0c];
        assert_eq!(parse_mac("d4:d9:19:aa:bb:0c").unwrap(), expected);
        assert_eq!(parse_mac("D4-D9-19-AA-BB-0C").unwrap(), expected);
    }

    #[test]
    fn rejects_malformed_addresses() {
        for text in ["", "d4:d9:19:aa:bb", "d4:d9:19:aa:bb:cc:dd", "d4:d9:19:aa:bb:zz", "d4d9:19:aa:bb:cc"] {
            assert!(matches!(parse_mac(text), Err(CameraError::InvalidMac(_))), "{}", text);
        }
    }

    #[test]
    fn magic_packet_repeats_mac() {
        let mac = [1, 2, 3, 4, 5, 6];
        let packet = magic_packet(&mac);
        assert!(packet[..6].iter().all(|byte| *byte == 0xFF));
        assert_eq!(&packet[6..12], &mac);
        assert_eq!(&packet[96..], &mac);
    }
}
