//! The post-handshake packet heuristic.
//!
//! A segment counts when it comes from the target address and its TCP flags byte is
//! exactly one of [`POST_HANDSHAKE_FLAGS`]. Those are the flags a host only sends once a
//! handshake went through, so seeing them for a port suggests it is live even when the
//! connect probe reported it closed.

use std::net::Ipv4Addr;

use pnet::datalink::NetworkInterface;
use pnet::packet::Packet;
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::tcp::TcpPacket;

pub const ETH_HDR_LEN: usize = 14;

/// TCP flags byte values counted by the correlator.
pub mod flags {
    pub const ACK: u8 = 0x10;
    pub const FIN_ACK: u8 = 0x11;
    pub const PSH_ACK: u8 = 0x18;
}

pub const POST_HANDSHAKE_FLAGS: [u8; 3] = [flags::FIN_ACK, flags::ACK, flags::PSH_ACK];

pub fn is_post_handshake(tcp_flags: u8) -> bool {
    POST_HANDSHAKE_FLAGS.contains(&tcp_flags)
}

/// How packets are framed on a capture interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// Ethernet header in front of every packet.
    Ethernet,
    /// Bare IP packets, as read from tun and other point-to-point devices.
    RawIp,
}

impl Framing {
    pub fn of(intf: &NetworkInterface) -> Self {
        if intf.is_point_to_point() || intf.mac.is_none() {
            Framing::RawIp
        } else {
            Framing::Ethernet
        }
    }
}

/// Matches captured frames against the target address and the flag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureFilter {
    source: Ipv4Addr,
    framing: Framing,
}

impl CaptureFilter {
    pub fn new(source: Ipv4Addr, framing: Framing) -> Self {
        Self { source, framing }
    }

    pub fn source(&self) -> Ipv4Addr {
        self.source
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// The filter in BPF syntax, as a capture library would install it.
    pub fn expression(&self) -> String {
        let flag_terms: Vec<String> = POST_HANDSHAKE_FLAGS
            .iter()
            .map(|f| format!("tcp[13] == 0x{f:02x}"))
            .collect();
        format!("ip src host {} and ({})", self.source, flag_terms.join(" or "))
    }

    /// Returns the TCP source port of `frame` if the frame passes the filter.
    pub fn source_port(&self, frame: &[u8]) -> Option<u16> {
        let ipv4 = Ipv4Packet::new(self.ip_bytes(frame)?)?;
        if ipv4.get_source() != self.source
            || ipv4.get_next_level_protocol() != IpNextHeaderProtocols::Tcp
        {
            return None;
        }

        let tcp = TcpPacket::new(ipv4.payload())?;
        is_post_handshake(tcp.get_flags()).then(|| tcp.get_source())
    }

    fn ip_bytes<'a>(&self, frame: &'a [u8]) -> Option<&'a [u8]> {
        match self.framing {
            Framing::Ethernet => {
                let eth = EthernetPacket::new(frame)?;
                if eth.get_ethertype() != EtherTypes::Ipv4 {
                    return None;
                }
                frame.get(ETH_HDR_LEN..)
            }
            Framing::RawIp => match frame.first() {
                Some(byte) if byte >> 4 == 4 => Some(frame),
                _ => None,
            },
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
