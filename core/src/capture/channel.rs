use std::io;

use pnet::datalink::{self, Channel, Config, DataLinkReceiver, NetworkInterface};

use super::CaptureError;

const CAPTURE_BUFFER_SIZE: usize = 4096;

/// Blocking, promiscuous capture settings.
pub fn capture_config() -> Config {
    Config {
        read_buffer_size: CAPTURE_BUFFER_SIZE,
        read_timeout: None,
        promiscuous: true,
        ..Default::default()
    }
}

pub fn find_interface(name: &str) -> Result<NetworkInterface, CaptureError> {
    datalink::interfaces()
        .into_iter()
        .find(|intf| intf.name == name)
        .ok_or_else(|| CaptureError::UnknownInterface(name.to_string()))
}

/// Opens a receive-only channel on `intf`. The sending half is dropped.
pub fn open_receiver<F>(
    intf: &NetworkInterface,
    cfg: Config,
    channel_opener: F,
) -> Result<Box<dyn DataLinkReceiver>, CaptureError>
where
    F: FnOnce(&NetworkInterface, Config) -> io::Result<Channel>,
{
    let channel: Channel = channel_opener(intf, cfg).map_err(|source| CaptureError::Open {
        interface: intf.name.clone(),
        source,
    })?;
    match channel {
        Channel::Ethernet(_tx, rx) => Ok(rx),
        _ => Err(CaptureError::UnsupportedChannel(intf.name.clone())),
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
