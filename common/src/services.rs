//! Well-known service labels, keyed by port.

const CATALOG: &[(u16, &str)] = &[
    (20, "FTP"),
    (21, "FTP"),
    (22, "SSH"),
    (23, "telnet"),
    (25, "SMTP"),
    (42, "nameserver"),
    (53, "DNS"),
    (67, "DHCP"),
    (68, "DHCP"),
    (69, "TFTP"),
    (80, "HTTP"),
    (110, "POP3"),
    (119, "NNTP"),
    (123, "NTP"),
    (137, "NetBIOS"),
    (138, "NetBIOS"),
    (139, "NetBIOS"),
    (143, "IMAP"),
    (156, "SQL"),
    (161, "SNMP"),
    (162, "SNMP"),
    (179, "BGP"),
    (194, "IRC"),
    (389, "LDAP"),
    (443, "HTTPS"),
    (445, "SMB"),
    (631, "IPP"),
    (1433, "MSSQL"),
    (3389, "RDP"),
];

/// Looks up the service label for `port`.
pub fn lookup(port: u16) -> Option<&'static str> {
    CATALOG
        .binary_search_by_key(&port, |(p, _)| *p)
        .ok()
        .map(|idx| CATALOG[idx].1)
}

/// Like [`lookup`], but unknown ports yield an empty label.
pub fn label(port: u16) -> &'static str {
    lookup(port).unwrap_or("")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
