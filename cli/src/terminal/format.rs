use colored::*;
use gordo_core::report::{PortEntry, TallyEntry};

use crate::terminal::{colors, print};

const PORT_WIDTH: usize = 7;
const COUNT_WIDTH: usize = 6;

pub fn port_table(entries: &[PortEntry]) {
    print::print(&format!(
        "{}{}",
        format!("{:<PORT_WIDTH$}", "PORT").color(colors::PRIMARY).bold(),
        "SERVICE".color(colors::PRIMARY).bold()
    ));
    for entry in entries {
        print::print(&format!(
            "{}{}",
            format!("{:<PORT_WIDTH$}", entry.port).color(colors::PORT),
            service_label(entry.service)
        ));
    }
}

pub fn syn_table(entries: &[TallyEntry]) {
    print::print(&format!(
        "{}{}{}",
        format!("{:<PORT_WIDTH$}", "PORT").color(colors::PRIMARY).bold(),
        format!("{:<COUNT_WIDTH$}", "SYN").color(colors::PRIMARY).bold(),
        "SERVICE".color(colors::PRIMARY).bold()
    ));
    for entry in entries {
        print::print(&format!(
            "{}{}{}",
            format!("{:<PORT_WIDTH$}", entry.port).color(colors::PORT),
            format!("{:<COUNT_WIDTH$}", entry.count).color(colors::ACCENT),
            service_label(entry.service)
        ));
    }
}

fn service_label(service: &str) -> ColoredString {
    if service.is_empty() {
        "unknown".color(colors::SEPARATOR)
    } else {
        service.color(colors::SERVICE)
    }
}
