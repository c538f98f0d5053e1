use colored::*;

use crate::terminal::{colors, print};

const LOGO: &str = r#"
  ██████╗  ██████╗ ██████╗ ██████╗  ██████╗
 ██╔════╝ ██╔═══██╗██╔══██╗██╔══██╗██╔═══██╗
 ██║  ███╗██║   ██║██████╔╝██║  ██║██║   ██║
 ██║   ██║██║   ██║██╔══██╗██║  ██║██║   ██║
 ╚██████╔╝╚██████╔╝██║  ██║██████╔╝╚██████╔╝
  ╚═════╝  ╚═════╝ ╚═╝  ╚═╝╚═════╝  ╚═════╝
"#;

const EXAMPLES: &[&str] = &[
    "gordo -t 127.0.0.1",
    "gordo -t localhost -a",
    "gordo -t http://example.com -w 500",
    "sudo gordo -t 192.168.1.10 --syn eth0",
];

pub fn print() {
    print::print(&format!("{}", LOGO.white().bold()));
}

/// Short usage block shown when gordo runs without arguments or on bad input.
pub fn usage() {
    print::print_status("Use -h for help");
    for example in EXAMPLES {
        print::print_status(format!("Example: {}", example.color(colors::ACCENT)));
    }
}
