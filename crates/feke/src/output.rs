use std::io::{self, Write};

pub fn print_json(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

pub fn print_text(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

/// Status line on stderr, for commands whose stdout carries rendered output
pub fn print_status(s: &str) -> io::Result<()> {
    let mut err = io::stderr().lock();
    writeln!(err, "{s}")
}
