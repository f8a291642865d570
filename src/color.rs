extern crate termcolor;

use std::{fmt, io::Write};
use termcolor::{Color, ColorSpec, WriteColor};

macro_rules! get_version {
    ($file:expr) => {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " ",
            include_str!(concat!(env!("OUT_DIR"), "/", $file))
        )
    };
}

/// Writes `<typ>: <message>` with a right aligned, coloured tag.
pub fn tagged<W: WriteColor>(dest: &mut W, color: Color, typ: &str, message: fmt::Arguments) {
    dest.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))
        .expect("Error: can't set output color");
    write!(dest, "{:>9}: ", typ).expect("Failed to write output");
    dest.reset().expect("Error: can't reset color");
    writeln!(dest, "{}", message).expect("Failed to write output");
}

macro_rules! write_color {
    ($dest:expr, $color:expr, $typ:expr, $($arg:tt)*) => {
        $crate::color::tagged($dest, $color, $typ, format_args!($($arg)*))
    };
}

macro_rules! write_error {
    ($dest:expr, $typ:expr, $($arg:tt)*) => {
        write_color!($dest, ::termcolor::Color::Red, $typ, $($arg)*)
    };
}

macro_rules! write_warn {
    ($dest:expr, $typ:expr, $($arg:tt)*) => {
        write_color!($dest, ::termcolor::Color::Yellow, $typ, $($arg)*)
    };
}

macro_rules! write_info {
    ($dest:expr, $typ:expr, $($arg:tt)*) => {
        write_color!($dest, ::termcolor::Color::Blue, $typ, $($arg)*)
    };
}

macro_rules! write_ok {
    ($dest:expr, $typ:expr, $($arg:tt)*) => {
        write_color!($dest, ::termcolor::Color::Green, $typ, $($arg)*)
    };
}

macro_rules! write_progress {
    ($dest:expr, $typ:expr, $($arg:tt)*) => {
        write_color!($dest, ::termcolor::Color::Cyan, $typ, $($arg)*)
    };
}
