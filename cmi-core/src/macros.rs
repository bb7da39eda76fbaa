// Optional logging. Without the `log` feature the macros expand to nothing,
// so bare-metal builds pay nothing for log points on the hot path.

#[cfg(feature = "log")]
macro_rules! cmi_trace {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! cmi_trace {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! cmi_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! cmi_debug {
    ($($arg:tt)*) => {};
}
