//! Diagnostics output.
//!
//! With the `esp32-log` feature enabled messages go to `esp-println`,
//! otherwise the macros only type-check their arguments.

#[cfg(feature = "esp32-log")]
macro_rules! info {
    ($($arg:tt)*) => {{
        esp_println::println!($($arg)*);
    }};
}

#[cfg(not(feature = "esp32-log"))]
macro_rules! info {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

#[cfg(feature = "esp32-log")]
macro_rules! warn {
    ($($arg:tt)*) => {{
        esp_println::print!("WARN ");
        esp_println::println!($($arg)*);
    }};
}

#[cfg(not(feature = "esp32-log"))]
macro_rules! warn {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}
