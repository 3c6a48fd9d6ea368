// Thin wrappers around the `log` facade so every message from the library is tagged with the
// module it came from, regardless of how the binary configures its dispatcher.

#[macro_export]
macro_rules! hikari_trace {
    ($($arg:tt)+) => {
        $crate::log::trace!(target: module_path!(), $($arg)+)
    };
}

#[macro_export]
macro_rules! hikari_debug {
    ($($arg:tt)+) => {
        $crate::log::debug!(target: module_path!(), $($arg)+)
    };
}

#[macro_export]
macro_rules! hikari_info {
    ($($arg:tt)+) => {
        $crate::log::info!(target: module_path!(), $($arg)+)
    };
}

#[macro_export]
macro_rules! hikari_warn {
    ($($arg:tt)+) => {
        $crate::log::warn!(target: module_path!(), $($arg)+)
    };
}

#[macro_export]
macro_rules! hikari_error {
    ($($arg:tt)+) => {
        $crate::log::error!(target: module_path!(), $($arg)+)
    };
}
