// SPDX-License-Identifier: Apache-2.0 OR MIT
// Call-site logging macros

/// Log at an explicit level.
///
/// The gate is consulted first: when `level` is below the global threshold
/// the record is never constructed and the arguments are not evaluated.
/// Arguments are appended left to right and must be supported
/// [`Loggable`](crate::Loggable) types.
///
/// # Examples
/// ```ignore
/// log_at!(Level::Warn, "queue depth ", depth);
/// ```
#[macro_export]
macro_rules! log_at {
    ($level:expr $(, $arg:expr)* $(,)?) => {{
        let level = $level;
        if $crate::is_logged(level) {
            let mut record = $crate::Record::new(level, file!(), module_path!(), line!());
            $(record.append($arg);)*
            $crate::submit(record);
        }
    }};
}

/// Log a message at INFO
///
/// # Examples
/// ```ignore
/// log_info!("accepted connection from ", peer);
/// ```
#[macro_export]
macro_rules! log_info {
    ($($arg:expr),* $(,)?) => {
        $crate::log_at!($crate::Level::Info $(, $arg)*)
    };
}

/// Log a message at WARN
///
/// # Examples
/// ```ignore
/// log_warn!("retrying request ", attempt, " of ", limit);
/// ```
#[macro_export]
macro_rules! log_warn {
    ($($arg:expr),* $(,)?) => {
        $crate::log_at!($crate::Level::Warn $(, $arg)*)
    };
}

/// Log a message at CRIT
///
/// # Examples
/// ```ignore
/// log_crit!("worker died with code ", code);
/// ```
#[macro_export]
macro_rules! log_crit {
    ($($arg:expr),* $(,)?) => {
        $crate::log_at!($crate::Level::Crit $(, $arg)*)
    };
}
