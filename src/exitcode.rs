//! Process exit codes (BSD sysexits.h compatible where one applies)

/// Successful termination
pub const OK: i32 = 0;

/// The target handler returned an error
pub const FAILURE: i32 = 1;

/// Command line usage error (parse or dispatch)
pub const USAGE: i32 = 2;

/// Help was requested and printed; the target did not run
pub const HELP: i32 = 3;

/// Internal software error: a signature failed to compile
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
