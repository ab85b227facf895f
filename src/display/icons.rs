//! Fixed icon identifiers understood by the display device.
//!
//! Short `iNNNN` codes reference icons from the device's public gallery.
//! The ION glyph is a custom bitmap, embedded as a base64 data URI so it is
//! available at process start without any per-request work.

/// Generic vehicle glyph shown next to bare route codes.
pub const BUS: &str = "i996";

/// Warning triangle for alerts and diagnostics.
pub const ALERT: &str = "i555";

/// Stop-sign glyph for the closed fallback frame.
pub const CLOSED: &str = "i3219";

/// Small clock for the next-service time frame.
pub const CLOCK: &str = "i82";

/// Checkmark for the no-alerts frame.
pub const CHECK: &str = "i3061";

/// ION light-rail vehicle, panning left to right across the 8x8 matrix.
pub const ION: &str = "data:image/gif;base64,R0lGODlhCAAIAJEAAAAAAABXuP///3h4eCH/C05FVFNDQVBFMi4wAwECAAAh+QQAMgAAACwAAAAACAAIAAACD4SPecFtLAR7bYJqzVCpAAAh+QQABQAAACwAAAAACAAIAAACD4SPacEdwISI0LFqz1CqAAAh+QQABQAAACwAAAAACAAIAAACD4SPCcHtIhh0tAYzUFagAAAh+QQABQAAACwAAAAACAAIAAACD4SPCcHdIhh0tDIwUFamAAAh+QQABQAAACwAAAAACAAIAAACDoSPCcHNIl50tLKBsDoFACH5BAAFAAAALAAAAAAIAAgAAAINhI8Jwc3yYJCuVjRUKgAh+QQABQAAACwAAAAACAAIAAACDYSPCcHtIhh0tIYzlCoAIfkEAAUAAAAsAAAAAAgACAAAAg+EjwnB3SIYdLQyM1BWoAAAIfkEAAUAAAAsAAAAAAgACAAAAg+EjwnBzSJedLQyMFBWpgAAIfkEAAUAAAAsAAAAAAgACAAAAg6EjwnBzfJgkK7WgbA6BQAh+QQABQAAACwAAAAACAAIAAACDYSPCcHtIhh0tAY0VCoAIfkEAAUAAAAsAAAAAAgACAAAAg2EjwnB3SIYdLSyM5QqACH5BAAFAAAALAAAAAAIAAgAAAIPhI8Jwc0iXnS0MjNQVqAAACH5BAAFAAAALAAAAAAIAAgAAAIOhI8Jwc3yoJu0gYGwMgUAIfkEAAUAAAAsAAAAAAgACAAAAg6EjwnB7SKcZHGGgbA6BQAh+QQABQAAACwAAAAACAAIAAACD4SPCcEdK4RbLgha01CpAAAh+QQAMgAAACwAAAAACAAIAAACD4SPCcFtIlowMgha01CqAAA7";
