//! Text formats for dates in CSV artifacts.
//!
//! Use with `#[serde(with = "crate::formats::date")]`; both modules also expose
//! an `option` submodule for nullable columns.

time::serde::format_description!(pub date, Date, "[year]-[month]-[day]");

time::serde::format_description!(
    pub datetime,
    PrimitiveDateTime,
    "[year]-[month]-[day] [hour]:[minute]:[second]"
);
