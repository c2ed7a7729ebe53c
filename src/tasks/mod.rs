//! Top-level orchestration (spec §2 item 6, §4.9).

pub mod run;
