#![forbid(unsafe_code)]

pub mod statusbar;
pub mod toasts;
pub mod topbar;
pub mod updates;
pub mod write;
