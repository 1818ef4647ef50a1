//! Page models and form types.
//!
//! Each sub-module defines, for one content family, the form submitted by
//! the manager and the JSON page model a template would receive.

pub mod account;
pub mod announcements;
pub mod carousel;
pub mod common;
pub mod profiles;
