//! IOS XR output parsers for the NCS 5501 platform.

pub mod install;
pub mod interfaces;
pub mod inventory;
pub mod routing;
pub mod system;
