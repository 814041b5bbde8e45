//! Default synthesis for resources that have no stored state yet.

pub mod limits;
pub mod settings;
