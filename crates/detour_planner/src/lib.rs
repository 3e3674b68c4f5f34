pub mod closure_store;
pub mod config;
pub mod planner;
pub mod render;
pub mod session;
pub mod source;

#[cfg(test)]
pub(crate) mod test_utils;
