pub mod function;
pub mod network;
pub mod region;

#[cfg(test)]
pub mod test_utils;
