pub mod constants;
pub mod invalidation;
pub mod resource;
#[cfg(test)]
pub mod test_helpers;
pub mod types;
