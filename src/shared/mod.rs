pub mod constants;
pub mod system_profile;

#[cfg(test)]
pub mod test_helpers;
