pub mod intake;
pub mod org_profile;
