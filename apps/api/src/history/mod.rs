// Saved analyses: one row per submission made by an identified user.

pub mod handlers;
pub mod store;
