// The infra module contains implementations of core traits.

pub mod store;
