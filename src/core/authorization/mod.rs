pub mod judge_policy;

pub use judge_policy::{JudgePolicy, MemberSnapshot};
