// Who may do what.
//
// Decisions are made from a snapshot of the acting member fetched fresh for
// every event. Nothing is cached between events.

/// Role and permission state of one guild member at the time of an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberSnapshot {
    pub is_bot: bool,
    pub is_administrator: bool,
    pub role_names: Vec<String>,
}

impl MemberSnapshot {
    /// Exact, case-sensitive role name match.
    pub fn has_role(&self, role_name: &str) -> bool {
        self.role_names.iter().any(|name| name == role_name)
    }
}

#[derive(Debug, Clone)]
pub struct JudgePolicy {
    judge_role_name: String,
}

impl JudgePolicy {
    pub fn new(judge_role_name: impl Into<String>) -> Self {
        Self {
            judge_role_name: judge_role_name.into(),
        }
    }

    pub fn judge_role_name(&self) -> &str {
        &self.judge_role_name
    }

    /// Administrators or judges may pick the notification channel.
    pub fn can_configure_channel(&self, member: &MemberSnapshot) -> bool {
        member.is_administrator || self.is_judge(member)
    }

    /// Only judges may add or subtract points. Administrator alone is not enough.
    pub fn can_adjust_points(&self, member: &MemberSnapshot) -> bool {
        self.is_judge(member)
    }

    /// Checked against the member who reacted, not the message author.
    pub fn can_award_via_reaction(&self, reactor: &MemberSnapshot) -> bool {
        self.is_judge(reactor)
    }

    fn is_judge(&self, member: &MemberSnapshot) -> bool {
        member.has_role(&self.judge_role_name)
    }
}
