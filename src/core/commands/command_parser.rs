// Text command recognition.
//
// Each message is parsed on its own; there are no multi-step conversations.
// The parser only understands text. Whether the author may run the command is
// decided later by the dispatcher.

pub const SET_CHANNEL_COMMAND: &str = "!set_channel";
pub const POINTS_COMMAND: &str = "!points";
pub const SUBTRACT_COMMAND: &str = "!subtra";
pub const ADD_COMMAND: &str = "!add";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointAction {
    Add,
    Subtract,
}

impl PointAction {
    pub fn command_name(&self) -> &'static str {
        match self {
            PointAction::Add => ADD_COMMAND,
            PointAction::Subtract => SUBTRACT_COMMAND,
        }
    }

    /// The ledger delta for a typed amount.
    pub fn delta(&self, amount: i64) -> i64 {
        match self {
            PointAction::Add => amount,
            PointAction::Subtract => amount.saturating_neg(),
        }
    }

    pub fn usage(&self) -> String {
        format!("Usage: `{} @User <points>`", self.command_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// `!set_channel`
    SetChannel,
    /// `!points`
    ShowPoints,
    /// `!add @User 5` / `!subtra @User 5`
    AdjustPoints {
        action: PointAction,
        target_user_id: u64,
        amount: i64,
    },
    /// A point command with a missing mention or a non-integer amount.
    Usage(PointAction),
}

/// Returns `None` for anything that is not a bot command.
pub fn parse_command(content: &str) -> Option<BotCommand> {
    if content == SET_CHANNEL_COMMAND {
        return Some(BotCommand::SetChannel);
    }
    if content == POINTS_COMMAND {
        return Some(BotCommand::ShowPoints);
    }

    // Longest prefix first
    let action = if content.starts_with(SUBTRACT_COMMAND) {
        PointAction::Subtract
    } else if content.starts_with(ADD_COMMAND) {
        PointAction::Add
    } else {
        return None;
    };

    let mut args = content.split_whitespace().skip(1);
    let target_user_id = args.next().and_then(parse_user_mention);
    let amount = args.next().and_then(|token| token.parse::<i64>().ok());

    Some(match (target_user_id, amount) {
        (Some(target_user_id), Some(amount)) => BotCommand::AdjustPoints {
            action,
            target_user_id,
            amount,
        },
        _ => BotCommand::Usage(action),
    })
}

/// `<@123>` or the legacy nickname form `<@!123>`.
pub fn parse_user_mention(token: &str) -> Option<u64> {
    let inner = token.strip_prefix("<@")?.strip_suffix('>')?;
    let inner = inner.strip_prefix('!').unwrap_or(inner);
    inner.parse().ok()
}
