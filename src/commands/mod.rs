pub(crate) mod amount;
pub(crate) mod commands_model;
pub(crate) mod commands_service;
pub(crate) mod spoken_date;

pub use amount::parse_spoken_amount;
pub use commands_model::{
    CommandError, CommandOutcome, DisambiguationPayload, EntityKind, ParsedCommand,
    ParsedTransaction, ParsedTransfer, UnresolvedEntity,
};
pub use commands_service::CommandInterpreter;
pub use spoken_date::strip_trailing_date;
