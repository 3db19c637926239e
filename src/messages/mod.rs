//! Message assembly from mailbox payloads to speakable records.

mod assembler;
mod record;

pub use assembler::{AssemblerConfig, MessageAssembler, PermissionReport};
pub use record::{
    MessageRecord, NO_SUBJECT, UNKNOWN_DATE, UNKNOWN_SENDER, format_timestamp, readable_text,
};
