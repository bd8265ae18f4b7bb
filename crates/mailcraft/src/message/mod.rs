//! Message building and the values exchanged with collaborators.

mod attachment;
mod builder;
mod parts;

pub use attachment::{Attachment, content_type_for};
pub use builder::MessageBuilder;
pub use parts::{
    AssembledMessage, AttachmentPart, DeliveryOutcome, MessageParts, TEXT_FALLBACK, html_document,
};
