pub(crate) mod composer;
pub(crate) mod day_separator;
pub(crate) mod loading;
pub(crate) mod message_bubble;
pub(crate) mod reply_preview;

pub use composer::Composer;
pub use day_separator::DaySeparator;
pub use loading::Loading;
pub use message_bubble::MessageBubble;
pub use reply_preview::ReplyPreview;
