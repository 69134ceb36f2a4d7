//! Infrastructure layer.

pub mod database;
pub mod mail;

pub use self::database::Database;
#[cfg(feature = "lake")]
pub use self::{database::{content_lake, ContentLake}, mail::HttpMailer};
pub use self::mail::Mailer;
