pub mod entities;
pub mod table;

pub use entities::{parse_entities, split_mention, EntityMention, EntityParse, Malformed};
pub use table::{read_articles, read_articles_from, ArticleRecord, TopicField, REQUIRED_COLUMNS};
