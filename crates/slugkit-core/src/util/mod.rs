pub mod slug;
pub mod transliterate;
