/// Identity field excluded from duplicate counts
pub const ID_FIELD: &str = "_id";

/// Message attached to the destination field when a duplicate is rejected
pub const DUPLICATE_MESSAGE: &str = "is already taken";

/// Separator between a slug and its numeric collision suffix
pub const SUFFIX_SEPARATOR: &str = "-";

/// Optional numeric suffix accepted after a candidate when counting siblings
pub const SUFFIX_PATTERN: &str = const_str::concat!("(", SUFFIX_SEPARATOR, "\\d+)?$");

/// Mongo-style regex operator keys used in duplicate filters
pub const REGEX_OPERATOR: &str = "$regex";
pub const REGEX_OPTIONS: &str = "$options";
pub const NOT_EQUAL_OPERATOR: &str = "$ne";
pub const EQUAL_OPERATOR: &str = "$eq";
