/// CMS object ids (posts, comments, users, terms) are signed 64-bit integers.
pub type DbId = i64;
