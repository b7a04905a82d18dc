mod cast_vote;
mod question_detail;

pub use self::cast_vote::*;
pub use self::question_detail::*;
