use chrono::{DateTime, Utc};
use diesel::PgConnection;

use db::models::{Choice, Question};
use errors::Error;

use crate::handlers::{get_question_detail, DetailResponse};

pub const INVALID_SELECTION_MESSAGE: &str = "Please select a choice.";

#[derive(Debug)]
pub enum VoteOutcome {
    Recorded(Choice),
    /// Nothing was written; the form is shown again with an error message.
    InvalidSelection(DetailResponse),
}

/// Records one vote for `selection` on a published question.
///
/// Unknown or unpublished questions are `NotFound`. The increment repeats the publication
/// check, so a question unpublished mid-request never gains a vote. A missing selection, or a
/// choice that belongs to a different question, is not an error but an `InvalidSelection`
/// outcome.
pub fn cast_vote(
    conn: &PgConnection,
    question_id: i32,
    selection: Option<i32>,
    now: DateTime<Utc>,
) -> Result<VoteOutcome, Error> {
    let question = Question::find_published(conn, question_id, now)?;

    let choice_id = match selection {
        Some(choice_id) => choice_id,
        None => return invalid_selection(conn, question),
    };

    match Choice::vote(conn, question.id, choice_id, now) {
        Ok(choice) => Ok(VoteOutcome::Recorded(choice)),
        Err(Error::NotFound(_)) => {
            // the question may have been unpublished since it was loaded
            let question = Question::find_published(conn, question.id, now)?;
            invalid_selection(conn, question)
        }
        Err(err) => Err(err),
    }
}

fn invalid_selection(conn: &PgConnection, question: Question) -> Result<VoteOutcome, Error> {
    let detail = get_question_detail(conn, question, Some(INVALID_SELECTION_MESSAGE.to_string()))?;
    Ok(VoteOutcome::InvalidSelection(detail))
}
