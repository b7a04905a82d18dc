use chrono::{DateTime, Utc};
use diesel::{self, BelongingToDsl, ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl};
use serde::{Deserialize, Serialize};

use errors::Error;

use crate::models::Question;
use crate::schema::choices::{self, table};

#[derive(Associations, Clone, Debug, Deserialize, Identifiable, PartialEq, Queryable, Serialize)]
#[belongs_to(Question)]
pub struct Choice {
    pub id: i32,
    pub question_id: i32,
    pub choice_text: String,
    pub votes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[table_name = "choices"]
pub struct NewChoice {
    pub question_id: i32,
    pub choice_text: String,
}

#[derive(AsChangeset, Default, Deserialize)]
#[table_name = "choices"]
pub struct ChoiceChanges {
    pub choice_text: Option<String>,
    pub votes: Option<i32>,
}

impl Choice {
    pub fn create(
        conn: &PgConnection,
        question_id: i32,
        choice_text: String,
    ) -> Result<Choice, Error> {
        let choice = diesel::insert_into(table)
            .values(NewChoice {
                question_id,
                choice_text,
            })
            .get_result(conn)?;

        Ok(choice)
    }

    pub fn create_many(
        conn: &PgConnection,
        question_id: i32,
        choice_texts: Vec<String>,
    ) -> Result<Vec<Choice>, Error> {
        if choice_texts.is_empty() {
            return Ok(Vec::new());
        }

        let choices = diesel::insert_into(table)
            .values(
                choice_texts
                    .into_iter()
                    .map(|choice_text| NewChoice {
                        question_id,
                        choice_text,
                    })
                    .collect::<Vec<NewChoice>>(),
            )
            .get_results(conn)?;

        Ok(choices)
    }

    pub fn for_question(conn: &PgConnection, question: &Question) -> Result<Vec<Choice>, Error> {
        use choices::dsl::id;

        let results = Choice::belonging_to(question)
            .order(id)
            .load::<Choice>(conn)?;

        Ok(results)
    }

    /// Adds one vote to a choice of the given question.
    ///
    /// The increment happens inside a single `UPDATE ... SET votes = votes + 1`, so concurrent
    /// voters are serialized by the row lock rather than racing on a value read into memory.
    /// The same statement requires the question to be published as of `now`. A choice that
    /// does not exist, belongs to another question, or sits on an unpublished question yields
    /// `NotFound` and nothing is written.
    pub fn vote(
        conn: &PgConnection,
        question_id: i32,
        choice_id: i32,
        now: DateTime<Utc>,
    ) -> Result<Choice, Error> {
        use crate::schema::questions;
        use choices::dsl::{
            choices as choices_table, id, question_id as question_id_field, votes,
        };

        let published = questions::table
            .select(questions::id)
            .filter(questions::id.eq(question_id))
            .filter(questions::pub_date.le(now));

        let choice = diesel::update(
            choices_table
                .filter(id.eq(choice_id))
                .filter(question_id_field.eq_any(published)),
        )
        .set(votes.eq(votes + 1))
        .get_result::<Choice>(conn)?;

        debug!(
            "Recorded vote for choice {} of question {}, now {}",
            choice.id, question_id, choice.votes
        );

        Ok(choice)
    }

    pub fn update(
        conn: &PgConnection,
        choice_id: i32,
        changes: &ChoiceChanges,
    ) -> Result<Choice, Error> {
        use choices::dsl::choices as choices_table;

        if let Some(votes) = changes.votes {
            if votes < 0 {
                return Err(Error::ValidationError(vec![
                    "votes cannot be negative".to_string()
                ]));
            }
        }

        if changes.choice_text.is_none() && changes.votes.is_none() {
            let choice = choices_table.find(choice_id).first(conn)?;
            return Ok(choice);
        }

        let choice = diesel::update(choices_table.find(choice_id))
            .set(changes)
            .get_result(conn)?;

        Ok(choice)
    }

    pub fn delete(conn: &PgConnection, choice_id: i32) -> Result<(), Error> {
        use choices::dsl::choices as choices_table;

        let deleted = diesel::delete(choices_table.find(choice_id)).execute(conn)?;
        if deleted == 0 {
            return Err(Error::NotFound("Record not found".into()));
        }

        Ok(())
    }
}
