use chrono::{DateTime, Duration, Utc};
use diesel::{self, ExpressionMethods, PgConnection, PgTextExpressionMethods, QueryDsl, RunQueryDsl};
use serde::{Deserialize, Serialize};

use errors::Error;

use crate::schema::questions::{self, table};
use crate::utils::PubDateFilter;

#[derive(Clone, Debug, Deserialize, Identifiable, PartialEq, Queryable, Serialize)]
pub struct Question {
    pub id: i32,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[table_name = "questions"]
pub struct NewQuestion {
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

#[derive(AsChangeset, Default, Deserialize)]
#[table_name = "questions"]
pub struct QuestionChanges {
    pub question_text: Option<String>,
    pub pub_date: Option<DateTime<Utc>>,
}

/// Search parameters for the admin question list.
#[derive(Debug, Default, Deserialize)]
pub struct QuestionFilter {
    pub q: Option<String>,
    pub pub_date: Option<PubDateFilter>,
}

impl Question {
    /// Published within the day leading up to `now`. Future questions are not recent.
    pub fn was_published_recently_at(&self, now: DateTime<Utc>) -> bool {
        let age = now - self.pub_date;
        age >= Duration::zero() && age < Duration::days(1)
    }

    pub fn create(
        conn: &PgConnection,
        question_text: String,
        pub_date: DateTime<Utc>,
    ) -> Result<Question, Error> {
        let question = diesel::insert_into(table)
            .values(NewQuestion {
                question_text,
                pub_date,
            })
            .get_result(conn)?;

        Ok(question)
    }

    pub fn find_by_id(conn: &PgConnection, question_id: i32) -> Result<Question, Error> {
        use questions::dsl::questions as questions_table;

        let question = questions_table.find(question_id).first(conn)?;

        Ok(question)
    }

    /// Loads a question only if it is published as of `now`.
    pub fn find_published(
        conn: &PgConnection,
        question_id: i32,
        now: DateTime<Utc>,
    ) -> Result<Question, Error> {
        use questions::dsl::{id, pub_date, questions as questions_table};

        let question = questions_table
            .filter(id.eq(question_id))
            .filter(pub_date.le(now))
            .first(conn)?;

        Ok(question)
    }

    /// Most recently published questions first; equal dates fall back to creation order.
    pub fn latest_published(
        conn: &PgConnection,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Question>, Error> {
        use questions::dsl::{id, pub_date, questions as questions_table};

        let results = questions_table
            .filter(pub_date.le(now))
            .order((pub_date.desc(), id.desc()))
            .limit(limit)
            .load::<Question>(conn)?;

        Ok(results)
    }

    pub fn search(
        conn: &PgConnection,
        filter: &QuestionFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<Question>, Error> {
        use questions::dsl::{id, pub_date, question_text, questions as questions_table};

        let mut query = questions_table.into_boxed();

        if let Some(term) = filter.q.as_ref().map(|q| q.trim()).filter(|q| !q.is_empty()) {
            query = query.filter(question_text.ilike(format!("%{}%", escape_like(term))));
        }

        if let Some(bucket) = filter.pub_date {
            let (since, until) = bucket.range(now);
            query = query.filter(pub_date.ge(since)).filter(pub_date.lt(until));
        }

        let results = query
            .order((pub_date.desc(), id.desc()))
            .load::<Question>(conn)?;

        Ok(results)
    }

    pub fn update(
        conn: &PgConnection,
        question_id: i32,
        changes: &QuestionChanges,
    ) -> Result<Question, Error> {
        use questions::dsl::questions as questions_table;

        if changes.question_text.is_none() && changes.pub_date.is_none() {
            return Question::find_by_id(conn, question_id);
        }

        let question = diesel::update(questions_table.find(question_id))
            .set(changes)
            .get_result(conn)?;

        Ok(question)
    }

    /// Removes the question, its choices go with it through the foreign key cascade.
    pub fn delete(conn: &PgConnection, question_id: i32) -> Result<(), Error> {
        use questions::dsl::questions as questions_table;

        let deleted = diesel::delete(questions_table.find(question_id)).execute(conn)?;
        if deleted == 0 {
            return Err(Error::NotFound("Record not found".into()));
        }

        Ok(())
    }
}

/// Makes `%`, `_` and `\` match themselves inside an `ILIKE` pattern.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
