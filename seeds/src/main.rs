#[macro_use]
extern crate log;

use chrono::{Duration, Utc};
use diesel::Connection;
use dotenv::dotenv;

use db::{
    get_conn,
    models::{Choice, Question},
    new_pool,
};

fn main() {
    dotenv().ok();
    env_logger::init();

    let pool = new_pool();
    let conn = get_conn(&pool).unwrap();
    let now = Utc::now();

    let polls = vec![
        (
            "What's up?",
            now - Duration::hours(2),
            vec!["Not much", "The sky", "Just hacking again"],
        ),
        (
            "Which editor do you use?",
            now - Duration::days(3),
            vec!["Vim", "Emacs", "VS Code", "Something else"],
        ),
        (
            "Will this poll open tomorrow?",
            now + Duration::days(1),
            vec!["Yes", "No"],
        ),
    ];

    conn.transaction::<_, errors::Error, _>(|| {
        for (question_text, pub_date, choices) in polls {
            let question = Question::create(&conn, question_text.to_string(), pub_date)?;
            Choice::create_many(
                &conn,
                question.id,
                choices.into_iter().map(String::from).collect(),
            )?;
            info!("Seeded question {} - {}", question.id, question.question_text);
        }
        Ok(())
    })
    .unwrap();
}
