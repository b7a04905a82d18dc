#[cfg(test)]
pub mod tests {
    use std::env;

    use actix_web::{
        http::header,
        test,
        web::{self, Bytes, Data},
        App,
    };
    use chrono::{Duration, Utc};
    use diesel::{self, PgConnection, RunQueryDsl};
    use futures::future::join_all;
    use serde::{de::DeserializeOwned, Serialize};
    use serde_json;

    use auth::{create_jwt, get_identity_service, PrivateClaim};
    use db::{
        self,
        models::Question,
        schema::{choices, questions},
    };

    use crate::routes::{not_found, routes};

    pub const TEST_ADMIN_USER: &str = "admin";
    pub const TEST_ADMIN_PASSWORD: &str = "correct horse battery staple";

    macro_rules! init_app {
        () => {
            test::init_service(
                App::new()
                    .wrap(get_identity_service())
                    .app_data(Data::new(db::new_pool()))
                    .configure(routes)
                    .default_service(web::route().to(not_found)),
            )
            .await
        };
    }

    /// Raw response of a form post, votes redirect without a JSON body.
    pub struct FormResponse {
        pub status: u16,
        pub location: Option<String>,
        pub body: Bytes,
    }

    impl FormResponse {
        pub fn json<R: DeserializeOwned>(&self) -> R {
            read_json(&self.body, self.status)
        }
    }

    fn read_json<R: DeserializeOwned>(body: &Bytes, status: u16) -> R {
        serde_json::from_slice(body).unwrap_or_else(|_| {
            panic!(
                "read_response_json failed during deserialization. response: {} status: {}",
                String::from_utf8(body.to_vec())
                    .unwrap_or_else(|_| "Could not convert Bytes -> String".to_string()),
                status
            )
        })
    }

    pub fn set_auth_env() {
        env::set_var("JWT_KEY", "polls-test-key");
        env::set_var("ADMIN_USER", TEST_ADMIN_USER);
        env::set_var("ADMIN_PASSWORD", TEST_ADMIN_PASSWORD);
    }

    async fn send<R>(req: test::TestRequest, token: Option<String>) -> (u16, R)
    where
        R: DeserializeOwned,
    {
        set_auth_env();
        let app = init_app!();
        let mut req = req;
        if let Some(token) = token {
            req = req.insert_header((header::AUTHORIZATION, token));
        }

        let res = test::call_service(&app, req.to_request()).await;

        let status = res.status().as_u16();
        let body = test::read_body(res).await;

        (status, read_json(&body, status))
    }

    /// Helper for HTTP GET integration tests
    pub async fn test_get<R>(route: &str, token: Option<String>) -> (u16, R)
    where
        R: DeserializeOwned,
    {
        send(test::TestRequest::get().uri(route), token).await
    }

    /// Helper for HTTP POST integration tests
    pub async fn test_post<T: Serialize, R>(
        route: &str,
        params: T,
        token: Option<String>,
    ) -> (u16, R)
    where
        R: DeserializeOwned,
    {
        send(test::TestRequest::post().set_json(&params).uri(route), token).await
    }

    pub async fn test_put<T: Serialize, R>(
        route: &str,
        params: T,
        token: Option<String>,
    ) -> (u16, R)
    where
        R: DeserializeOwned,
    {
        send(test::TestRequest::put().set_json(&params).uri(route), token).await
    }

    pub async fn test_delete<R>(route: &str, token: Option<String>) -> (u16, R)
    where
        R: DeserializeOwned,
    {
        send(test::TestRequest::delete().uri(route), token).await
    }

    /// Submits an urlencoded form the way a browser posts the voting form.
    pub async fn test_post_form<T: Serialize>(route: &str, params: T) -> FormResponse {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri(route)
            .set_form(&params)
            .to_request();

        let res = test::call_service(&app, req).await;

        let status = res.status().as_u16();
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let body = test::read_body(res).await;

        FormResponse {
            status,
            location,
            body,
        }
    }

    /// Fires every form at the same app at once and returns the statuses in order.
    pub async fn post_forms_concurrently<T: Serialize>(route: &str, forms: Vec<T>) -> Vec<u16> {
        let app = init_app!();

        let requests = forms.iter().map(|params| {
            let req = test::TestRequest::post()
                .uri(route)
                .set_form(params)
                .to_request();
            test::call_service(&app, req)
        });

        join_all(requests)
            .await
            .into_iter()
            .map(|res| res.status().as_u16())
            .collect()
    }

    pub fn get_auth_token_for(private_claim: PrivateClaim) -> String {
        set_auth_env();
        create_jwt(private_claim).unwrap()
    }

    pub fn get_auth_token() -> String {
        get_auth_token_for(PrivateClaim::new(TEST_ADMIN_USER.to_string()))
    }

    /// Creates a question published `days` from now, negative for the past.
    pub fn create_question(conn: &PgConnection, question_text: &str, days: i64) -> Question {
        Question::create(
            conn,
            question_text.to_string(),
            Utc::now() + Duration::days(days),
        )
        .unwrap()
    }

    pub fn clear_polls(conn: &PgConnection) {
        diesel::delete(choices::table).execute(conn).unwrap();
        diesel::delete(questions::table).execute(conn).unwrap();
    }
}
