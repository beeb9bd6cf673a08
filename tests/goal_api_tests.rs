use actix_web::{App, test, web};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use lock_in_api::data::memory::InMemoryGoalRepository;
use lock_in_api::data::user_repository::InMemoryUserRepository;
use lock_in_api::domain::models::{Goal, NewGoal};
use lock_in_api::domain::repository::{GoalRepository, UserRepository};
use lock_in_api::domain::user::{NewUser, User};
use lock_in_api::infrastructure::security::{CredentialHasher, HashCost};
use lock_in_api::presentation::configure;
use lock_in_api::presentation::handlers::AppState;
use std::sync::Arc;

/// Store whose every call fails, as if the database were unreachable.
struct UnreachableStore;

#[async_trait]
impl UserRepository for UnreachableStore {
    async fn list_users(&self) -> Result<Vec<User>> {
        Err(anyhow!("Can't connect to MySQL server on 'localhost:3306'"))
    }

    async fn insert_user(&self, _user: NewUser) -> Result<User> {
        Err(anyhow!("Can't connect to MySQL server on 'localhost:3306'"))
    }
}

#[async_trait]
impl GoalRepository for UnreachableStore {
    async fn list_goals_by_owner(&self, _owner_id: i64) -> Result<Vec<Goal>> {
        Err(anyhow!("Can't connect to MySQL server on 'localhost:3306'"))
    }

    async fn insert_goal(&self, _goal: NewGoal) -> Result<Goal> {
        Err(anyhow!("Can't connect to MySQL server on 'localhost:3306'"))
    }

    async fn delete_goal(&self, _goal_id: i64) -> Result<u64> {
        Err(anyhow!("Can't connect to MySQL server on 'localhost:3306'"))
    }
}

fn test_hasher() -> CredentialHasher {
    CredentialHasher::new(HashCost {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}

macro_rules! setup_goal_test {
    () => {{
        let state = web::Data::new(AppState::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryGoalRepository::new()),
            test_hasher(),
        ));
        test::init_service(App::new().app_data(state.clone()).configure(configure)).await
    }};
    (unreachable) => {{
        let store = Arc::new(UnreachableStore);
        let state = web::Data::new(AppState::new(store.clone(), store, test_hasher()));
        test::init_service(App::new().app_data(state.clone()).configure(configure)).await
    }};
}

#[actix_web::test]
async fn test_create_goal_without_description() {
    let app = setup_goal_test!();

    let req = test::TestRequest::post()
        .uri("/goals")
        .set_json(serde_json::json!({
            "Title": "Revise chapter 3",
            "DueDate": "2025-10-20T14:30",
            "UserID": 1
        }))
        .to_request();
    let goal: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert!(goal["GoalID"].as_i64().unwrap() > 0);
    assert_eq!(goal["Title"], "Revise chapter 3");
    assert_eq!(goal["Description"], "");
    assert_eq!(goal["DueDate"], "2025-10-20T14:30:00");
    assert_eq!(goal["UserID"], 1);
}

#[actix_web::test]
async fn test_create_goal_with_offset_returns_the_same_instant() {
    let app = setup_goal_test!();
    let sent = "2025-10-20T14:30:00+02:00";

    let req = test::TestRequest::post()
        .uri("/goals")
        .set_json(serde_json::json!({ "Title": "exam", "DueDate": sent, "UserID": 1 }))
        .to_request();
    let goal: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let returned =
        NaiveDateTime::parse_from_str(goal["DueDate"].as_str().unwrap(), "%Y-%m-%dT%H:%M:%S")
            .unwrap();
    let read_as_local = Local.from_local_datetime(&returned).earliest().unwrap();
    assert_eq!(read_as_local, DateTime::parse_from_rfc3339(sent).unwrap());

    let req = test::TestRequest::get().uri("/goals?userId=1").to_request();
    let listed: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed[0]["DueDate"], goal["DueDate"]);
}

#[actix_web::test]
async fn test_create_goal_missing_required_fields_is_400() {
    let app = setup_goal_test!();

    let bodies = vec![
        serde_json::json!({ "DueDate": "2025-10-20T14:30", "UserID": 1 }),
        serde_json::json!({ "Title": "t", "UserID": 1 }),
        serde_json::json!({ "Title": "t", "DueDate": "2025-10-20T14:30" }),
        serde_json::json!({ "Title": "t", "DueDate": "2025-10-20T14:30", "UserID": 0 }),
    ];

    for body in bodies {
        let req = test::TestRequest::post()
            .uri("/goals")
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "body: {}", body);

        let err: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(err["error"], "Title, DueDate and UserID are required");
    }
}

#[actix_web::test]
async fn test_create_goal_with_bad_due_date_is_400() {
    let app = setup_goal_test!();

    let req = test::TestRequest::post()
        .uri("/goals")
        .set_json(serde_json::json!({ "Title": "t", "DueDate": "whenever", "UserID": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_list_goals_requires_user_id() {
    let app = setup_goal_test!();

    let req = test::TestRequest::get().uri("/goals").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let err: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(err, serde_json::json!({ "error": "userId is required" }));

    let req = test::TestRequest::get().uri("/goals?userId=abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_list_goals_for_user_without_goals_is_empty_array() {
    let app = setup_goal_test!();

    let req = test::TestRequest::get().uri("/goals?userId=7").to_request();
    let goals: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(goals, serde_json::json!([]));
}

#[actix_web::test]
async fn test_list_goals_only_returns_owned_goals() {
    let app = setup_goal_test!();

    for (title, owner) in [("mine", 1), ("theirs", 2), ("also mine", 1)] {
        let req = test::TestRequest::post()
            .uri("/goals")
            .set_json(serde_json::json!({
                "Title": title,
                "Description": "notes",
                "DueDate": "2025-11-01",
                "UserID": owner
            }))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
    }

    let req = test::TestRequest::get().uri("/goals?userId=1").to_request();
    let goals: Vec<serde_json::Value> = test::call_and_read_body_json(&app, req).await;

    let titles: Vec<_> = goals.iter().map(|g| g["Title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["mine", "also mine"]);
    assert!(goals.iter().all(|g| g["UserID"] == 1 && g["Description"] == "notes"));
}

#[actix_web::test]
async fn test_delete_goal_twice_is_idempotent() {
    let app = setup_goal_test!();

    let req = test::TestRequest::post()
        .uri("/goals")
        .set_json(serde_json::json!({ "Title": "t", "DueDate": "2025-10-20T09:00", "UserID": 3 }))
        .to_request();
    let goal: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let goal_id = goal["GoalID"].as_i64().unwrap();

    for _ in 0..2 {
        let req = test::TestRequest::delete()
            .uri(&format!("/goals/{}", goal_id))
            .to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp, serde_json::json!({ "ok": true }));
    }

    let req = test::TestRequest::get().uri("/goals?userId=3").to_request();
    let goals: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(goals, serde_json::json!([]));
}

#[actix_web::test]
async fn test_delete_unknown_goal_succeeds() {
    let app = setup_goal_test!();

    let req = test::TestRequest::delete().uri("/goals/999").to_request();
    let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp, serde_json::json!({ "ok": true }));
}

#[actix_web::test]
async fn test_delete_goal_with_non_integer_id_succeeds() {
    let app = setup_goal_test!();

    let req = test::TestRequest::delete().uri("/goals/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "ok": true }));
}

#[actix_web::test]
async fn test_unreachable_store_yields_generic_500s() {
    let app = setup_goal_test!(unreachable);

    let cases = vec![
        (test::TestRequest::get().uri("/users"), "Failed to fetch users"),
        (
            test::TestRequest::post().uri("/add_user").set_json(serde_json::json!({
                "Name": "A", "Email": "a@x.com", "Password": "secret1"
            })),
            "Failed to add user",
        ),
        (test::TestRequest::get().uri("/goals?userId=1"), "Failed to fetch goals"),
        (
            test::TestRequest::post().uri("/goals").set_json(serde_json::json!({
                "Title": "t", "DueDate": "2025-10-20", "UserID": 1
            })),
            "Failed to create goal",
        ),
        (test::TestRequest::delete().uri("/goals/1"), "Failed to delete goal"),
    ];

    for (req, message) in cases {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), 500);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({ "error": message }));
        assert!(!body.to_string().contains("MySQL"));
    }
}
