// tests/api_tests.rs

use quiz_backend::{config::Config, routes, state::AppState};
use sqlx::sqlite::SqlitePoolOptions;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
///
/// Each test gets its own in-memory SQLite database; a single pooled
/// connection keeps it alive for the lifetime of the test.
async fn spawn_app() -> String {
    // 1. Create a pool
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite database");

    // 2. Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    // 3. Create test configuration and state
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        rust_log: "error".to_string(),
    };

    let state = AppState { pool, config };

    // 4. Create the router with the app state
    let app = routes::create_router(state);

    // 5. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 6. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

fn sample_quiz_body() -> serde_json::Value {
    serde_json::json!({
        "title": "Arithmetic",
        "questions": [
            { "question": "2+2?", "options": ["3", "4", "5", "6"], "correct": 1 }
        ]
    })
}

/// Creates a quiz and returns its id.
async fn create_quiz(client: &reqwest::Client, address: &str, body: serde_json::Value) -> String {
    let response = client
        .post(format!("{}/api/quizzes", address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);
    let json: serde_json::Value = response.json().await.unwrap();
    json["id"].as_str().expect("id not found").to_string()
}

#[tokio::test]
async fn home_banner_works() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(&address)
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "Quiz API is running!");
}

#[tokio::test]
async fn create_and_fetch_quiz_works() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let id = create_quiz(&client, &address, sample_quiz_body()).await;

    let response = client
        .get(format!("{}/api/quizzes/{}", address, id))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let quiz: serde_json::Value = response.json().await.unwrap();
    assert_eq!(quiz["id"], id.as_str());
    // The stored title carries the creation-timestamp prefix.
    assert!(quiz["title"].as_str().unwrap().ends_with("Arithmetic"));
    assert_eq!(quiz["questions"][0]["question"], "2+2?");
    assert_eq!(quiz["questions"][0]["correct"], 1);
}

#[tokio::test]
async fn get_unknown_quiz_returns_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/quizzes/nonexistent-id", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn create_quiz_fails_validation() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act: correct answer text not among the options
    let response = client
        .post(format!("{}/api/quizzes", address))
        .json(&serde_json::json!({
            "title": "Broken",
            "questions": [
                { "question": "2+2?", "options": ["3", "4"], "correct": "7" }
            ]
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn create_quiz_without_title_fails() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/quizzes", address))
        .json(&serde_json::json!({
            "questions": [
                { "question": "2+2?", "options": ["3", "4"], "correct": 1 }
            ]
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn submit_correct_index_scores_full() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let id = create_quiz(&client, &address, sample_quiz_body()).await;

    // Act
    let response = client
        .post(format!("{}/api/quizzes/{}/submit", address, id))
        .json(&serde_json::json!({ "answers": { "0": 1 } }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 201);
    let record: serde_json::Value = response.json().await.unwrap();
    assert_eq!(record["score"], 1);
    assert_eq!(record["total"], 1);
    assert_eq!(record["percentage"], 100.0);
    assert_eq!(record["details"][0]["is_correct"], true);
    assert_eq!(record["user_name"], "Anonym");
}

#[tokio::test]
async fn submit_wrong_text_scores_zero() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let id = create_quiz(&client, &address, sample_quiz_body()).await;

    let response = client
        .post(format!("{}/api/quizzes/{}/submit", address, id))
        .json(&serde_json::json!({ "answers": { "0": "5" }, "user_name": "Ada" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);
    let record: serde_json::Value = response.json().await.unwrap();
    assert_eq!(record["score"], 0);
    assert_eq!(record["total"], 1);
    assert_eq!(record["percentage"], 0.0);
    assert_eq!(record["user_name"], "Ada");
}

#[tokio::test]
async fn omitted_question_grades_incorrect() {
    // Arrange: two-question quiz, submission only answers question 0
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let id = create_quiz(
        &client,
        &address,
        serde_json::json!({
            "title": "Two questions",
            "questions": [
                { "question": "2+2?", "options": ["3", "4", "5", "6"], "correct": 1 },
                { "question": "1+1?", "options": ["2", "3"], "correct": "2" }
            ]
        }),
    )
    .await;

    // Act
    let response = client
        .post(format!("{}/api/quizzes/{}/submit", address, id))
        .json(&serde_json::json!({ "answers": { "0": 1 } }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    let record: serde_json::Value = response.json().await.unwrap();
    assert_eq!(record["score"], 1);
    assert_eq!(record["total"], 2);
    assert_eq!(record["percentage"], 50.0);
    assert_eq!(record["details"][0]["is_correct"], true);
    assert_eq!(record["details"][1]["is_correct"], false);
}

#[tokio::test]
async fn submit_to_unknown_quiz_returns_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/quizzes/nonexistent-id/submit", address))
        .json(&serde_json::json!({ "answers": { "0": 1 } }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn submit_without_answers_fails_validation() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let id = create_quiz(&client, &address, sample_quiz_body()).await;

    let response = client
        .post(format!("{}/api/quizzes/{}/submit", address, id))
        .json(&serde_json::json!({ "user_name": "Ada" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);

    // No result row was created for the rejected submission.
    let results: serde_json::Value = client
        .get(format!("{}/api/quizzes/{}/results", address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(results.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn results_flow_works() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let id = create_quiz(&client, &address, sample_quiz_body()).await;

    let record: serde_json::Value = client
        .post(format!("{}/api/quizzes/{}/submit", address, id))
        .json(&serde_json::json!({ "answers": { "0": "4" }, "user_name": "Grace" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let result_id = record["id"].as_i64().unwrap();

    // Act: list results for the quiz
    let results: serde_json::Value = client
        .get(format!("{}/api/quizzes/{}/results", address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Assert
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["user_name"], "Grace");
    assert_eq!(results[0]["score"], 1);

    // Act: fetch the full record by id
    let response = client
        .get(format!("{}/api/results/{}", address, result_id))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let full: serde_json::Value = response.json().await.unwrap();
    assert_eq!(full["quiz_id"], id.as_str());
    assert_eq!(full["details"][0]["user_text"], "4");

    // Unknown result id is a 404.
    let response = client
        .get(format!("{}/api/results/999999", address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn quiz_list_reports_attempt_stats() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let id = create_quiz(&client, &address, sample_quiz_body()).await;

    for answer in [serde_json::json!(1), serde_json::json!("5")] {
        client
            .post(format!("{}/api/quizzes/{}/submit", address, id))
            .json(&serde_json::json!({ "answers": { "0": answer } }))
            .send()
            .await
            .expect("Failed to execute request");
    }

    // Act
    let summaries: serde_json::Value = client
        .get(format!("{}/api/quizzes", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Assert: summaries carry stats but never question bodies
    let summaries = summaries.as_array().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0]["id"], id.as_str());
    assert_eq!(summaries[0]["attempts"], 2);
    assert_eq!(summaries[0]["avg_success"], 50.0);
    assert!(summaries[0].get("questions").is_none());
}

#[tokio::test]
async fn repeat_submissions_reuse_the_same_user() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let id = create_quiz(&client, &address, sample_quiz_body()).await;

    // Act: two submissions under the same display name
    let mut user_ids = Vec::new();
    for answer in [serde_json::json!(1), serde_json::json!("5")] {
        let record: serde_json::Value = client
            .post(format!("{}/api/quizzes/{}/submit", address, id))
            .json(&serde_json::json!({ "answers": { "0": answer }, "user_name": "Grace" }))
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .unwrap();
        user_ids.push(record["user_id"].as_i64().unwrap());
    }

    // Assert: deduplicated by name, both results reference one user row
    assert_eq!(user_ids[0], user_ids[1]);
}

#[tokio::test]
async fn results_for_unknown_quiz_returns_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/quizzes/nonexistent-id/results", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}
