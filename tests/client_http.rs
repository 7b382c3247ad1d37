// Tests for the HTTP collaborators against a local mock server.
use leavebot::client::redirect::resolve_location;
use leavebot::client::{
    AssignmentWriter, CalendarSource, ChatNotifier, ForecastClient, HttpCalendarSource,
    PeopleDirectory, SlackWebhook,
};
use leavebot::config::ForecastConfig;
use leavebot::people::Assignment;
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

fn forecast_config(url: &str) -> ForecastConfig {
    ForecastConfig {
        api_url: url.to_string(),
        token: "tok".to_string(),
        account_id: "9876".to_string(),
        time_off_project_id: "555".to_string(),
        product_roles: vec!["Product".to_string()],
    }
}

#[tokio::test]
async fn test_webhook_posts_text_payload() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/services/weekly")
        .match_header("content-type", "application/json")
        .match_header("user-agent", Matcher::Regex(r"^leavebot/".to_string()))
        .match_body(Matcher::Json(json!({"text": "Hey there :wave:"})))
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let hook = SlackWebhook::new(&format!("{}/services/weekly", server.url()), TIMEOUT).unwrap();
    hook.notify("Hey there :wave:").await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_webhook_failure_status_is_an_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/hook")
        .with_status(404)
        .with_body("no_service")
        .create_async()
        .await;

    let hook = SlackWebhook::new(&format!("{}/hook", server.url()), TIMEOUT).unwrap();
    let err = hook.notify("hi").await.unwrap_err().to_string();
    assert!(err.contains("404"), "{}", err);
    assert!(err.contains("no_service"), "{}", err);
}

#[tokio::test]
async fn test_calendar_follows_share_link_redirect() {
    let mut server = Server::new_async().await;
    let feed = "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n";
    let hop = server
        .mock("GET", "/share/abc")
        .with_status(302)
        .with_header("location", "/files/timeoff.ics")
        .create_async()
        .await;
    let file = server
        .mock("GET", "/files/timeoff.ics")
        .with_status(200)
        .with_header("content-type", "text/calendar")
        .with_body(feed)
        .create_async()
        .await;

    let source =
        HttpCalendarSource::new(&format!("{}/share/abc", server.url()), TIMEOUT).unwrap();
    let body = source.fetch().await.unwrap();

    assert_eq!(body, feed.as_bytes());
    hop.assert_async().await;
    file.assert_async().await;
}

#[tokio::test]
async fn test_calendar_expired_link_is_an_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/share/old")
        .with_status(410)
        .create_async()
        .await;

    let source = HttpCalendarSource::new(&format!("{}/share/old", server.url()), TIMEOUT).unwrap();
    assert!(source.fetch().await.is_err());
}

#[tokio::test]
async fn test_people_listing_sends_auth_headers() {
    let mut server = Server::new_async().await;
    let body = json!({
        "people": [
            {"id": 1, "first_name": "John", "last_name": "Doe", "login": "enabled",
             "roles": ["Product"]},
            {"id": 2, "first_name": "Broken"}
        ]
    });
    let mock = server
        .mock("GET", "/people")
        .match_header("authorization", "Bearer tok")
        .match_header("forecast-account-id", "9876")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let client = ForecastClient::new(&forecast_config(&server.url()), TIMEOUT).unwrap();
    let people = client.people().await.unwrap();

    // The malformed record is skipped, not fatal.
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].display_key().as_deref(), Some("John D."));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_planner_credentials_not_sent_to_redirect_host() {
    let mut planner = Server::new_async().await;
    let mut elsewhere = Server::new_async().await;
    let hop = planner
        .mock("GET", "/people")
        .match_header("authorization", "Bearer tok")
        .with_status(302)
        .with_header("location", &format!("{}/people", elsewhere.url()))
        .create_async()
        .await;
    let landing = elsewhere
        .mock("GET", "/people")
        .match_header("authorization", Matcher::Missing)
        .match_header("forecast-account-id", Matcher::Missing)
        .with_status(200)
        .with_body(json!({"people": []}).to_string())
        .create_async()
        .await;

    let client = ForecastClient::new(&forecast_config(&planner.url()), TIMEOUT).unwrap();
    let people = client.people().await.unwrap();

    assert!(people.is_empty());
    hop.assert_async().await;
    landing.assert_async().await;
}

#[tokio::test]
async fn test_assignment_is_posted_as_json() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/assignments")
        .match_header("authorization", "Bearer tok")
        .match_header("forecast-account-id", "9876")
        .match_body(Matcher::PartialJson(json!({
            "assignment": {
                "start_date": "2024-01-08",
                "end_date": "2024-01-12",
                "project_id": "555",
                "person_id": "1"
            }
        })))
        .with_status(201)
        .with_body("{}")
        .create_async()
        .await;

    let assignment = Assignment {
        start_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
        end_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
        allocation: None,
        active_on_days_off: false,
        repeated_assignment_set_id: None,
        project_id: "555".to_string(),
        person_id: "1".to_string(),
        placeholder_id: None,
    };
    // A trailing slash on the base URL is tolerated.
    let url = format!("{}/", server.url());
    let client = ForecastClient::new(&forecast_config(&url), TIMEOUT).unwrap();
    client.create(&assignment).await.unwrap();

    mock.assert_async().await;
}

#[test]
fn test_invalid_token_is_rejected_up_front() {
    let mut config = forecast_config("http://127.0.0.1:1");
    config.token = "line\nbreak".to_string();
    assert!(ForecastClient::new(&config, TIMEOUT).is_err());
}

#[test]
fn test_resolve_location() {
    let base: http::Uri = "https://cal.example.com/share/abc?x=1".parse().unwrap();
    assert_eq!(
        resolve_location(&base, "/files/a.ics").unwrap().to_string(),
        "https://cal.example.com/files/a.ics"
    );
    assert_eq!(
        resolve_location(&base, "https://cdn.example.net/a.ics?sig=2")
            .unwrap()
            .to_string(),
        "https://cdn.example.net/a.ics?sig=2"
    );
}
