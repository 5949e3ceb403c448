use axum::body::{to_bytes, Body};
use axum::response::Response;
use chrono::{Duration, Local, NaiveDate};
use http::{header, Method, Request};
use serde_json::{json, Value};

use shared_database::Database;

pub const TEST_BASE_PATH: &str = "/appointments";

pub fn test_database() -> Database {
    Database::open_in_memory().expect("in-memory database opens")
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn days_from_today(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

pub struct TestPatient {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
}

impl Default for TestPatient {
    fn default() -> Self {
        Self {
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone: "+1234567890".to_string(),
            date_of_birth: "1990-05-15".to_string(),
        }
    }
}

impl TestPatient {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            ..Self::default()
        }
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = phone.to_string();
        self
    }

    pub fn payload(&self) -> Value {
        json!({
            "name": self.name,
            "email": self.email,
            "phone": self.phone,
            "date_of_birth": self.date_of_birth,
        })
    }
}

pub fn appointment_payload(patient_id: i64, date: NaiveDate, time: &str, reason: &str) -> Value {
    json!({
        "PatientId": patient_id,
        "AppointmentDate": date.format("%Y-%m-%d").to_string(),
        "AppointmentTime": time,
        "Reason": reason,
    })
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    raw_json_request(method, uri, &body.to_string())
}

/// Sends `body` verbatim, so it need not be valid JSON.
pub fn raw_json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub async fn read_json(response: Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body readable");
    serde_json::from_slice(&body).expect("response body is JSON")
}
