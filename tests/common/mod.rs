#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use oauth_kv_storage::{AccessData, AuthorizeData, Client};
use serde_json::json;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2015, 1, 1, 12, 12, 12).unwrap()
}

pub fn client() -> Client {
    Client {
        id: "client_id".to_string(),
        secret: "client_secret".to_string(),
        redirect_uri: "http://some.redirect.here".to_string(),
        user_data: json!("foobar"),
    }
}

pub fn authorize_data(code: &str, expires_in: u32) -> AuthorizeData {
    AuthorizeData {
        client: client(),
        code: code.to_string(),
        expires_in,
        scope: "scope.foo.read".to_string(),
        redirect_uri: "http://redirect.me".to_string(),
        state: "state.foo".to_string(),
        created_at: created_at(),
        user_data: json!("foodata"),
        code_challenge: String::new(),
        code_challenge_method: String::new(),
    }
}

/// Previous access data in the rotation chain, stored under the refresh token.
pub fn refresh_data() -> AccessData {
    AccessData {
        client: client(),
        authorize_data: Some(Box::new(AuthorizeData {
            expires_in: 1234,
            user_data: json!("refreshfoodata"),
            ..authorize_data("refreshfoo", 1234)
        })),
        access_data: None,
        access_token: "refreshfootookeeen".to_string(),
        refresh_token: String::new(),
        expires_in: 1000,
        scope: "scope.foo.read".to_string(),
        redirect_uri: "http://redirect.me".to_string(),
        created_at: created_at(),
        user_data: json!("refreshfoodata"),
    }
}

pub fn access_data(expires_in: u32) -> AccessData {
    AccessData {
        client: client(),
        authorize_data: Some(Box::new(authorize_data("foo", 1000))),
        access_data: Some(Box::new(refresh_data())),
        access_token: "footookeeen".to_string(),
        refresh_token: "refreshfootookeeen".to_string(),
        expires_in,
        scope: "scope.foo.read".to_string(),
        redirect_uri: "http://redirect.me".to_string(),
        created_at: created_at(),
        user_data: json!({ "user": "accessfoodata", "roles": ["reader"] }),
    }
}
