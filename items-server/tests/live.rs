//! Items API over real HTTP.
//!
//! # Design
//! Starts the server on a random port in a background runtime, then drives
//! it with the blocking ureq client, the same way any external client would
//! see it.

use items_server::ServerConfig;
use memstore::Entity;
use serde_json::Value;

struct Reply {
    status: u16,
    body: String,
}

fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

fn get(url: &str) -> Reply {
    let mut response = agent().get(url).call().expect("HTTP transport error");
    Reply {
        status: response.status().as_u16(),
        body: response.body_mut().read_to_string().unwrap_or_default(),
    }
}

fn post(url: &str, body: &str) -> Reply {
    let mut response = agent()
        .post(url)
        .content_type("application/json")
        .send(body.as_bytes())
        .expect("HTTP transport error");
    Reply {
        status: response.status().as_u16(),
        body: response.body_mut().read_to_string().unwrap_or_default(),
    }
}

fn patch(url: &str, body: &str) -> Reply {
    let mut response = agent()
        .patch(url)
        .content_type("application/json")
        .send(body.as_bytes())
        .expect("HTTP transport error");
    Reply {
        status: response.status().as_u16(),
        body: response.body_mut().read_to_string().unwrap_or_default(),
    }
}

fn delete(url: &str) -> Reply {
    let mut response = agent().delete(url).call().expect("HTTP transport error");
    Reply {
        status: response.status().as_u16(),
        body: response.body_mut().read_to_string().unwrap_or_default(),
    }
}

/// Spawn the server on an OS-assigned port, returning the items base URL.
fn spawn_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let config = ServerConfig::default();
    let base = format!("http://{addr}{}", config.base_path);

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            items_server::run(listener, config).await
        })
        .unwrap();
    });

    base
}

#[test]
fn crud_over_http() {
    let base = spawn_server();

    // Step 1: empty list.
    let reply = get(&base);
    assert_eq!(reply.status, 200);
    let items: Vec<Entity> = serde_json::from_str(&reply.body).unwrap();
    assert!(items.is_empty(), "expected empty list");

    // Step 2: invalid create is rejected with a JSON string.
    let reply = post(&base, r#"{"name":"name"}"#);
    assert_eq!(reply.status, 422);
    let message: Value = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(message, Value::String("title is required".into()));

    // Step 3: create.
    let reply = post(&base, r#"{"title":"live item"}"#);
    assert_eq!(reply.status, 201);
    let created: Entity = serde_json::from_str(&reply.body).unwrap();

    // Step 4: patch.
    let reply = patch(&format!("{base}/{}", created.key), r#"{"completed":true}"#);
    assert_eq!(reply.status, 200);
    let updated: Entity = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(updated.get("completed"), Some(&Value::Bool(true)));

    // Step 5: list has the updated item.
    let reply = get(&base);
    let items: Vec<Entity> = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(items, vec![updated]);

    // Step 6: delete, twice.
    let reply = delete(&format!("{base}/{}", created.key));
    assert_eq!(reply.status, 204);
    assert!(reply.body.is_empty());
    let reply = delete(&format!("{base}/{}", created.key));
    assert_eq!(reply.status, 204);

    // Step 7: gone.
    let reply = get(&format!("{base}/{}", created.key));
    assert_eq!(reply.status, 404);
}
