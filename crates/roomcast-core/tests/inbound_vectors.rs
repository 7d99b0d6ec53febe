//! Inbound frame vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use roomcast_core::protocol::{decode_client_event, ClientEvent};

use vector_loader::load;

#[test]
fn inbound_vectors() {
    let files = [
        "set_user_ok.json",
        "set_user_not_string.json",
        "chatroom_structured.json",
        "chatroom_null.json",
        "chatroom_missing_data.json",
        "unknown_event.json",
        "unknown_field.json",
        "not_json.json",
    ];

    for f in files {
        let v = load(f);
        let res = decode_client_event(&v.frame);

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.client_code().as_str(), err.code, "vector={}", v.description);
            continue;
        }

        let ev = res.expect("expected ok event");
        let ex = v.expect.expect("missing expect block");
        assert_eq!(ev.name(), ex["event"].as_str().unwrap(), "vector={}", v.description);

        match ev {
            ClientEvent::SetUser { name } => {
                assert_eq!(name, ex["name"].as_str().unwrap(), "vector={}", v.description);
            }
            ClientEvent::Chatroom { message } => {
                assert_eq!(message.get(), ex["message_raw"].as_str().unwrap(), "vector={}", v.description);
            }
        }
    }
}
