// Host-side tests for session identity, configuration and the Firebase wire
// formats.

use folio_core::config::{ENV_API_KEY, ENV_APP_ID, ENV_PROJECT_ID};
use folio_core::firebase::{
    auto_id, commit_body, commit_url, decode_list_page, decode_sign_up, encode_query_component,
    list_url, sign_up_url,
};
use folio_core::{
    AuthUser, Backend, BuildProfile, CollectionPath, ConfigError, FirebaseConfig, IdentitySource,
    NewMessage, SessionContext, Timestamp, UserId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn full_env(name: &'static str) -> Option<String> {
    Some(match name {
        ENV_API_KEY => "key-123".to_string(),
        ENV_PROJECT_ID => "folio-prod".to_string(),
        ENV_APP_ID => "1:42:web:abc".to_string(),
        other => format!("value-for-{other}"),
    })
}

#[test]
fn signed_in_user_becomes_identity() {
    let mut rng = StdRng::seed_from_u64(1);
    let auth: Result<_, String> = Ok(Some(AuthUser {
        uid: "uid-42".into(),
        id_token: None,
    }));
    let s = SessionContext::resolve(auth, &mut rng);
    assert_eq!(s.user_id().as_str(), "uid-42");
    assert_eq!(s.source(), IdentitySource::Anonymous);
}

#[test]
fn auth_failure_falls_back_to_local_uuid() {
    let mut rng = StdRng::seed_from_u64(1);
    let s = SessionContext::resolve(Err::<Option<AuthUser>, _>("network down"), &mut rng);
    assert_eq!(s.source(), IdentitySource::LocalFallback);
    let id = s.user_id().as_str();
    assert_eq!(id.len(), 36);
    assert_eq!(id.as_bytes()[14], b'4');
    assert!(matches!(id.as_bytes()[19], b'8' | b'9' | b'a' | b'b'));
    let parsed = uuid::Uuid::parse_str(id).unwrap();
    assert_eq!(parsed.get_version_num(), 4);
    assert_eq!(parsed.to_string(), id);

    let none = SessionContext::resolve(Ok::<_, String>(None), &mut rng);
    assert_eq!(none.source(), IdentitySource::LocalFallback);
}

#[test]
fn local_ids_follow_the_rng() {
    let a = SessionContext::local(&mut StdRng::seed_from_u64(8));
    let b = SessionContext::local(&mut StdRng::seed_from_u64(8));
    let c = SessionContext::local(&mut StdRng::seed_from_u64(9));
    assert_eq!(a.user_id(), b.user_id());
    assert_ne!(a.user_id(), c.user_id());
}

#[test]
fn identity_is_stable_for_the_session() {
    let s = SessionContext::local(&mut StdRng::seed_from_u64(3));
    let first = s.user_id().clone();
    let second = s.user_id().clone();
    assert_eq!(first, second);
}

#[test]
fn complete_config_uses_firebase() {
    let backend = FirebaseConfig::resolve(full_env, BuildProfile::Release).unwrap();
    match backend {
        Backend::Firebase(c) => {
            assert_eq!(c.api_key, "key-123");
            assert_eq!(c.app_id, "1:42:web:abc");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn missing_config_uses_placeholder_in_development() {
    let backend = FirebaseConfig::resolve(|_| None, BuildProfile::Development).unwrap();
    assert_eq!(backend, Backend::Placeholder(FirebaseConfig::placeholder()));
    assert_eq!(backend.config().project_id, "dummy-project");
}

#[test]
fn missing_config_is_an_error_in_release() {
    let lookup = |name: &'static str| {
        if name == ENV_APP_ID {
            Some("  ".to_string())
        } else {
            full_env(name)
        }
    };
    let err = FirebaseConfig::resolve(lookup, BuildProfile::Release).unwrap_err();
    assert_eq!(err, ConfigError::Missing(vec![ENV_APP_ID]));
    assert!(err.to_string().contains("FIREBASE_APP_ID"));
}

#[test]
fn guestbook_path_is_scoped_by_app_id() {
    let p = CollectionPath::guestbook("1:42:web:abc");
    assert_eq!(p.as_str(), "/artifacts/1:42:web:abc/public/data/guestbook");
    assert_eq!(p.segments().count(), 5);
}

#[test]
fn urls_target_project_and_key() {
    let Backend::Firebase(c) = FirebaseConfig::resolve(full_env, BuildProfile::Release).unwrap()
    else {
        panic!("expected firebase backend");
    };
    let path = CollectionPath::guestbook(&c.app_id);
    assert_eq!(
        sign_up_url(&c),
        "https://identitytoolkit.googleapis.com/v1/accounts:signUp?key=key-123"
    );
    assert_eq!(
        list_url(&c, &path, Some("a+b/c=")),
        "https://firestore.googleapis.com/v1/projects/folio-prod/databases/(default)/documents/artifacts/1:42:web:abc/public/data/guestbook?pageSize=300&pageToken=a%2Bb%2Fc%3D"
    );
    assert_eq!(
        commit_url(&c),
        "https://firestore.googleapis.com/v1/projects/folio-prod/databases/(default)/documents:commit"
    );
}

#[test]
fn commit_body_sets_server_timestamp() {
    let c = FirebaseConfig::placeholder();
    let path = CollectionPath::guestbook(&c.app_id);
    let body = commit_body(
        &c,
        &path,
        "DOC1",
        &NewMessage {
            message: "hello".into(),
            user_id: UserId::new("u-1"),
        },
    );
    let write = &body["writes"][0];
    assert_eq!(
        write["update"]["name"],
        "projects/dummy-project/databases/(default)/documents/artifacts/1:123456789012:web:abc123def456/public/data/guestbook/DOC1"
    );
    assert_eq!(write["update"]["fields"]["message"]["stringValue"], "hello");
    assert_eq!(write["update"]["fields"]["userId"]["stringValue"], "u-1");
    assert_eq!(write["updateTransforms"][0]["fieldPath"], "timestamp");
    assert_eq!(write["updateTransforms"][0]["setToServerValue"], "REQUEST_TIME");
}

#[test]
fn list_page_decodes_and_skips_foreign_documents() {
    let body = r#"{
      "documents": [
        {"name": "projects/p/databases/(default)/documents/artifacts/a/public/data/guestbook/one",
         "fields": {"message": {"stringValue": "hello"},
                    "userId": {"stringValue": "abcdefghij"},
                    "timestamp": {"timestampValue": "2024-05-01T10:00:00.250Z"}},
         "createTime": "2024-05-01T10:00:00.250Z"},
        {"name": "projects/p/databases/(default)/documents/artifacts/a/public/data/guestbook/two",
         "fields": {"message": {"stringValue": "no author"}}},
        {"name": "projects/p/databases/(default)/documents/artifacts/a/public/data/guestbook/junk",
         "fields": {"other": {"integerValue": "1"}}}
      ],
      "nextPageToken": "tok"
    }"#;
    let (messages, next) = decode_list_page(body).unwrap();
    assert_eq!(next.as_deref(), Some("tok"));
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].id, "one");
    assert_eq!(
        messages[0].timestamp,
        Some(Timestamp::parse_rfc3339("2024-05-01T10:00:00.250Z").unwrap())
    );
    assert_eq!(messages[1].user_id, None);
    assert_eq!(messages[1].author_label(), "Unknown");
    assert_eq!(messages[1].timestamp, None);
}

#[test]
fn empty_collection_decodes_to_empty_snapshot() {
    let (messages, next) = decode_list_page("{}").unwrap();
    assert!(messages.is_empty());
    assert!(next.is_none());
    assert!(decode_list_page("not json").is_err());
}

#[test]
fn sign_up_response_decodes() {
    let r = decode_sign_up(r#"{"kind":"x","localId":"uid-7","idToken":"tok","expiresIn":"3600"}"#)
        .unwrap();
    assert_eq!(r.local_id, "uid-7");
    assert_eq!(r.id_token.as_deref(), Some("tok"));
}

#[test]
fn auto_ids_are_twenty_alphanumerics() {
    let mut rng = StdRng::seed_from_u64(5);
    let a = auto_id(&mut rng);
    let b = auto_id(&mut rng);
    assert_eq!(a.len(), 20);
    assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(a, b);
}

#[test]
fn query_encoding_keeps_unreserved() {
    assert_eq!(encode_query_component("AZaz09-_.~"), "AZaz09-_.~");
    assert_eq!(encode_query_component("a b&c"), "a%20b%26c");
}
