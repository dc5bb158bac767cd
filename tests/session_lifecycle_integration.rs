//! Integration tests for whole-session deletion and orphan sweeps.
//!
//! Mail is sent through the application handlers into the in-memory mail
//! store, with attachments written to a real directory tree by the local
//! blob store.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use raven::adapters::events::EventBus;
use raven::adapters::memory::{InMemoryMailStore, RECIPIENTS_TABLE};
use raven::adapters::storage::{LocalBlobStorage, LocalDocumentStorage};
use raven::application::{
    orphan_sessions, Notifier, SendMailCommand, SendMailHandler, SessionLifecycleManager,
    UploadedFile,
};
use raven::domain::foundation::{SessionId, UserId};
use raven::domain::mail::NewMail;
use raven::ports::{DocumentStorage, SessionStore};
use tempfile::TempDir;

struct Fixture {
    store: Arc<InMemoryMailStore>,
    uploads: TempDir,
    docs: TempDir,
    sender: SendMailHandler,
    lifecycle: SessionLifecycleManager,
    documents: Arc<LocalDocumentStorage>,
}

fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

fn fixture() -> Fixture {
    let store = Arc::new(InMemoryMailStore::new());
    let uploads = tempfile::tempdir().unwrap();
    let docs = tempfile::tempdir().unwrap();
    let blobs = Arc::new(LocalBlobStorage::new(uploads.path()));
    let documents = Arc::new(LocalDocumentStorage::new(docs.path()));
    let bus = Arc::new(EventBus::default());

    Fixture {
        sender: SendMailHandler::new(store.clone(), blobs.clone(), Notifier::new(bus)),
        lifecycle: SessionLifecycleManager::new(store.clone(), blobs, documents.clone()),
        store,
        uploads,
        docs,
        documents,
    }
}

fn new_mail(session: &str, to: &[&str], cc: &[&str]) -> NewMail {
    NewMail {
        session_id: SessionId::new(session),
        sender_id: user("alice"),
        subject: "subject".into(),
        content: "content".into(),
        content_type: String::new(),
        to: to.iter().map(|u| user(u)).collect(),
        cc: cc.iter().map(|u| user(u)).collect(),
        bcc: vec![],
        parent_id: None,
    }
}

/// Three mails with five recipient links and two attachments in `s1`,
/// plus one mail in `s2`.
async fn seed(f: &Fixture) {
    let files = vec![
        UploadedFile::new("plan.txt", "text/plain", b"plan".to_vec()),
        UploadedFile::new("budget.csv", "text/csv", b"a,b".to_vec()),
    ];
    let commands = vec![
        SendMailCommand {
            mail: new_mail("s1", &["bob", "carol"], &[]),
            files,
        },
        SendMailCommand {
            mail: new_mail("s1", &["bob"], &["dave"]),
            files: vec![],
        },
        SendMailCommand {
            mail: new_mail("s1", &["erin"], &[]),
            files: vec![],
        },
        SendMailCommand {
            mail: new_mail("s2", &["bob"], &[]),
            files: vec![UploadedFile::new("other.txt", "text/plain", b"x".to_vec())],
        },
    ];
    for cmd in commands {
        f.sender.handle(cmd).await.unwrap();
    }
}

fn count_files(dir: &Path) -> usize {
    if !dir.exists() {
        return 0;
    }
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let path = entry.unwrap().path();
            if path.is_dir() {
                count_files(&path)
            } else {
                1
            }
        })
        .sum()
}

#[tokio::test]
async fn session_rows_are_removed_in_one_unit() {
    let f = fixture();
    seed(&f).await;

    let deleted = f
        .store
        .delete_session_rows(&SessionId::new("s1"))
        .await
        .unwrap();

    assert_eq!(deleted.mails, 3);
    assert_eq!(deleted.recipients, 5);
    assert_eq!(deleted.attachments, 2);
    assert_eq!(deleted.chat_messages, 0);
    assert_eq!(deleted.total(), 10);
}

#[tokio::test]
async fn delete_session_removes_rows_blobs_and_documents() {
    let f = fixture();
    seed(&f).await;
    f.documents
        .save(&SessionId::new("s1"), "minutes", b"docx")
        .await
        .unwrap();
    let s1_uploads = f.uploads.path().join("s1");
    assert_eq!(count_files(&s1_uploads), 2);

    f.lifecycle
        .delete_session(&SessionId::new("s1"))
        .await
        .unwrap();

    assert_eq!(f.store.row_count(&SessionId::new("s1")), 0);
    assert!(!s1_uploads.exists());
    assert!(!f.docs.path().join("s1").exists());

    assert!(f.store.row_count(&SessionId::new("s2")) > 0);
    assert_eq!(count_files(&f.uploads.path().join("s2")), 1);
}

#[tokio::test]
async fn default_session_is_never_deleted() {
    let f = fixture();
    f.sender
        .handle(SendMailCommand {
            mail: new_mail("default", &["bob"], &[]),
            files: vec![UploadedFile::new("keep.txt", "text/plain", b"k".to_vec())],
        })
        .await
        .unwrap();
    let before = f.store.row_count(&SessionId::default_session());

    f.lifecycle
        .delete_session(&SessionId::default_session())
        .await
        .unwrap();
    f.lifecycle.delete_session(&SessionId::new("")).await.unwrap();

    assert_eq!(f.store.row_count(&SessionId::default_session()), before);
    assert_eq!(count_files(&f.uploads.path().join("default")), 1);
}

#[tokio::test]
async fn failed_row_deletion_leaves_everything_in_place() {
    let f = fixture();
    seed(&f).await;
    let before = f.store.row_count(&SessionId::new("s1"));
    f.store.fail_deletes_on_table(Some(RECIPIENTS_TABLE));

    let result = f.lifecycle.delete_session(&SessionId::new("s1")).await;

    assert!(result.is_err());
    assert_eq!(f.store.row_count(&SessionId::new("s1")), before);
    assert_eq!(count_files(&f.uploads.path().join("s1")), 2);
}

#[tokio::test]
async fn sync_removes_orphans_once() {
    let f = fixture();
    seed(&f).await;
    let active = vec![SessionId::new("s2")];

    let first = f.lifecycle.sync_sessions(active.clone()).await.unwrap();
    let second = f.lifecycle.sync_sessions(active).await.unwrap();

    assert_eq!(first, 1);
    assert_eq!(second, 0);
    assert_eq!(f.store.row_count(&SessionId::new("s1")), 0);
    assert!(f.store.row_count(&SessionId::new("s2")) > 0);
}

#[tokio::test]
async fn sync_continues_past_a_failing_session() {
    let f = fixture();
    seed(&f).await;
    f.store.fail_delete_of(SessionId::new("s1"));

    let deleted = f.lifecycle.sync_sessions(Vec::new()).await.unwrap();

    assert_eq!(deleted, 1);
    assert!(f.store.row_count(&SessionId::new("s1")) > 0);
    assert_eq!(f.store.row_count(&SessionId::new("s2")), 0);
}

#[tokio::test]
async fn orphans_match_stored_sessions_missing_from_active() {
    let f = fixture();
    seed(&f).await;
    let stored = f.store.session_ids().await.unwrap();
    let active: BTreeSet<SessionId> = [SessionId::new("s2"), SessionId::new("s9")].into();

    let orphans = orphan_sessions(&stored, &active);

    let expected: BTreeSet<SessionId> = [SessionId::new("s1")].into();
    assert_eq!(orphans, expected);
}
