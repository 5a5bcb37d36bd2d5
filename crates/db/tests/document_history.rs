//! Integration tests for document CRUD and the version-recording rule.
//!
//! Exercises the repositories against a real database:
//! - Document creation records the initial `created` version atomically
//! - Saves classify changes (content beats title, no-op records nothing)
//! - Version lists come back newest-first with stable tie-breaking
//! - Restore overwrites the live row and always appends a `restored` row
//! - Deleting a document cascades to its versions
//! - Appends against a missing document fail loudly

use draftpad_core::identity::UserDirectory;
use draftpad_core::revision::ChangeKind;
use draftpad_db::models::document::{CreateDocument, SaveDocument};
use draftpad_db::models::document_version::NewDocumentVersion;
use draftpad_db::models::user::CreateUser;
use draftpad_db::repositories::{
    DocumentRepo, DocumentVersionRepo, PgUserDirectory, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, suffix: &str) -> i64 {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: format!("writer_{suffix}"),
            email: format!("writer_{suffix}@example.com"),
        },
    )
    .await
    .unwrap();
    user.id
}

fn new_document(title: &str, content: &str) -> CreateDocument {
    CreateDocument {
        title: title.to_string(),
        content: content.to_string(),
    }
}

fn save(title: &str, content: &str) -> SaveDocument {
    SaveDocument {
        title: title.to_string(),
        content: content.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_records_initial_version(pool: PgPool) {
    let user_id = create_user(&pool, "create").await;

    let (document, version) =
        DocumentRepo::create(&pool, user_id, &new_document("Draft", "<p>hi</p>"))
            .await
            .unwrap();

    assert_eq!(version.document_id, document.id);
    assert_eq!(version.change_kind().unwrap(), ChangeKind::Created);
    assert_eq!(version.title, "Draft");
    assert_eq!(version.content, "<p>hi</p>");

    // No document ever exists with zero versions.
    let count = DocumentVersionRepo::count_for_document(&pool, document.id)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

// ---------------------------------------------------------------------------
// Save classification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn content_change_records_content_modified(pool: PgPool) {
    let user_id = create_user(&pool, "content").await;
    let (document, _) = DocumentRepo::create(&pool, user_id, &new_document("Draft", ""))
        .await
        .unwrap();

    let outcome = DocumentRepo::save(&pool, document.id, user_id, &save("Draft", "<p>Hello</p>"))
        .await
        .unwrap()
        .unwrap();

    let version = outcome.version.expect("content change records a version");
    assert_eq!(version.change_kind().unwrap(), ChangeKind::ContentModified);
    assert_eq!(outcome.document.content, "<p>Hello</p>");
}

#[sqlx::test(migrations = "./migrations")]
async fn title_only_change_records_title_updated(pool: PgPool) {
    let user_id = create_user(&pool, "title").await;
    let (document, _) = DocumentRepo::create(&pool, user_id, &new_document("Draft", "<p>x</p>"))
        .await
        .unwrap();

    let outcome = DocumentRepo::save(&pool, document.id, user_id, &save("Final", "<p>x</p>"))
        .await
        .unwrap()
        .unwrap();

    let version = outcome.version.expect("title change records a version");
    assert_eq!(version.change_kind().unwrap(), ChangeKind::TitleUpdated);
}

#[sqlx::test(migrations = "./migrations")]
async fn simultaneous_change_prefers_content_modified(pool: PgPool) {
    let user_id = create_user(&pool, "both").await;
    let (document, _) = DocumentRepo::create(&pool, user_id, &new_document("Draft", "a"))
        .await
        .unwrap();

    let outcome = DocumentRepo::save(&pool, document.id, user_id, &save("Final", "b"))
        .await
        .unwrap()
        .unwrap();

    let version = outcome.version.unwrap();
    assert_eq!(version.change_kind().unwrap(), ChangeKind::ContentModified);
}

#[sqlx::test(migrations = "./migrations")]
async fn unchanged_save_records_nothing(pool: PgPool) {
    let user_id = create_user(&pool, "noop").await;
    let (document, _) = DocumentRepo::create(&pool, user_id, &new_document("Draft", "same"))
        .await
        .unwrap();

    let outcome = DocumentRepo::save(&pool, document.id, user_id, &save("Draft", "same"))
        .await
        .unwrap()
        .unwrap();

    assert!(outcome.version.is_none());
    let count = DocumentVersionRepo::count_for_document(&pool, document.id)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn save_missing_document_returns_none(pool: PgPool) {
    let user_id = create_user(&pool, "missing").await;
    let outcome = DocumentRepo::save(&pool, 999_999, user_id, &save("x", "y"))
        .await
        .unwrap();
    assert!(outcome.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn save_is_scoped_to_owner(pool: PgPool) {
    let owner = create_user(&pool, "owner").await;
    let stranger = create_user(&pool, "stranger").await;
    let (document, _) = DocumentRepo::create(&pool, owner, &new_document("Mine", ""))
        .await
        .unwrap();

    let outcome = DocumentRepo::save(&pool, document.id, stranger, &save("Taken", ""))
        .await
        .unwrap();
    assert!(outcome.is_none());

    let unchanged = DocumentRepo::find_by_id(&pool, document.id, owner)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.title, "Mine");
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn versions_list_newest_first(pool: PgPool) {
    let user_id = create_user(&pool, "order").await;
    let (document, _) = DocumentRepo::create(&pool, user_id, &new_document("Draft", "v0"))
        .await
        .unwrap();

    DocumentRepo::save(&pool, document.id, user_id, &save("Draft", "v1"))
        .await
        .unwrap();
    DocumentRepo::save(&pool, document.id, user_id, &save("Draft", "v2"))
        .await
        .unwrap();

    let versions = DocumentVersionRepo::list_by_document(&pool, document.id)
        .await
        .unwrap();

    assert_eq!(versions.len(), 3);
    assert_eq!(versions[0].content, "v2");
    assert_eq!(versions[1].content, "v1");
    assert_eq!(versions[2].content, "v0");
    // Insertion order is the tie-break: ids strictly descend.
    assert!(versions[0].id > versions[1].id && versions[1].id > versions[2].id);
}

#[sqlx::test(migrations = "./migrations")]
async fn documents_list_most_recently_updated_first(pool: PgPool) {
    let user_id = create_user(&pool, "doclist").await;
    let (first, _) = DocumentRepo::create(&pool, user_id, &new_document("First", ""))
        .await
        .unwrap();
    let (second, _) = DocumentRepo::create(&pool, user_id, &new_document("Second", ""))
        .await
        .unwrap();

    // Touching the first document moves it back to the top.
    DocumentRepo::save(&pool, first.id, user_id, &save("First", "updated"))
        .await
        .unwrap();

    let documents = DocumentRepo::list_for_user(&pool, user_id).await.unwrap();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].id, first.id);
    assert_eq!(documents[1].id, second.id);
}

// ---------------------------------------------------------------------------
// Restore
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn end_to_end_draft_scenario(pool: PgPool) {
    let user_id = create_user(&pool, "e2e").await;

    // Create "Draft" with empty content -> one `created` version.
    let (document, first_version) =
        DocumentRepo::create(&pool, user_id, &new_document("Draft", ""))
            .await
            .unwrap();
    assert_eq!(first_version.change_kind().unwrap(), ChangeKind::Created);

    // Edit content -> `content_modified`.
    let edited = DocumentRepo::save(&pool, document.id, user_id, &save("Draft", "Hello"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        edited.version.unwrap().change_kind().unwrap(),
        ChangeKind::ContentModified
    );

    // Rename with unchanged content -> `title_updated`.
    let renamed = DocumentRepo::save(&pool, document.id, user_id, &save("Final", "Hello"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        renamed.version.unwrap().change_kind().unwrap(),
        ChangeKind::TitleUpdated
    );

    // Restore to the first version -> title "Draft", content "", and a
    // fourth version tagged `restored` carrying the restored state.
    let snapshot = DocumentVersionRepo::find_by_id(&pool, first_version.id)
        .await
        .unwrap()
        .unwrap();
    let (restored_doc, restored_version) =
        DocumentRepo::restore_from_version(&pool, document.id, user_id, &snapshot)
            .await
            .unwrap()
            .unwrap();

    assert_eq!(restored_doc.title, "Draft");
    assert_eq!(restored_doc.content, "");
    assert_eq!(restored_version.change_kind().unwrap(), ChangeKind::Restored);
    assert_eq!(restored_version.title, "Draft");
    assert_eq!(restored_version.content, "");

    let versions = DocumentVersionRepo::list_by_document(&pool, document.id)
        .await
        .unwrap();
    assert_eq!(versions.len(), 4);
    assert_eq!(versions[0].change_type, "restored");
}

#[sqlx::test(migrations = "./migrations")]
async fn restore_always_appends_even_when_state_matches(pool: PgPool) {
    let user_id = create_user(&pool, "idem").await;
    let (document, created) = DocumentRepo::create(&pool, user_id, &new_document("Draft", "x"))
        .await
        .unwrap();

    // Restoring twice in a row leaves the document equal to the snapshot
    // after each call and appends exactly one `restored` version per call.
    for expected_count in [2, 3] {
        let (doc, _) = DocumentRepo::restore_from_version(&pool, document.id, user_id, &created)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.title, "Draft");
        assert_eq!(doc.content, "x");

        let count = DocumentVersionRepo::count_for_document(&pool, document.id)
            .await
            .unwrap();
        assert_eq!(count, expected_count);
    }
}

// ---------------------------------------------------------------------------
// Deletion and integrity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn deleting_a_document_cascades_to_versions(pool: PgPool) {
    let user_id = create_user(&pool, "cascade").await;
    let (document, _) = DocumentRepo::create(&pool, user_id, &new_document("Doomed", "x"))
        .await
        .unwrap();
    DocumentRepo::save(&pool, document.id, user_id, &save("Doomed", "y"))
        .await
        .unwrap();

    assert!(DocumentRepo::delete(&pool, document.id, user_id)
        .await
        .unwrap());

    let versions = DocumentVersionRepo::list_by_document(&pool, document.id)
        .await
        .unwrap();
    assert!(versions.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn append_to_missing_document_fails(pool: PgPool) {
    let user_id = create_user(&pool, "fk").await;

    let result = DocumentVersionRepo::append(
        &pool,
        &NewDocumentVersion {
            document_id: 424_242,
            title: "orphan".to_string(),
            content: String::new(),
            change: ChangeKind::ContentModified,
            user_id,
        },
    )
    .await;

    assert!(result.is_err(), "foreign key violation must propagate");
}

// ---------------------------------------------------------------------------
// Identity lookup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn directory_resolves_emails_with_fallback(pool: PgPool) {
    let user_id = create_user(&pool, "dir").await;
    let directory = PgUserDirectory::new(pool.clone());

    assert_eq!(
        directory.email_for(user_id).await.as_deref(),
        Some("writer_dir@example.com")
    );
    assert_eq!(directory.email_for(987_654).await, None);
}
