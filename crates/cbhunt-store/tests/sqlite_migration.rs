//! End-to-end: legacy JSON file into a fresh SQLite database.

use cbhunt_core::{Case, CollectionKind};
use cbhunt_store::{CollectionStore, LegacyFileStore, SqliteStore, STORAGE_KEY};

fn legacy_envelope() -> String {
    serde_json::json!({
        "version": 0,
        "notebooks": [
            {
                "id": 7,
                "name": "旧笔记",
                "cases": [
                    {
                        "projectName": "瑞幸 x 茅台",
                        "brandName": "瑞幸",
                        "partnerIntro": "茅台",
                        "productName": "酱香拿铁",
                        "date": "2023.09.04",
                        "imageUrl": "https://img.example/a.png",
                        "rights": [{ "title": "杯套", "description": "红色" }],
                        "insight": "跨界",
                        "platformSource": "微博",
                        "sourceUrls": []
                    }
                ],
                "createdAt": 1,
                "updatedAt": 2
            }
        ],
        "activeNotebookId": 7
    })
    .to_string()
}

#[tokio::test]
async fn legacy_file_is_migrated_into_sqlite_and_removed() {
    let dir = tempfile::tempdir().unwrap();
    let db_url = format!("sqlite://{}", dir.path().join("cbhunt.db").display());
    let legacy_path = dir.path().join("legacy.json");
    let mut file = serde_json::Map::new();
    file.insert(STORAGE_KEY.to_string(), legacy_envelope().into());
    std::fs::write(&legacy_path, serde_json::Value::Object(file).to_string()).unwrap();

    let legacy = LegacyFileStore::new(&legacy_path);
    let backend = SqliteStore::connect(&db_url).await.unwrap();
    let store = CollectionStore::open(backend, Some(&legacy)).await.unwrap();

    assert!(!legacy_path.exists(), "legacy copy should be discarded");
    let active = store.active().expect("active collection");
    assert_eq!(active.id, "7");
    assert_eq!(active.name, "旧笔记");
    assert_eq!(
        active.cases[0].key_visual_url.as_deref(),
        Some("https://img.example/a.png")
    );
}

#[tokio::test]
async fn changes_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_url = format!("sqlite://{}", dir.path().join("cbhunt.db").display());

    let id = {
        let backend = SqliteStore::connect(&db_url).await.unwrap();
        let mut store = CollectionStore::open(backend, None).await.unwrap();
        let id = store
            .create(CollectionKind::Notebook, Some("Tea"))
            .await
            .unwrap();
        store
            .add_manual_case(
                &id,
                Case {
                    project_name: "喜茶 x FENDI".to_string(),
                    ..Case::default()
                },
            )
            .await
            .unwrap();
        id
    };

    let backend = SqliteStore::connect(&db_url).await.unwrap();
    let store = CollectionStore::open(backend, None).await.unwrap();
    assert_eq!(store.active_id(), Some(id.as_str()));
    let tea = store.get(&id).unwrap();
    assert_eq!(tea.cases.len(), 1);
    assert_eq!(tea.cases[0].project_name, "喜茶 x FENDI");
}
