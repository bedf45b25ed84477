use daybook::components::meeting_store::{
    InMemoryMeetingStore, MeetingFilter, MeetingStore, NewMeeting, SqliteMeetingStore,
    DEFAULT_CATEGORY,
};
use daybook::error::Error;

fn sample(n: usize) -> NewMeeting {
    NewMeeting {
        title: format!("Weekly sync {}", n),
        original_content: format!("raw notes {}", n),
        summarized_content: format!("formatted minutes {}", n),
        category: None,
        tags: None,
    }
}

/// Omitted category lands as the default in both store backends
#[tokio::test]
async fn test_default_category() {
    let stores: Vec<Box<dyn MeetingStore>> = vec![
        Box::new(InMemoryMeetingStore::default()),
        Box::new(SqliteMeetingStore::open_in_memory().unwrap()),
    ];

    for store in stores {
        let record = store.create(sample(1)).await.unwrap();
        assert_eq!(record.category, DEFAULT_CATEGORY);
        assert_eq!(record.tags, None);
        assert!(record.updated_at.is_none());
    }
}

/// Listings come back newest first
#[tokio::test]
async fn test_listing_is_newest_first() {
    let store = SqliteMeetingStore::open_in_memory().unwrap();

    for n in 1..=3 {
        store.create(sample(n)).await.unwrap();
    }

    let filter = MeetingFilter::default();
    let meetings = store.list(0, 10, &filter).await.unwrap();

    assert_eq!(meetings.len(), 3);
    assert_eq!(meetings[0].title, "Weekly sync 3");
    assert_eq!(meetings[2].title, "Weekly sync 1");
}

/// Skip and limit slice the listing without touching the total count
#[tokio::test]
async fn test_pagination_window() {
    let store = SqliteMeetingStore::open_in_memory().unwrap();

    for n in 1..=12 {
        store.create(sample(n)).await.unwrap();
    }

    let filter = MeetingFilter::default();
    assert_eq!(store.count(&filter).await.unwrap(), 12);

    let first_page = store.list(0, 9, &filter).await.unwrap();
    assert_eq!(first_page.len(), 9);
    assert_eq!(first_page[0].title, "Weekly sync 12");

    let last_page = store.list(9, 9, &filter).await.unwrap();
    assert_eq!(last_page.len(), 3);
    assert_eq!(last_page[2].title, "Weekly sync 1");
}

/// Category and tag filters narrow both the listing and the count
#[tokio::test]
async fn test_filters() {
    let store = SqliteMeetingStore::open_in_memory().unwrap();

    store
        .create(NewMeeting {
            category: Some("planning".to_string()),
            tags: Some("roadmap,q3".to_string()),
            ..sample(1)
        })
        .await
        .unwrap();
    store
        .create(NewMeeting {
            category: Some("planning".to_string()),
            tags: Some("budget".to_string()),
            ..sample(2)
        })
        .await
        .unwrap();
    store.create(sample(3)).await.unwrap();

    let by_category = MeetingFilter {
        category: Some("planning".to_string()),
        tag: None,
    };
    assert_eq!(store.count(&by_category).await.unwrap(), 2);

    let by_tag = MeetingFilter {
        category: None,
        tag: Some("roadmap".to_string()),
    };
    let tagged = store.list(0, 10, &by_tag).await.unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].title, "Weekly sync 1");

    let combined = MeetingFilter {
        category: Some("planning".to_string()),
        tag: Some("budget".to_string()),
    };
    assert_eq!(store.count(&combined).await.unwrap(), 1);
}

/// Fetching a stored record round-trips its content
#[tokio::test]
async fn test_get_round_trip() {
    let store = SqliteMeetingStore::open_in_memory().unwrap();

    let created = store.create(sample(7)).await.unwrap();
    let fetched = store.get(created.id).await.unwrap();

    assert_eq!(fetched.title, created.title);
    assert_eq!(fetched.original_content, "raw notes 7");
    assert_eq!(fetched.summarized_content, "formatted minutes 7");
    assert_eq!(fetched.created_at, created.created_at);
}

/// Missing ids answer with a not-found error on both get and delete
#[tokio::test]
async fn test_missing_record() {
    let store = SqliteMeetingStore::open_in_memory().unwrap();

    assert!(matches!(store.get(42).await, Err(Error::NotFound(_))));
    assert!(matches!(store.delete(42).await, Err(Error::NotFound(_))));
}

/// Deleting removes exactly the addressed record
#[tokio::test]
async fn test_delete() {
    let store = InMemoryMeetingStore::default();

    let first = store.create(sample(1)).await.unwrap();
    let second = store.create(sample(2)).await.unwrap();

    store.delete(first.id).await.unwrap();

    let filter = MeetingFilter::default();
    assert_eq!(store.count(&filter).await.unwrap(), 1);
    assert!(store.get(second.id).await.is_ok());
    assert!(matches!(store.get(first.id).await, Err(Error::NotFound(_))));
}
