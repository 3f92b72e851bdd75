use clientbook_core::{ClientFilter, ClientPatch, ContactStore, NewClient, StoreError};

#[test]
fn operations_after_close_fail_with_closed() {
    let mut store = ContactStore::open_in_memory().unwrap();
    assert!(store.is_open());

    store.close().unwrap();
    assert!(!store.is_open());

    let err = store
        .add_client(&NewClient::new("Olya", "Ivanova", "olya@example.com"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Closed));

    let err = store.find_client(&ClientFilter::by_name("Olya")).unwrap_err();
    assert!(matches!(err, StoreError::Closed));

    let err = store.update_info(1, &ClientPatch::default()).unwrap_err();
    assert!(matches!(err, StoreError::Closed));
}

#[test]
fn double_close_fails_with_closed() {
    let mut store = ContactStore::open_in_memory().unwrap();

    store.close().unwrap();
    let err = store.close().unwrap_err();
    assert!(matches!(err, StoreError::Closed));
}

#[test]
fn file_backed_store_persists_between_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clientbook.db");

    let mut store = ContactStore::open(&path).unwrap();
    let id = store
        .add_client(&NewClient::new("Olya", "Ivanova", "olya@example.com"))
        .unwrap();
    store.close().unwrap();

    let mut reopened = ContactStore::open(&path).unwrap();
    assert_eq!(
        reopened
            .find_client(&ClientFilter::by_email("olya@example.com"))
            .unwrap(),
        Some(id)
    );
}

// End-to-end scenario: create a client with a phone, resolve ownership by
// number, delete the client, and verify no attribute finds it afterwards.
#[test]
fn create_find_delete_scenario() {
    let mut store = ContactStore::open_in_memory().unwrap();

    let id = store
        .add_client(&NewClient::new("Rin", "Hirst", "qwerty@gmail.com").with_phone_number("7894743"))
        .unwrap();

    assert_eq!(
        store
            .find_client(&ClientFilter::by_phone_number("7894743"))
            .unwrap(),
        Some(id)
    );

    store.delete_client(id).unwrap();

    assert_eq!(
        store
            .find_client(&ClientFilter::by_email("qwerty@gmail.com"))
            .unwrap(),
        None
    );
    assert_eq!(
        store.find_client(&ClientFilter::by_name("Rin")).unwrap(),
        None
    );
    assert_eq!(
        store
            .find_client(&ClientFilter::by_phone_number("7894743"))
            .unwrap(),
        None
    );
}
