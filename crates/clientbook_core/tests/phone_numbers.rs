use clientbook_core::{ClientFilter, ContactStore, NewClient, StoreError};

#[test]
fn add_phone_number_then_find_owner_by_number() {
    let mut store = ContactStore::open_in_memory().unwrap();

    let id = store
        .add_client(&NewClient::new("Olya", "Ivanova", "olya@example.com"))
        .unwrap();
    store.add_phone_number(id, "932737237").unwrap();

    assert_eq!(
        store
            .find_client(&ClientFilter::by_phone_number("932737237"))
            .unwrap(),
        Some(id)
    );
}

#[test]
fn add_phone_number_for_missing_client_fails_and_creates_no_row() {
    let mut store = ContactStore::open_in_memory().unwrap();

    let err = store.add_phone_number(4242, "932737237").unwrap_err();
    assert!(matches!(err, StoreError::ForeignKey { .. }));

    assert_eq!(
        store
            .find_client(&ClientFilter::by_phone_number("932737237"))
            .unwrap(),
        None
    );
    assert_eq!(store.delete_phone_number("932737237").unwrap(), 0);
}

#[test]
fn failed_add_client_with_phone_leaves_no_phone_row() {
    let mut store = ContactStore::open_in_memory().unwrap();

    store
        .add_client(&NewClient::new("Olya", "Ivanova", "olya@example.com"))
        .unwrap();

    // Same email, so the client insert fails; the phone insert shares the
    // transaction and must not leave a row behind.
    let err = store
        .add_client(&NewClient::new("Other", "Person", "olya@example.com").with_phone_number("000"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Constraint { .. }));

    assert_eq!(
        store.find_client(&ClientFilter::by_phone_number("000")).unwrap(),
        None
    );
}

#[test]
fn client_can_own_many_numbers() {
    let mut store = ContactStore::open_in_memory().unwrap();

    let id = store
        .add_client(&NewClient::new("Olya", "Ivanova", "olya@example.com").with_phone_number("111"))
        .unwrap();
    store.add_phone_number(id, "222").unwrap();
    store.add_phone_number(id, "333").unwrap();

    let numbers = store.phone_numbers(id).unwrap();
    let values: Vec<&str> = numbers.iter().map(|n| n.phone_number.as_str()).collect();
    assert_eq!(values, ["111", "222", "333"]);
    assert!(numbers.iter().all(|n| n.client_id == id));
}

#[test]
fn delete_phone_number_removes_every_match_across_owners() {
    let mut store = ContactStore::open_in_memory().unwrap();

    // Numbers are free text without a uniqueness invariant, so the same
    // value may exist under different owners.
    let first = store
        .add_client(&NewClient::new("Olya", "Ivanova", "olya@example.com").with_phone_number("555"))
        .unwrap();
    let second = store
        .add_client(&NewClient::new("Tom", "Smith", "tom@example.com").with_phone_number("555"))
        .unwrap();
    store.add_phone_number(first, "777").unwrap();

    assert_eq!(store.delete_phone_number("555").unwrap(), 2);

    assert_eq!(
        store.find_client(&ClientFilter::by_phone_number("555")).unwrap(),
        None
    );
    assert_eq!(
        store.find_client(&ClientFilter::by_phone_number("777")).unwrap(),
        Some(first)
    );
    assert!(store.phone_numbers(second).unwrap().is_empty());
}

#[test]
fn shared_number_resolves_to_lowest_owner_id_first() {
    let mut store = ContactStore::open_in_memory().unwrap();

    let first = store
        .add_client(&NewClient::new("Olya", "Ivanova", "olya@example.com").with_phone_number("888"))
        .unwrap();
    let second = store
        .add_client(&NewClient::new("Tom", "Smith", "tom@example.com").with_phone_number("888"))
        .unwrap();

    assert_eq!(
        store.find_client(&ClientFilter::by_phone_number("888")).unwrap(),
        Some(first)
    );
    assert_eq!(
        store.find_clients(&ClientFilter::by_phone_number("888")).unwrap(),
        vec![first, second]
    );
}

#[test]
fn delete_client_removes_owned_phone_rows() {
    let mut store = ContactStore::open_in_memory().unwrap();

    let id = store
        .add_client(&NewClient::new("Olya", "Ivanova", "olya@example.com").with_phone_number("111"))
        .unwrap();
    store.add_phone_number(id, "222").unwrap();
    let other = store
        .add_client(&NewClient::new("Tom", "Smith", "tom@example.com").with_phone_number("999"))
        .unwrap();

    store.delete_client(id).unwrap();

    assert_eq!(store.get_client(id).unwrap(), None);
    assert_eq!(
        store.find_client(&ClientFilter::by_phone_number("111")).unwrap(),
        None
    );
    assert_eq!(
        store.find_client(&ClientFilter::by_phone_number("222")).unwrap(),
        None
    );
    // Unrelated ownership is untouched.
    assert_eq!(
        store.find_client(&ClientFilter::by_phone_number("999")).unwrap(),
        Some(other)
    );
}
