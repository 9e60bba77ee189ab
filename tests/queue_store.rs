use report_relay::queue::{FsQueueStore, QueueStore};
use tempfile::tempdir;

#[test]
fn enqueued_payload_is_listed_and_readable() {
    let dir = tempdir().expect("temp dir");
    let queue = FsQueueStore::new(dir.path());

    let id = queue.enqueue("Z-Report\ntotal 42").expect("enqueue");

    let pending = queue.list_pending().expect("list");
    assert_eq!(pending, vec![id.clone()]);
    assert_eq!(queue.read(&id).expect("read"), "Z-Report\ntotal 42");
}

#[test]
fn enqueue_assigns_a_fresh_id_per_item() {
    let dir = tempdir().expect("temp dir");
    let queue = FsQueueStore::new(dir.path());

    let first = queue.enqueue("one").expect("enqueue");
    let second = queue.enqueue("two").expect("enqueue");

    assert_ne!(first, second);
    assert_eq!(queue.list_pending().expect("list").len(), 2);
}

#[test]
fn listing_is_sorted_by_name() {
    let dir = tempdir().expect("temp dir");
    let queue = FsQueueStore::new(dir.path());

    for i in 0..5 {
        queue.enqueue(&format!("payload {i}")).expect("enqueue");
    }

    let pending = queue.list_pending().expect("list");
    let mut sorted = pending.clone();
    sorted.sort();
    assert_eq!(pending, sorted);
}

#[test]
fn remove_deletes_the_entry() {
    let dir = tempdir().expect("temp dir");
    let queue = FsQueueStore::new(dir.path());

    let id = queue.enqueue("payload").expect("enqueue");
    queue.remove(&id).expect("remove");

    assert!(queue.list_pending().expect("list").is_empty());
    assert!(queue.read(&id).is_err());
}

#[test]
fn removing_an_absent_entry_is_a_no_op() {
    let dir = tempdir().expect("temp dir");
    let queue = FsQueueStore::new(dir.path());

    let id = queue.enqueue("payload").expect("enqueue");
    queue.remove(&id).expect("first remove");
    queue.remove(&id).expect("second remove must be a no-op");
    queue.remove("never-existed").expect("unknown id must be a no-op");
}

#[test]
fn hidden_files_are_not_listed() {
    let dir = tempdir().expect("temp dir");
    let queue = FsQueueStore::new(dir.path());
    std::fs::write(dir.path().join(".DS_Store"), "junk").expect("write");

    queue.enqueue("payload").expect("enqueue");

    assert_eq!(queue.list_pending().expect("list").len(), 1);
}
