//! Concurrent access tests for the scope host.
//!
//! The host is shared and immutable from the caller's perspective; these
//! tests verify that events are neither lost nor duplicated when worker
//! threads drive sessions concurrently.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use atrium_lifecycle::events::ScopeEvent;
use atrium_lifecycle::host::ScopeHost;
use atrium_lifecycle::schedule::{OnAttributeAdded, OnSessionCreate, OnSessionDestroy};

#[test]
fn sessions_created_from_multiple_threads() {
    let host = Arc::new(ScopeHost::new("app"));
    let created = Arc::new(AtomicUsize::new(0));

    let created_clone = Arc::clone(&created);
    host.listeners()
        .register::<OnSessionCreate, _>("counter", move |_: &ScopeEvent| {
            created_clone.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    host.start().unwrap();

    let threads = 4;
    let per_thread = 25;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let host = Arc::clone(&host);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..per_thread {
                    host.create_session().unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    assert_eq!(host.session_count(), threads * per_thread);
    assert_eq!(created.load(Ordering::SeqCst), threads * per_thread);
}

#[test]
fn concurrent_destroys_fire_exactly_one_event_each() {
    let host = Arc::new(ScopeHost::new("app"));
    let destroyed = Arc::new(AtomicUsize::new(0));

    let destroyed_clone = Arc::clone(&destroyed);
    host.listeners()
        .register::<OnSessionDestroy, _>("counter", move |_: &ScopeEvent| {
            destroyed_clone.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    host.start().unwrap();

    let ids: Vec<_> = (0..100).map(|_| host.create_session().unwrap()).collect();

    // Every thread races to destroy the full ID list; each destroy must
    // succeed on exactly one thread.
    let barrier = Arc::new(Barrier::new(4));
    let ids = Arc::new(ids);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let host = Arc::clone(&host);
            let barrier = Arc::clone(&barrier);
            let ids = Arc::clone(&ids);
            thread::spawn(move || {
                barrier.wait();
                let mut won = 0;
                for id in ids.iter() {
                    if host.destroy_session(id).is_ok() {
                        won += 1;
                    }
                }
                won
            })
        })
        .collect();

    let total_wins: usize = handles.into_iter().map(|h| h.join().expect("thread panicked")).sum();

    assert_eq!(total_wins, 100);
    assert_eq!(destroyed.load(Ordering::SeqCst), 100);
    assert_eq!(host.session_count(), 0);
}

#[test]
fn attribute_mutations_across_threads_are_all_observed() {
    let host = Arc::new(ScopeHost::new("app"));
    let added = Arc::new(AtomicUsize::new(0));

    let added_clone = Arc::clone(&added);
    host.listeners()
        .register::<OnAttributeAdded, _>("counter", move |_: &ScopeEvent| {
            added_clone.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    host.start().unwrap();

    let threads = 4;
    let keys_per_thread = 20;
    let barrier = Arc::new(Barrier::new(threads));

    // One session per thread; each thread inserts fresh keys only.
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let host = Arc::clone(&host);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let session = host.create_session().unwrap();
                barrier.wait();
                for k in 0..keys_per_thread {
                    host.put_attribute(&session, format!("key-{t}-{k}"), k).unwrap();
                }
                session
            })
        })
        .collect();

    let sessions: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .collect();

    assert_eq!(added.load(Ordering::SeqCst), threads * keys_per_thread);
    for session in &sessions {
        assert_eq!(host.attribute_keys(session).unwrap().len(), keys_per_thread);
    }
}

#[test]
fn listeners_can_call_back_into_the_host() {
    // A listener reacting to session creation by tagging the session must
    // not deadlock: the host releases its locks before dispatch.
    let host = Arc::new(ScopeHost::new("app"));
    let tagged = Arc::new(Mutex::new(Vec::new()));

    let host_clone = Arc::clone(&host);
    let tagged_clone = Arc::clone(&tagged);
    host.listeners()
        .register::<OnSessionCreate, _>("tagger", move |event: &ScopeEvent| {
            if let ScopeEvent::SessionCreated { session_id } = event {
                host_clone
                    .put_attribute(session_id, "tagged", true)
                    .expect("session is live during its creation event");
                tagged_clone.lock().unwrap().push(session_id.clone());
            }
        })
        .unwrap();

    host.start().unwrap();
    let session = host.create_session().unwrap();

    assert_eq!(tagged.lock().unwrap().as_slice(), &[session.clone()]);
    let value = host.get_attribute(&session, "tagged").unwrap().unwrap();
    assert_eq!(value.downcast_ref::<bool>(), Some(&true));
}
