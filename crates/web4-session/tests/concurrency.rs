//! Cross-thread behavior of the session monitor: blocked senders must be
//! released by consumers, observe disconnection, and never corrupt the
//! queue bound.

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use web4_session::{BackpressurePolicy, Session, SessionConfig, SessionError};

fn blocking_session(max_queue: usize, block_timeout_s: f64) -> Arc<Session<u64>> {
    Arc::new(Session::new(SessionConfig {
        session_id: 42,
        max_queue,
        backpressure_policy: BackpressurePolicy::Block,
        block_timeout_s,
        ..Default::default()
    }))
}

#[test]
fn blocked_sender_is_released_by_a_consumer() {
    let session = blocking_session(1, 2.0);
    session.send(1).unwrap();

    let producer = {
        let session = session.clone();
        thread::spawn(move || session.send(2))
    };

    // Give the producer time to enter its wait, then make room.
    thread::sleep(Duration::from_millis(50));
    assert_eq!(session.receive().unwrap(), Some(1));

    producer.join().unwrap().unwrap();
    assert_eq!(session.receive().unwrap(), Some(2));
    let stats = session.stats();
    assert_eq!(stats.blocked, 1);
    assert_eq!(stats.enqueued, 2);
    assert_eq!(stats.errors, 0);
}

#[test]
fn blocked_sender_observes_disconnection() {
    let session = blocking_session(1, 5.0);
    session.send(1).unwrap();

    let producer = {
        let session = session.clone();
        thread::spawn(move || session.send(2))
    };

    thread::sleep(Duration::from_millis(50));
    session.disconnect("operator teardown");

    // The waiter must fail with Disconnected, not sit out the full timeout.
    assert_eq!(producer.join().unwrap(), Err(SessionError::Disconnected));
}

#[test]
fn concurrent_senders_never_exceed_capacity() {
    let session = Arc::new(Session::new(SessionConfig {
        session_id: 7,
        max_queue: 8,
        backpressure_policy: BackpressurePolicy::DropOldest,
        ..Default::default()
    }));

    let mut handles = Vec::new();
    for t in 0..4u64 {
        let session = session.clone();
        handles.push(thread::spawn(move || {
            for i in 0..100 {
                session.send(t * 1000 + i).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(session.pending() <= 8);
    let stats = session.stats();
    assert_eq!(stats.attempted, 400);
    assert!(stats.max_queue_len <= 8);
    assert_eq!(
        stats.attempted,
        stats.enqueued + stats.dropped_oldest + stats.dropped_newest + stats.errors
    );
}

#[test]
fn heartbeat_timeout_unblocks_nothing_but_disconnects() {
    let session = Arc::new(Session::<u64>::new(SessionConfig {
        session_id: 9,
        max_queue: 4,
        heartbeat_timeout_s: 0.01,
        ..Default::default()
    }));
    session.send(1).unwrap();
    session.backdate_heartbeat(Duration::from_secs(1));

    assert!(session.check_heartbeat_timeout());
    assert_eq!(session.send(2).unwrap_err(), SessionError::Disconnected);
}
