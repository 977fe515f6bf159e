//! Races between separate connections on one on-disk store.

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use common::{Fixture, apply, close, root};
use ticketdesk_core::config::TicketConfig;
use ticketdesk_core::db::query::{self, VisibilityFilter};
use ticketdesk_core::model::{Actor, ChildSpec, Status};
use ticketdesk_core::users::register_user;
use ticketdesk_core::{ErrorKind, TicketError, cast_vote, split_ticket};

const RACERS: usize = 8;

fn race<T, F>(fx: &Arc<Fixture>, racers: usize, work: F) -> Vec<T>
where
    T: Send + 'static,
    F: Fn(usize, &mut rusqlite::Connection) -> T + Send + Sync + 'static,
{
    let barrier = Arc::new(Barrier::new(racers));
    let work = Arc::new(work);
    let handles: Vec<_> = (0..racers)
        .map(|idx| {
            let fx = Arc::clone(fx);
            let barrier = Arc::clone(&barrier);
            let work = Arc::clone(&work);
            thread::spawn(move || {
                let mut conn = fx.connect();
                barrier.wait();
                work(idx, &mut conn)
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|handle| handle.join().expect("racer panicked"))
        .collect()
}

#[test]
fn same_user_voting_concurrently_counts_once() {
    let fx = Arc::new(Fixture::new());
    let ticket = fx.submit("alice", "Add keyboard shortcuts");
    let id = ticket.id;

    let results = race(&fx, RACERS, move |_, conn| {
        cast_vote(conn, &Actor::user("bob"), id).expect("vote")
    });

    assert_eq!(results.iter().filter(|created| **created).count(), 1);
    let conn = fx.connect();
    assert_eq!(query::get_ticket(&conn, id).unwrap().unwrap().vote_count, 1);
    assert_eq!(query::count_voters(&conn, id).unwrap(), 1);
}

#[test]
fn distinct_users_voting_concurrently_all_count() {
    let fx = Arc::new(Fixture::new());
    {
        let mut conn = fx.connect();
        for idx in 0..RACERS {
            register_user(&mut conn, &format!("voter{idx}"), false).unwrap();
        }
    }
    let id = fx.submit("alice", "Add keyboard shortcuts").id;

    let results = race(&fx, RACERS, move |idx, conn| {
        cast_vote(conn, &Actor::user(format!("voter{idx}")), id).expect("vote")
    });

    assert!(results.into_iter().all(|created| created));
    let conn = fx.connect();
    let ticket = query::get_ticket(&conn, id).unwrap().unwrap();
    assert_eq!(ticket.vote_count as usize, RACERS);
    assert_eq!(ticket.vote_count, query::count_voters(&conn, id).unwrap());
}

#[test]
fn racing_closes_serialize() {
    let fx = Arc::new(Fixture::new());
    let id = fx.submit("alice", "Crash on save").id;

    let results = race(&fx, RACERS, move |idx, conn| {
        apply(conn, &root(), id, close(&format!("closing from racer {idx}")))
    });

    let (won, lost): (Vec<_>, Vec<_>) = results.into_iter().partition(Result::is_ok);
    assert_eq!(won.len(), 1);
    for err in lost.into_iter().map(Result::unwrap_err) {
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    let conn = fx.connect();
    assert_eq!(query::get_ticket(&conn, id).unwrap().unwrap().status, Status::Closed);
    assert_eq!(
        query::get_follow_ups(&conn, id, VisibilityFilter::All)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn split_and_close_race_leaves_one_consistent_outcome() {
    for _ in 0..5 {
        let fx = Arc::new(Fixture::new());
        let id = fx.submit("alice", "Two problems in one report").id;

        let results: Vec<Result<Status, TicketError>> = race(&fx, 2, move |idx, conn| {
            if idx == 0 {
                split_ticket(
                    conn,
                    &root(),
                    id,
                    &ChildSpec::default(),
                    &ChildSpec::default(),
                    &TicketConfig::default(),
                )
                .map(|_| Status::Split)
            } else {
                apply(conn, &root(), id, close("done")).map(|ticket| ticket.status)
            }
        });

        let winners: Vec<Status> = results
            .iter()
            .filter_map(|r| r.as_ref().ok().copied())
            .collect();
        assert_eq!(winners.len(), 1, "exactly one of split/close commits");
        for result in &results {
            if let Err(err) = result {
                assert_eq!(err.kind(), ErrorKind::InvalidState);
            }
        }

        let conn = fx.connect();
        let parent = query::get_ticket(&conn, id).unwrap().unwrap();
        let children = query::get_children(&conn, id).unwrap();
        assert_eq!(parent.status, winners[0]);
        match parent.status {
            Status::Split => assert_eq!(children.len(), 2),
            Status::Closed => assert!(children.is_empty()),
            other => panic!("unexpected parent status {other}"),
        }
    }
}
