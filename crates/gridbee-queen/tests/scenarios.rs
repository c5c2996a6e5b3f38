//! End-to-end coordinator scenarios, driven through the public HiveMind
//! API with channel-backed sessions standing in for sockets.

use std::net::SocketAddr;

use gridbee_fitness::Role;
use gridbee_protocol::QueenMessage;
use gridbee_queen::{HiveEvent, HiveMind, Outbound, SessionId};
use gridbee_topology::{Direction, GridCoord};
use tokio::sync::mpsc::UnboundedReceiver;

fn open(hive: &mut HiveMind, id: u64) -> (SessionId, UnboundedReceiver<QueenMessage>) {
    let session = SessionId(id);
    let (outbound, rx) = Outbound::new();
    let peer = SocketAddr::from(([127, 0, 0, 1], 40_000 + id as u16));
    hive.apply(HiveEvent::Opened {
        session,
        peer,
        outbound,
    });
    (session, rx)
}

fn handshake(hive: &mut HiveMind, session: SessionId, bee_id: &str, vram: f64, p2p_port: u16) {
    let text = format!(
        r#"{{"type":"HANDSHAKE","beeId":"{bee_id}","metrics":{{"vramFree":{vram},"cpuIdle":0,"jitter":0}},"p2pPort":{p2p_port}}}"#
    );
    hive.apply(HiveEvent::Frame { session, text });
}

fn drain(rx: &mut UnboundedReceiver<QueenMessage>) -> Vec<QueenMessage> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}

#[test]
fn adjacent_bees_exchange_endpoints() {
    let mut hive = HiveMind::new();

    // PMI 0.7 * 50 = 35 -> PRINCE, slot (0, 0)
    let (a, mut rx_a) = open(&mut hive, 1);
    handshake(&mut hive, a, "bee-a", 5000.0, 9101);
    // PMI 0.7 * 5 = 3.5 -> WORKER, slot (0, 1)
    let (b, mut rx_b) = open(&mut hive, 2);
    handshake(&mut hive, b, "bee-b", 500.0, 9102);

    let to_a = drain(&mut rx_a);
    match &to_a[0] {
        QueenMessage::Ack {
            coordinates, role, ..
        } => {
            assert_eq!(*coordinates, GridCoord::new(0, 0));
            assert_eq!(*role, Role::Prince);
        }
        other => panic!("expected ACK, got {other:?}"),
    }
    // B sits east of A; A learns B's endpoint
    match &to_a[1] {
        QueenMessage::NeighborUpdate {
            direction,
            connection_info,
        } => {
            assert_eq!(*direction, Direction::East);
            assert_eq!(connection_info.port, 9102);
        }
        other => panic!("expected NEIGHBOR_UPDATE, got {other:?}"),
    }
    assert_eq!(to_a.len(), 2);

    let to_b = drain(&mut rx_b);
    match &to_b[0] {
        QueenMessage::Ack {
            coordinates, role, ..
        } => {
            assert_eq!(*coordinates, GridCoord::new(0, 1));
            assert_eq!(*role, Role::Worker);
        }
        other => panic!("expected ACK, got {other:?}"),
    }
    // A sits west of B; B learns A's endpoint
    match &to_b[1] {
        QueenMessage::NeighborUpdate {
            direction,
            connection_info,
        } => {
            assert_eq!(*direction, Direction::West);
            assert_eq!(connection_info.port, 9101);
        }
        other => panic!("expected NEIGHBOR_UPDATE, got {other:?}"),
    }
}

#[test]
fn jobs_go_to_princes_only_and_the_submitter_is_acked() {
    let mut hive = HiveMind::new();

    let (a, mut rx_a) = open(&mut hive, 1);
    handshake(&mut hive, a, "prince", 5000.0, 9101);
    let (b, mut rx_b) = open(&mut hive, 2);
    handshake(&mut hive, b, "worker", 500.0, 9102);
    drain(&mut rx_a);
    drain(&mut rx_b);

    // An unclassified session may submit jobs
    let (submitter, mut rx_s) = open(&mut hive, 3);
    hive.apply(HiveEvent::Frame {
        session: submitter,
        text: r#"{"type":"JOB_SUBMISSION","jobName":"model","fileSize":12345,"data":"0123456789"}"#
            .into(),
    });

    let to_prince = drain(&mut rx_a);
    assert_eq!(to_prince.len(), 1);
    match &to_prince[0] {
        QueenMessage::BlockAssignment {
            block_id,
            total_blocks,
            data,
            ..
        } => {
            assert_eq!(*block_id, 0);
            assert_eq!(*total_blocks, 1);
            assert_eq!(data, "0123456789");
        }
        other => panic!("expected BLOCK_ASSIGNMENT, got {other:?}"),
    }

    // The worker receives nothing
    assert!(drain(&mut rx_b).is_empty());

    let to_submitter = drain(&mut rx_s);
    assert_eq!(to_submitter.len(), 1);
    assert!(matches!(
        &to_submitter[0],
        QueenMessage::JobAck { .. }
    ));
}

#[test]
fn two_princes_split_a_job_in_admission_order() {
    let mut hive = HiveMind::new();

    let (a, mut rx_a) = open(&mut hive, 1);
    handshake(&mut hive, a, "first", 5000.0, 9101);
    let (b, mut rx_b) = open(&mut hive, 2);
    handshake(&mut hive, b, "second", 5000.0, 9102);
    drain(&mut rx_a);
    drain(&mut rx_b);

    let (submitter, _rx_s) = open(&mut hive, 3);
    hive.apply(HiveEvent::Frame {
        session: submitter,
        text: r#"{"type":"JOB_SUBMISSION","jobName":"model","fileSize":10,"data":"abcdefghij"}"#
            .into(),
    });

    let first = drain(&mut rx_a);
    let second = drain(&mut rx_b);
    match (&first[0], &second[0]) {
        (
            QueenMessage::BlockAssignment {
                job_id: id_a,
                block_id: 0,
                total_blocks: 2,
                data: data_a,
            },
            QueenMessage::BlockAssignment {
                job_id: id_b,
                block_id: 1,
                total_blocks: 2,
                data: data_b,
            },
        ) => {
            assert_eq!(id_a, id_b);
            assert_eq!(data_a, "abcde");
            assert_eq!(data_b, "fghij");
        }
        other => panic!("unexpected assignments {other:?}"),
    }
}

#[test]
fn observers_see_removals_and_slots_are_reused() {
    let mut hive = HiveMind::new();

    let (observer, mut rx_o) = open(&mut hive, 1);
    hive.apply(HiveEvent::Frame {
        session: observer,
        text: r#"{"type":"OBSERVER"}"#.into(),
    });
    // Subscribe triggers an immediate snapshot
    assert!(matches!(
        drain(&mut rx_o).as_slice(),
        [QueenMessage::HiveState { bee_count: 0, .. }]
    ));

    let (a, _rx_a) = open(&mut hive, 2);
    handshake(&mut hive, a, "bee-a", 5000.0, 9101);
    match drain(&mut rx_o).as_slice() {
        [QueenMessage::HiveState {
            grid,
            bee_count: 1,
            bees,
        }] => {
            assert_eq!(grid.occupant(GridCoord::new(0, 0)), Some("bee-a"));
            assert_eq!(bees.len(), 1);
            assert_eq!(bees[0].id, "bee-a");
        }
        other => panic!("expected snapshot, got {other:?}"),
    }

    // Transport-level disconnect of the bee
    hive.apply(HiveEvent::Closed { session: a });
    match drain(&mut rx_o).as_slice() {
        [QueenMessage::NodeRemoved { id, coords }] => {
            assert_eq!(id, "bee-a");
            assert_eq!(*coords, GridCoord::new(0, 0));
        }
        other => panic!("expected NODE_REMOVED, got {other:?}"),
    }
    assert_eq!(hive.bee_count(), 0);
    assert!(hive.princes().is_empty());

    // The freed origin slot is the next one handed out
    let (c, mut rx_c) = open(&mut hive, 3);
    handshake(&mut hive, c, "bee-c", 0.0, 9103);
    match drain(&mut rx_c).first() {
        Some(QueenMessage::Ack { coordinates, .. }) => {
            assert_eq!(*coordinates, GridCoord::new(0, 0));
        }
        other => panic!("expected ACK, got {other:?}"),
    }
}

#[test]
fn observer_disconnect_is_silent_cleanup() {
    let mut hive = HiveMind::new();
    let (observer, mut rx_o) = open(&mut hive, 1);
    hive.apply(HiveEvent::Frame {
        session: observer,
        text: r#"{"type":"OBSERVER"}"#.into(),
    });
    drain(&mut rx_o);
    assert_eq!(hive.observer_count(), 1);

    hive.apply(HiveEvent::Closed { session: observer });
    assert_eq!(hive.observer_count(), 0);

    // Later admissions no longer broadcast to it
    let (a, _rx_a) = open(&mut hive, 2);
    handshake(&mut hive, a, "bee-a", 0.0, 9101);
    assert!(drain(&mut rx_o).is_empty());
}
