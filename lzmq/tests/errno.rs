use std::{io, thread};

use lzmq::{
  error::{
    util::{get_errno, get_last_error, zmq_errno},
    ZmqError, EFSM,
  },
  types::DONTWAIT,
  Context, InitArgs, SocketType,
};

// every test runs on its own thread so the indicator starts out clean

fn on_fresh_thread<F: FnOnce() + Send + 'static>(f: F) {
  thread::spawn(f).join().unwrap();
}

#[test]
fn no_error_reads_zero() {
  on_fresh_thread(|| {
    assert_eq!(get_errno(), 0);
    assert_eq!(get_errno(), zmq_errno());
  });
}

#[test]
fn failed_bind_matches_direct_read() {
  on_fresh_thread(|| {
    let context = Context::new(InitArgs::default()).unwrap();
    let socket = context.socket(SocketType::Pair).unwrap();

    assert!(socket.bind("bogus://nowhere").is_err());

    let code = get_errno();

    assert_ne!(code, 0);
    assert_eq!(code, zmq_errno());
  });
}

#[test]
fn fsm_code_survives_widening() {
  on_fresh_thread(|| {
    let context = Context::new(InitArgs::default()).unwrap();
    let req = context.socket(SocketType::Req).unwrap();

    let error = req.recv_bytes(DONTWAIT).unwrap_err();

    assert_eq!(error, ZmqError::ZmqErrorCode(get_last_error()));
    assert_eq!(get_errno(), EFSM);
    assert_eq!(get_errno(), EFSM);
  });
}

#[test]
fn reads_do_not_clear_indicator() {
  on_fresh_thread(|| {
    let context = Context::new(InitArgs::default()).unwrap();
    let pull = context.socket(SocketType::Pull).unwrap();

    pull.bind("inproc://idempotent").unwrap();
    assert!(pull.recv_bytes(DONTWAIT).is_err());

    let reads: Vec<u64> = (0..5).map(|_| get_errno()).collect();

    assert!(reads.iter().all(|&code| code == reads[0]));
    assert_eq!(io::Error::from_raw_os_error(reads[0] as i32).kind(), io::ErrorKind::WouldBlock);
  });
}

#[test]
fn indicator_is_per_thread() {
  on_fresh_thread(|| {
    let context = Context::new(InitArgs::default()).unwrap();
    let req = context.socket(SocketType::Req).unwrap();

    assert!(req.recv_bytes(DONTWAIT).is_err());
    assert_eq!(get_errno(), EFSM);

    let other = thread::spawn(get_errno).join().unwrap();

    assert_eq!(other, 0);
  });
}
