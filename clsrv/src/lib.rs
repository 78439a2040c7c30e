use std::{
  error, fmt,
  str::FromStr,
  sync::{
    atomic::{AtomicBool, Ordering},
    mpsc,
  },
  thread,
  time::Duration,
};

use lzmq::{
  error::util::{get_errno, os_errno, zmq_errno},
  poll,
  types::{DONTWAIT, POLLIN},
  Context, PollItem, SocketType, ZmqErrorCode,
};
use tracing::{debug, info, warn};

pub const PAYLOAD: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const PAYLOAD_SUFFIX: &[u8] = b"XXX";

pub type BoxResult<T> = Result<T, Box<dyn error::Error + Send + Sync + 'static>>;

/// How long the server waits for traffic before checking its stop flag.
pub const STOP_CHECK_INTERVAL_MS: i64 = 100;

/// Binds a PAIR socket on `endpoint` and returns the next `count` frames.
///
/// `bound` is signalled once the bind went through so a client in the same
/// process can connect. Setting `stop` makes the server give up with an error
/// instead of waiting for the remaining frames.
pub fn serve(
  context: &Context,
  endpoint: &str,
  count: usize,
  bound: Option<mpsc::Sender<()>>,
  stop: &AtomicBool,
) -> BoxResult<Vec<Vec<u8>>> {
  let server = context.socket(SocketType::Pair)?;

  info!(endpoint, "server: binding");
  server.bind(endpoint)?;

  if let Some(bound) = bound {
    // the receiver only goes away if the client side already gave up
    let _ = bound.send(());
  }

  let mut frames = Vec::with_capacity(count);

  while frames.len() < count {
    if stop.load(Ordering::Acquire) {
      return Err(format!("server stopped after {} of {} frames", frames.len(), count).into());
    }

    let mut items = [PollItem::socket(&server, POLLIN)];

    if poll(&mut items, STOP_CHECK_INTERVAL_MS)? == 0 {
      continue;
    }

    let frame = server.recv_bytes(DONTWAIT)?;

    info!(frame = %String::from_utf8_lossy(&frame), "server: received");

    frames.push(frame);
  }

  Ok(frames)
}

/// Connects a PAIR socket to `endpoint`, sends every frame, then waits `delay`
/// before closing so pending frames get out.
pub fn send(context: &Context, endpoint: &str, frames: &[Vec<u8>], delay: Duration) -> BoxResult<()> {
  let client = context.socket(SocketType::Pair)?;

  info!(endpoint, "client: connecting");
  client.connect(endpoint)?;

  for frame in frames {
    info!(frame = %String::from_utf8_lossy(frame), "client: sending");

    client.send_bytes(frame, 0)?;
  }

  if !delay.is_zero() {
    debug!(?delay, "client: waiting for delivery");

    thread::sleep(delay);
  }

  Ok(())
}

/// The two frames the client sends: the alphabet, then the alphabet with a
/// suffix appended.
pub fn demo_frames() -> Vec<Vec<u8>> {
  let first = PAYLOAD.to_vec();
  let second = [PAYLOAD, PAYLOAD_SUFFIX].concat();

  vec![first, second]
}

/// Runs server and client against each other on one context.
///
/// A client failure stops the server and is returned in place of its result.
pub fn run_all(context: &Context, endpoint: &str, delay: Duration) -> BoxResult<Vec<Vec<u8>>> {
  let frames = demo_frames();
  let stop = AtomicBool::new(false);
  let (tx, rx) = mpsc::channel();

  thread::scope(|scope| -> BoxResult<Vec<Vec<u8>>> {
    let server = scope.spawn(|| serve(context, endpoint, frames.len(), Some(tx), &stop));

    // server dropped the sender without binding, its error is what matters
    let sent = match rx.recv() {
      Ok(()) => send(context, endpoint, &frames, delay),
      Err(_) => Ok(()),
    };

    if let Err(error) = sent {
      warn!(%error, "client: failed, stopping server");

      stop.store(true, Ordering::Release);

      // the server only reports being stopped, the client error is the cause
      let _ = server.join();

      return Err(error);
    }

    server.join().map_err(|_| "server thread panicked")?
  })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
  None,
  BadEndpoint,
  RecvState,
  WouldBlock,
}

impl Scenario {
  pub const ALL: [Scenario; 4] = [
    Scenario::None,
    Scenario::BadEndpoint,
    Scenario::RecvState,
    Scenario::WouldBlock,
  ];

  pub fn name(&self) -> &'static str {
    match self {
      Scenario::None => "none",
      Scenario::BadEndpoint => "bad-endpoint",
      Scenario::RecvState => "recv-state",
      Scenario::WouldBlock => "would-block",
    }
  }
}

impl fmt::Display for Scenario {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownScenario(String);

impl fmt::Display for UnknownScenario {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "unknown scenario - {}", self.0)
  }
}

impl error::Error for UnknownScenario {}

impl FromStr for Scenario {
  type Err = UnknownScenario;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Scenario::ALL
      .into_iter()
      .find(|scenario| scenario.name() == s)
      .ok_or_else(|| UnknownScenario(s.to_owned()))
  }
}

/// Error indicator readings taken right after a scenario ran.
#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
  pub scenario: Scenario,
  pub errno: u64,
  pub zmq_errno: u64,
  pub os_errno: u64,
  pub message: String,
}

impl fmt::Display for Probe {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}: errno={} zmq_errno={} os_errno={} ({})",
      self.scenario, self.errno, self.zmq_errno, self.os_errno, self.message
    )
  }
}

/// Runs `scenario` on a fresh thread and reads the error indicator afterwards.
pub fn probe(context: &Context, scenario: Scenario) -> BoxResult<Probe> {
  thread::scope(|scope| -> BoxResult<Probe> {
    scope
      .spawn(|| probe_on_current_thread(context, scenario))
      .join()
      .map_err(|_| "probe thread panicked")?
  })
}

fn probe_on_current_thread(context: &Context, scenario: Scenario) -> BoxResult<Probe> {
  // the failing socket stays open until the indicator has been read
  let socket = match scenario {
    Scenario::None => None,
    Scenario::BadEndpoint => {
      let socket = context.socket(SocketType::Pair)?;

      expect_failure(socket.connect("no-transport").is_err(), scenario)?;

      Some(socket)
    }
    Scenario::RecvState => {
      let socket = context.socket(SocketType::Req)?;

      expect_failure(socket.recv_bytes(DONTWAIT).is_err(), scenario)?;

      Some(socket)
    }
    Scenario::WouldBlock => {
      let socket = context.socket(SocketType::Pull)?;
      socket.bind("inproc://clsrv-probe-would-block")?;

      expect_failure(socket.recv_bytes(DONTWAIT).is_err(), scenario)?;

      Some(socket)
    }
  };

  let errno = get_errno();
  let probe = Probe {
    scenario,
    errno,
    zmq_errno: zmq_errno(),
    os_errno: os_errno(),
    message: ZmqErrorCode::new(errno).message(),
  };

  drop(socket);

  debug!(%probe, "probe finished");

  Ok(probe)
}

fn expect_failure(failed: bool, scenario: Scenario) -> BoxResult<()> {
  if failed {
    Ok(())
  } else {
    Err(format!("scenario {} did not fail", scenario).into())
  }
}
